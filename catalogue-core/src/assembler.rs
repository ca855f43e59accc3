//! Catalogue Assembler - Single Entry Point
//!
//! Plans pages, then annotates every placed item with its barcode symbol and
//! truncation verdicts so renderers never recompute them. Configuration errors
//! abort the whole call; no partial catalogue is ever returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::barcode::{self, EncodedBarcode};
use crate::config::EngineConfig;
use crate::error::CatalogueError;
use crate::hashing::{compute_job_hash, compute_pages_hash};
use crate::item::{first_occurrences, Item};
use crate::layouts::LayoutId;
use crate::planner::{BatchPlanner, LayoutAssignment, LayoutSpec, PageDescriptor};
use crate::truncation::{self, Severity, TextField, TruncationVerdict, TruncationWarning};
use crate::ENGINE_VERSION;

// Per thread so parallel tests do not see each other's calls
#[cfg(feature = "test-hooks")]
thread_local! {
    static ANNOTATION_CALL_COUNT: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

#[cfg(feature = "test-hooks")]
pub fn get_annotation_call_count() -> u32 {
    ANNOTATION_CALL_COUNT.with(|c| c.get())
}

#[cfg(feature = "test-hooks")]
pub fn reset_annotation_call_count() {
    ANNOTATION_CALL_COUNT.with(|c| c.set(0));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedItem {
    pub item: Item,
    /// `None` when the identifier carries no digits.
    pub barcode: Option<EncodedBarcode>,
    pub truncation: BTreeMap<TextField, TruncationVerdict>,
}

impl AnnotatedItem {
    pub fn verdict(&self, field: TextField) -> Option<&TruncationVerdict> {
        self.truncation.get(&field)
    }
}

pub type CataloguePage = PageDescriptor<AnnotatedItem>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembleRequest {
    pub items: Vec<Item>,
    pub layout: LayoutSpec,
    #[serde(default)]
    pub mixed_context: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueSummary {
    pub pages: usize,
    pub items: usize,
    pub empty_slots: usize,
    pub items_without_barcode: usize,
    pub mild: usize,
    pub moderate: usize,
    pub severe: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledCatalogue {
    pub pages: Vec<CataloguePage>,
    pub warnings: Vec<TruncationWarning>,
    pub summary: CatalogueSummary,
    pub job_hash: String,
}

/// Audit record for one assembly. Carries the only non-deterministic fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueManifest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub job_hash: String,
    pub pages_hash: String,
}

pub struct CatalogueAssembler {
    planner: BatchPlanner,
    config: EngineConfig,
}

impl CatalogueAssembler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            planner: BatchPlanner::new(config.slot_policy),
            config,
        }
    }

    /// Page groups without annotations, after the same preparation as `assemble_request`.
    pub fn plan<'a>(
        &self,
        items: &'a [Item],
        assignment: &LayoutAssignment,
    ) -> Result<Vec<PageDescriptor<&'a Item>>, CatalogueError> {
        self.planner.plan(items, assignment)
    }

    /// Plan and annotate. Density-3 limits follow `is_mixed_context`.
    pub fn assemble(
        &self,
        items: &[Item],
        assignment: &LayoutAssignment,
        is_mixed_context: bool,
    ) -> Result<Vec<CataloguePage>, CatalogueError> {
        let planned = self.planner.plan(items, assignment)?;
        Ok(planned
            .into_iter()
            .map(|page| {
                let layout = page.layout;
                page.map(|item| annotate(item, layout, is_mixed_context))
            })
            .collect())
    }

    /// Full request path: optional dedup, context resolution, warnings and summary.
    pub fn assemble_request(&self, request: &AssembleRequest) -> Result<AssembledCatalogue, CatalogueError> {
        let (items, assignment) = self.prepare(request)?;
        let is_mixed_context = request
            .mixed_context
            .or(self.config.mixed_context)
            .unwrap_or_else(|| assignment.is_mixed());

        let pages = self.assemble(&items, &assignment, is_mixed_context)?;
        let warnings = collect_warnings(&pages);
        let summary = summarize(&pages, &warnings);
        let job_hash = compute_job_hash(request, ENGINE_VERSION)?;

        tracing::info!(
            pages = summary.pages,
            items = summary.items,
            empty_slots = summary.empty_slots,
            without_barcode = summary.items_without_barcode,
            warnings = warnings.len(),
            mixed = is_mixed_context,
            "catalogue assembled"
        );

        Ok(AssembledCatalogue { pages, warnings, summary, job_hash })
    }

    pub fn manifest(&self, catalogue: &AssembledCatalogue) -> Result<CatalogueManifest, CatalogueError> {
        Ok(CatalogueManifest {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            job_hash: catalogue.job_hash.clone(),
            pages_hash: compute_pages_hash(&catalogue.pages)?,
        })
    }

    /// Check and resolve the layout, then apply identifier dedup, dropping the
    /// matching per-item layouts too. Every layout name is resolved before dedup.
    pub fn prepare(&self, request: &AssembleRequest) -> Result<(Vec<Item>, LayoutAssignment), CatalogueError> {
        if let LayoutSpec::PerItem(ids) = &request.layout {
            if ids.len() != request.items.len() {
                return Err(CatalogueError::AssignmentLengthMismatch {
                    layouts: ids.len(),
                    items: request.items.len(),
                });
            }
        }
        let assignment = request.layout.resolve()?;

        if !self.config.dedup_identifiers {
            return Ok((request.items.clone(), assignment));
        }

        let keep = first_occurrences(&request.items);
        if keep.len() < request.items.len() {
            tracing::debug!(dropped = request.items.len() - keep.len(), "dropped repeated identifiers");
        }
        let items = keep.iter().map(|&i| request.items[i].clone()).collect();
        let assignment = match assignment {
            LayoutAssignment::PerItem(layouts) => LayoutAssignment::PerItem(keep.iter().map(|&i| layouts[i]).collect()),
            uniform => uniform,
        };
        Ok((items, assignment))
    }
}

impl Default for CatalogueAssembler {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn annotate(item: &Item, layout: LayoutId, is_mixed_context: bool) -> AnnotatedItem {
    #[cfg(feature = "test-hooks")]
    ANNOTATION_CALL_COUNT.with(|c| c.set(c.get() + 1));

    let truncation = TextField::ALL
        .into_iter()
        .map(|field| {
            let text = match field {
                TextField::Description => item.description.as_deref(),
                TextField::AuthorBio => item.author_bio.as_deref(),
            };
            (field, truncation::analyze(text, field, layout, is_mixed_context))
        })
        .collect();

    AnnotatedItem {
        item: item.clone(),
        barcode: barcode::encode(&item.identifier),
        truncation,
    }
}

fn collect_warnings(pages: &[CataloguePage]) -> Vec<TruncationWarning> {
    let mut warnings = vec![];
    for (page_index, page) in pages.iter().enumerate() {
        for (slot, annotated) in page.slots.iter().enumerate() {
            let Some(annotated) = annotated else { continue };
            for (field, verdict) in &annotated.truncation {
                if !verdict.needs_warning() {
                    continue;
                }
                let message = TruncationWarning::message_for(*field, page.layout, verdict);
                tracing::warn!(
                    identifier = %annotated.item.identifier,
                    page = page_index + 1,
                    slot,
                    severity = ?verdict.severity,
                    "{}",
                    message
                );
                warnings.push(TruncationWarning {
                    identifier: annotated.item.identifier.clone(),
                    title: annotated.item.title.clone(),
                    page: page_index + 1,
                    slot,
                    layout: page.layout,
                    field: *field,
                    verdict: verdict.clone(),
                    message,
                });
            }
        }
    }
    warnings
}

fn summarize(pages: &[CataloguePage], warnings: &[TruncationWarning]) -> CatalogueSummary {
    let mut summary = CatalogueSummary {
        pages: pages.len(),
        ..Default::default()
    };
    for page in pages {
        summary.items += page.filled();
        summary.empty_slots += page.empty_slots();
        summary.items_without_barcode += page.items().filter(|a| a.barcode.is_none()).count();
    }
    for warning in warnings {
        match warning.verdict.severity {
            Severity::Mild => summary.mild += 1,
            Severity::Moderate => summary.moderate += 1,
            Severity::Severe => summary.severe += 1,
            Severity::None => {}
        }
    }
    summary
}
