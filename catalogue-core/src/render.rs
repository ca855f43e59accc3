//! Plain-text proof sheet.
//!
//! One renderer for every density: slot count comes from capacity, sizing from
//! the layout hints. Text is shown as-is; overflow is reported, never cut.

use std::fmt::Write;

use crate::assembler::{AnnotatedItem, AssembledCatalogue, CataloguePage};
use crate::truncation::TruncationWarning;

pub struct ProofRenderer {
    pub show_empty_slots: bool,
}

impl ProofRenderer {
    pub fn new() -> Self {
        Self { show_empty_slots: true }
    }

    pub fn render(&self, catalogue: &AssembledCatalogue) -> String {
        let mut out = String::new();
        for (index, page) in catalogue.pages.iter().enumerate() {
            let number = index + 1;
            let warnings: Vec<_> = catalogue.warnings.iter().filter(|w| w.page == number).collect();
            self.render_page(&mut out, number, page, &warnings);
        }
        let s = &catalogue.summary;
        let _ = writeln!(
            out,
            "{} pages, {} items, {} empty slots, {} without barcode, warnings: {} mild / {} moderate / {} severe",
            s.pages, s.items, s.empty_slots, s.items_without_barcode, s.mild, s.moderate, s.severe
        );
        out
    }

    fn render_page(&self, out: &mut String, number: usize, page: &CataloguePage, warnings: &[&TruncationWarning]) {
        let hints = page.layout.hints();
        let (title_pt, body_pt) = hints.font_scale.points();
        let _ = writeln!(
            out,
            "== Page {} | {} | {}x{} grid | image {}x{}mm | type {}/{}pt",
            number,
            page.layout,
            hints.columns,
            hints.rows,
            hints.image_box_mm[0],
            hints.image_box_mm[1],
            title_pt,
            body_pt
        );

        // Omit policy pages may be shorter than capacity
        for slot in 0..page.capacity() {
            match page.slots.get(slot) {
                Some(Some(annotated)) => render_slot(out, slot, annotated),
                _ if self.show_empty_slots => {
                    let _ = writeln!(out, "  [{}] (empty)", slot + 1);
                }
                _ => {}
            }
        }

        for warning in warnings {
            let _ = writeln!(
                out,
                "  ! {:?} slot {}: {}",
                warning.verdict.severity,
                warning.slot + 1,
                warning.message
            );
        }
    }
}

impl Default for ProofRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_slot(out: &mut String, slot: usize, annotated: &AnnotatedItem) {
    let item = &annotated.item;
    let code = annotated
        .barcode
        .as_ref()
        .map(|b| b.fallback_text())
        .unwrap_or_else(|| "no barcode".to_string());
    let _ = write!(out, "  [{}] {}", slot + 1, item.title);
    if let Some(author) = &item.author {
        let _ = write!(out, " / {}", author);
    }
    if let Some(price) = &item.price {
        let _ = write!(out, " / {}", price);
    }
    let _ = writeln!(out, " | {}", code);
}
