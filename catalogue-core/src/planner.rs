//! Batch Planner - Items to Pages
//!
//! Walks items in order and cuts them into pages honouring each layout's
//! capacity. Never reorders, never deduplicates, never mixes densities on a page.

use serde::{Deserialize, Serialize};

use crate::error::CatalogueError;
use crate::layouts::LayoutId;

/// Typed layout configuration for a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutAssignment {
    /// One density for every page.
    Uniform(LayoutId),
    /// One density per input item ("mixed mode").
    PerItem(Vec<LayoutId>),
}

impl LayoutAssignment {
    pub fn is_mixed(&self) -> bool {
        matches!(self, LayoutAssignment::PerItem(_))
    }

    fn check_len(&self, items: usize) -> Result<(), CatalogueError> {
        match self {
            LayoutAssignment::PerItem(layouts) if layouts.len() != items => {
                Err(CatalogueError::AssignmentLengthMismatch { layouts: layouts.len(), items })
            }
            _ => Ok(()),
        }
    }

    fn layout_at(&self, index: usize) -> LayoutId {
        match self {
            LayoutAssignment::Uniform(layout) => *layout,
            LayoutAssignment::PerItem(layouts) => layouts[index],
        }
    }
}

/// Wire form of a layout assignment: `"density-4"` or `["2", "2", "density-1"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSpec {
    Uniform(String),
    PerItem(Vec<String>),
}

impl LayoutSpec {
    pub fn resolve(&self) -> Result<LayoutAssignment, CatalogueError> {
        match self {
            LayoutSpec::Uniform(id) => Ok(LayoutAssignment::Uniform(id.parse()?)),
            LayoutSpec::PerItem(ids) => ids
                .iter()
                .map(|id| id.parse::<LayoutId>())
                .collect::<Result<Vec<_>, _>>()
                .map(LayoutAssignment::PerItem),
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, LayoutSpec::PerItem(_))
    }
}

/// What to do with the unused capacity of a short page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPolicy {
    /// Fill up to capacity with explicit empty slots.
    #[default]
    Pad,
    /// Keep only the filled slots.
    Omit,
}

/// One page: its layout and its ordered slots. `None` is an empty slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor<T> {
    pub layout: LayoutId,
    pub slots: Vec<Option<T>>,
}

impl<T> PageDescriptor<T> {
    pub fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn empty_slots(&self) -> usize {
        self.slots.len() - self.filled()
    }

    /// Transform every filled slot, keeping empty slots where they are.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PageDescriptor<U> {
        PageDescriptor {
            layout: self.layout,
            slots: self.slots.into_iter().map(|s| s.map(&mut f)).collect(),
        }
    }
}

pub struct BatchPlanner {
    policy: SlotPolicy,
}

impl BatchPlanner {
    pub fn new(policy: SlotPolicy) -> Self {
        Self { policy }
    }

    /// Partition `items` into pages.
    ///
    /// A page takes the layout of its first item and keeps consuming items while
    /// their layout matches and capacity remains. A layout change always closes
    /// the current page, even if it has room left.
    pub fn plan<'a, T>(
        &self,
        items: &'a [T],
        assignment: &LayoutAssignment,
    ) -> Result<Vec<PageDescriptor<&'a T>>, CatalogueError> {
        assignment.check_len(items.len())?;

        let mut pages = vec![];
        let mut next = 0;

        while next < items.len() {
            let layout = assignment.layout_at(next);
            let capacity = layout.capacity();
            let mut slots = Vec::with_capacity(capacity);

            while next < items.len() && slots.len() < capacity && assignment.layout_at(next) == layout {
                slots.push(Some(&items[next]));
                next += 1;
            }

            if self.policy == SlotPolicy::Pad {
                slots.resize_with(capacity, || None);
            }

            tracing::debug!(
                page = pages.len() + 1,
                layout = %layout,
                filled = slots.iter().filter(|s| s.is_some()).count(),
                capacity,
                "planned page"
            );
            pages.push(PageDescriptor { layout, slots });
        }

        Ok(pages)
    }

    /// Plan from the wire form. The length check runs before identifiers are resolved.
    pub fn plan_spec<'a, T>(
        &self,
        items: &'a [T],
        spec: &LayoutSpec,
    ) -> Result<Vec<PageDescriptor<&'a T>>, CatalogueError> {
        if let LayoutSpec::PerItem(ids) = spec {
            if ids.len() != items.len() {
                return Err(CatalogueError::AssignmentLengthMismatch { layouts: ids.len(), items: items.len() });
            }
        }
        self.plan(items, &spec.resolve()?)
    }
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self::new(SlotPolicy::default())
    }
}
