//! Layout Catalog - Fixed Page Densities
//!
//! Every layout is a contract: a capacity the planner honours and a set of
//! size hints the renderers read. The table never changes at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayoutId {
    #[serde(rename = "density-1")]
    Density1,
    #[serde(rename = "density-2")]
    Density2,
    #[serde(rename = "density-2-internal")]
    Density2Internal,
    #[serde(rename = "density-3")]
    Density3,
    #[serde(rename = "density-4")]
    Density4,
    #[serde(rename = "density-8")]
    Density8,
}

impl LayoutId {
    pub const ALL: [LayoutId; 6] = [
        LayoutId::Density1,
        LayoutId::Density2,
        LayoutId::Density2Internal,
        LayoutId::Density3,
        LayoutId::Density4,
        LayoutId::Density8,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutId::Density1 => "density-1",
            LayoutId::Density2 => "density-2",
            LayoutId::Density2Internal => "density-2-internal",
            LayoutId::Density3 => "density-3",
            LayoutId::Density4 => "density-4",
            LayoutId::Density8 => "density-8",
        }
    }

    /// Items per page.
    pub fn capacity(&self) -> usize {
        LayoutCatalog::entry(*self).capacity
    }

    pub fn hints(&self) -> &'static LayoutHints {
        &LayoutCatalog::entry(*self).hints
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutId {
    type Err = CatalogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "density-1" | "1" => Ok(LayoutId::Density1),
            "density-2" | "2" => Ok(LayoutId::Density2),
            "density-2-internal" | "2-int" => Ok(LayoutId::Density2Internal),
            "density-3" | "3" => Ok(LayoutId::Density3),
            "density-4" | "4" => Ok(LayoutId::Density4),
            "density-8" | "8" => Ok(LayoutId::Density8),
            other => Err(CatalogueError::UnknownLayout(other.to_string())),
        }
    }
}

/// Size hints consumed by renderers. The engine only hands them out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHints {
    pub columns: u8,
    pub rows: u8,
    /// Maximum cover image box in millimetres, width x height.
    pub image_box_mm: [u16; 2],
    pub font_scale: FontScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontScale {
    Large,
    Regular,
    Compact,
    Minimal,
}

impl FontScale {
    /// Title and body sizes in points.
    pub fn points(&self) -> (f32, f32) {
        match self {
            FontScale::Large => (18.0, 11.0),
            FontScale::Regular => (14.0, 10.0),
            FontScale::Compact => (12.0, 9.0),
            FontScale::Minimal => (10.0, 8.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub id: LayoutId,
    pub name: &'static str,
    pub capacity: usize,
    pub hints: LayoutHints,
}

static CATALOG: [LayoutEntry; 6] = [
    LayoutEntry {
        id: LayoutId::Density1,
        name: "One item per page",
        capacity: 1,
        hints: LayoutHints { columns: 1, rows: 1, image_box_mm: [90, 135], font_scale: FontScale::Large },
    },
    LayoutEntry {
        id: LayoutId::Density2,
        name: "Two items per page, stacked",
        capacity: 2,
        hints: LayoutHints { columns: 1, rows: 2, image_box_mm: [60, 90], font_scale: FontScale::Regular },
    },
    LayoutEntry {
        id: LayoutId::Density2Internal,
        name: "Two items per page, internal side by side",
        capacity: 2,
        hints: LayoutHints { columns: 2, rows: 1, image_box_mm: [70, 105], font_scale: FontScale::Regular },
    },
    LayoutEntry {
        id: LayoutId::Density3,
        name: "Three items per page",
        capacity: 3,
        hints: LayoutHints { columns: 1, rows: 3, image_box_mm: [45, 68], font_scale: FontScale::Compact },
    },
    LayoutEntry {
        id: LayoutId::Density4,
        name: "Four items per page",
        capacity: 4,
        hints: LayoutHints { columns: 2, rows: 2, image_box_mm: [45, 68], font_scale: FontScale::Compact },
    },
    LayoutEntry {
        id: LayoutId::Density8,
        name: "Eight items per page",
        capacity: 8,
        hints: LayoutHints { columns: 2, rows: 4, image_box_mm: [30, 45], font_scale: FontScale::Minimal },
    },
];

/// Read-only registry of the six page densities.
pub struct LayoutCatalog;

impl LayoutCatalog {
    pub fn entry(id: LayoutId) -> &'static LayoutEntry {
        // CATALOG is declared in discriminant order
        &CATALOG[id as usize]
    }

    /// Capacity for a raw layout identifier.
    pub fn capacity_of(id: &str) -> Result<usize, CatalogueError> {
        Ok(id.parse::<LayoutId>()?.capacity())
    }

    pub fn all() -> &'static [LayoutEntry] {
        &CATALOG
    }
}
