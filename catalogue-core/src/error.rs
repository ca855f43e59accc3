//! Engine errors.
//!
//! Only configuration problems are errors. A missing barcode or an empty text
//! field is a normal outcome and is modelled in the result types instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("Layout assignment has {layouts} entries for {items} items")]
    AssignmentLengthMismatch { layouts: usize, items: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogueError {
    /// True for the request-shape errors that abort planning.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownLayout(_) | Self::AssignmentLengthMismatch { .. } | Self::InvalidConfig(_)
        )
    }
}
