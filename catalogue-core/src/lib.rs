//! Catalogue Core - Layout & Pagination Engine
//!
//! Turns ordered product records into page descriptors for print catalogues.
//!
//! # Guarantees
//! 1. Item order is preserved within and across pages
//! 2. A page never mixes densities; a density change starts a new page
//! 3. Barcode symbols and truncation verdicts are computed once, here
//! 4. Configuration errors abort the call; missing data never does
//! 5. Same input, same pages

pub mod error;
pub mod item;
pub mod layouts;
pub mod barcode;
pub mod truncation;
pub mod planner;
pub mod config;
pub mod hashing;
pub mod assembler;
pub mod render;

pub use error::CatalogueError;
pub use item::Item;
pub use layouts::{LayoutCatalog, LayoutHints, LayoutId};
pub use barcode::{encode, EncodedBarcode};
pub use truncation::{analyze, Severity, TextField, TruncationVerdict, TruncationWarning};
pub use planner::{BatchPlanner, LayoutAssignment, LayoutSpec, PageDescriptor, SlotPolicy};
pub use config::EngineConfig;
pub use assembler::{AnnotatedItem, AssembleRequest, AssembledCatalogue, CatalogueAssembler, CataloguePage};
pub use render::ProofRenderer;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
