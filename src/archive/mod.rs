//! Zip archives: traversal-safe extraction and creation, both with optional
//! AES encryption.
pub mod create;
pub mod extract;
pub mod guard;

pub use create::{CreationSummary, create};
pub use extract::{ExtractionSummary, extract};
