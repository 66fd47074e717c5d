//! Extraction of solved modeling-environment variables into data sets.

pub mod engine;
pub mod errors;
pub mod extraction;

pub use engine::{Importer, extract};
pub use errors::{ImportError, Result};
pub use extraction::{Extraction, ExtractionSpec, FieldSelector, ValueFilter};
