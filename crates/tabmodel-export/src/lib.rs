//! Export of data sets into optimization-modeling environments.
//!
//! A data set is first projected (field renaming, field dropping, table
//! exclusion) and the projection is then pushed into an environment as
//! named index sets and parameters.

pub mod engine;
pub mod errors;
pub mod options;
pub mod projection;

pub use engine::{Exporter, PushSummary, project, push};
pub use errors::ExportError;
pub use options::{ExportOptions, FieldRenaming};
pub use projection::{ProjectedColumn, ProjectedTable, Projection};
