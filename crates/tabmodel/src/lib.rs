//! Public API surface for tabmodel.
//!
//! Moves tabular data sets into an optimization-modeling environment as
//! index sets and parameters, and reads solved variables back into new data
//! sets. The building blocks live in their own crates and are re-exported
//! here.

use thiserror::Error;

pub use tabmodel_core::{
    CoreError, CoreOptions, DataField, DataSet, DefaultDocument, FieldDocument, FieldType, Key,
    NonFiniteNumber, RowRef, Schema, SchemaBuilder, SchemaDocument, TableData, TableDocument,
    TableSchema, ValidationMode, Value, copy_dataset, load_schema_json, load_schema_toml,
    schema_document_json_schema,
};
pub use tabmodel_env::{
    EnvError, Environment, MemoryEnvironment, MemoryObjective, MemoryParameter, MemoryVariable,
    ObjectiveHandle, VariableHandle,
};
pub use tabmodel_export::{
    ExportError, ExportOptions, Exporter, FieldRenaming, ProjectedColumn, ProjectedTable,
    Projection, PushSummary, project, push,
};
pub use tabmodel_import::{
    Extraction, ExtractionSpec, FieldSelector, ImportError, Importer, ValueFilter, extract,
};

/// Library-wide error type.
///
/// Wraps the error of each stage so a whole export/solve/import round can use `?`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Environment(#[from] EnvError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Convenience alias for library results.
pub type Result<T> = std::result::Result<T, Error>;
