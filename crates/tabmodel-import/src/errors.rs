use thiserror::Error;

use tabmodel_core::CoreError;
use tabmodel_env::EnvError;

/// Errors emitted while extracting solved variables into a data set.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// The field is not a data field of the table (primary-key fields included).
    #[error("unknown field: {table}.{field}")]
    UnknownField { table: String, field: String },
    /// Presence extraction needs a table with exactly one data field.
    #[error("table {table} has {fields} data fields; presence extraction needs exactly one")]
    AmbiguousField { table: String, fields: usize },
    /// The variable's index arity differs from the table's primary-key arity.
    #[error("variable {variable} has index arity {found}, table {table} expects {expected}")]
    ArityMismatch {
        table: String,
        variable: String,
        expected: usize,
        found: usize,
    },
    #[error("environment error: {0}")]
    Environment(#[from] EnvError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
