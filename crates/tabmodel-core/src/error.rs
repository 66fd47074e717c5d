use thiserror::Error;

use crate::value::{FieldType, Key, Value};

/// Core error type shared across tabmodel crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A table declaration violates schema invariants.
    #[error("invalid schema: {0}")]
    Schema(String),
    /// The table is not declared by the schema.
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// The field is not a data field of the table.
    #[error("unknown field: {table}.{field}")]
    UnknownField { table: String, field: String },
    /// A row with the same primary key already exists.
    #[error("duplicate key {key} in table {table}")]
    KeyConflict { table: String, key: Key },
    /// The key does not have one component per primary-key field.
    #[error("key {key} for table {table} has arity {found}, expected {expected}")]
    KeyArity {
        table: String,
        key: Key,
        expected: usize,
        found: usize,
    },
    /// No row exists for the key.
    #[error("key {key} not found in table {table}")]
    MissingKey { table: String, key: Key },
    /// The value cannot be coerced to the declared field type.
    #[error("type mismatch for {table}.{field}: expected {expected}, got {value:?}")]
    TypeMismatch {
        table: String,
        field: String,
        expected: FieldType,
        value: Value,
    },
    /// A schema document failed structural validation.
    #[error("invalid schema document: {}", .0.join("; "))]
    Document(Vec<String>),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias for results returned by tabmodel-core.
pub type Result<T> = std::result::Result<T, CoreError>;
