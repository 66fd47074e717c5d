//! Core contracts for tabmodel.
//!
//! This crate defines the schema and data set model shared by the exporter
//! and importer: table declarations, keyed row storage, value coercion and
//! schema-validated copies.

pub mod copy;
pub mod dataset;
pub mod document;
pub mod error;
pub mod options;
pub mod schema;
pub mod validation;
pub mod value;

pub use copy::copy_dataset;
pub use dataset::{DataSet, RowRef, TableData};
pub use document::{
    DefaultDocument, FieldDocument, NonFiniteNumber, SchemaDocument, TableDocument,
    load_schema_json, load_schema_toml, schema_document_json_schema,
};
pub use error::{CoreError, Result};
pub use options::{CoreOptions, ValidationMode};
pub use schema::{DataField, Schema, SchemaBuilder, TableSchema};
pub use validation::validate_table_definition;
pub use value::{FieldType, Key, Value};
