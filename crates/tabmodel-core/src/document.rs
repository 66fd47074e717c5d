use jsonschema::JSONSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::schema::{Schema, SchemaBuilder};
use crate::value::Value;

/// Serialized form of a [`Schema`], used for JSON and TOML schema files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    pub tables: Vec<TableDocument>,
}

/// Serialized table declaration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableDocument {
    pub name: String,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub data_fields: Vec<FieldDocument>,
}

/// Serialized data field; a missing default means `0`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultDocument>,
}

/// Serialized field default.
///
/// JSON has no literal for infinite numbers, so those are written as
/// `{ "number": "inf" }` or `{ "number": "-inf" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DefaultDocument {
    Number(f64),
    Text(String),
    NonFinite { number: NonFiniteNumber },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NonFiniteNumber {
    #[serde(rename = "inf")]
    Infinity,
    #[serde(rename = "-inf")]
    NegativeInfinity,
}

impl From<Value> for DefaultDocument {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) if number == f64::INFINITY => DefaultDocument::NonFinite {
                number: NonFiniteNumber::Infinity,
            },
            Value::Number(number) if number == f64::NEG_INFINITY => DefaultDocument::NonFinite {
                number: NonFiniteNumber::NegativeInfinity,
            },
            Value::Number(number) => DefaultDocument::Number(number),
            Value::Text(text) => DefaultDocument::Text(text),
        }
    }
}

impl From<DefaultDocument> for Value {
    fn from(document: DefaultDocument) -> Self {
        match document {
            DefaultDocument::Number(number) => Value::Number(number),
            DefaultDocument::Text(text) => Value::Text(text),
            DefaultDocument::NonFinite {
                number: NonFiniteNumber::Infinity,
            } => Value::Number(f64::INFINITY),
            DefaultDocument::NonFinite {
                number: NonFiniteNumber::NegativeInfinity,
            } => Value::Number(f64::NEG_INFINITY),
        }
    }
}

impl SchemaDocument {
    /// Build an immutable schema, applying every table-level invariant.
    pub fn into_schema(self) -> Result<Schema> {
        let mut builder = SchemaBuilder::new();
        for table in self.tables {
            let mut field_names = Vec::with_capacity(table.data_fields.len());
            let mut defaults = Vec::new();
            for field in table.data_fields {
                if let Some(default) = field.default {
                    defaults.push((field.name.clone(), Value::from(default)));
                }
                field_names.push(field.name);
            }
            builder.define_table_owned(table.name, table.primary_key, field_names, defaults)?;
        }
        Ok(builder.build())
    }

    pub fn from_schema(schema: &Schema) -> Self {
        let tables = schema
            .tables()
            .map(|table| TableDocument {
                name: table.name().to_string(),
                primary_key: table.primary_key_fields().to_vec(),
                data_fields: table
                    .data_fields()
                    .iter()
                    .map(|field| FieldDocument {
                        name: field.name().to_string(),
                        default: Some(DefaultDocument::from(field.default_value().clone())),
                    })
                    .collect(),
            })
            .collect();
        Self { tables }
    }
}

/// JSON Schema describing [`SchemaDocument`].
pub fn schema_document_json_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(SchemaDocument);
    Ok(serde_json::to_value(schema)?)
}

/// Validate a JSON schema document structurally, then build the schema.
pub fn load_schema_json(document: &serde_json::Value) -> Result<Schema> {
    let json_schema = schema_document_json_schema()?;
    let compiled = JSONSchema::compile(&json_schema)
        .map_err(|err| CoreError::Document(vec![err.to_string()]))?;

    if let Err(errors) = compiled.validate(document) {
        let issues = errors
            .map(|error| {
                let pointer = normalized_pointer(&error.instance_path.to_string());
                format!("{pointer}: {error}")
            })
            .collect();
        return Err(CoreError::Document(issues));
    }

    let parsed: SchemaDocument = serde_json::from_value(document.clone())?;
    parsed.into_schema()
}

/// Parse a TOML schema document and build the schema.
pub fn load_schema_toml(content: &str) -> Result<Schema> {
    let parsed: SchemaDocument = toml::from_str(content)?;
    parsed.into_schema()
}

fn normalized_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
