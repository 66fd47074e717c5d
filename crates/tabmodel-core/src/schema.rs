use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{CoreError, Result};
use crate::validation::validate_table_definition;
use crate::value::{FieldType, Value};

/// Data field of a table with its default value.
///
/// The field type is implied by the default: a numeric default declares a
/// numeric field, a text default a text field.
#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    name: String,
    default: Value,
}

impl DataField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn field_type(&self) -> FieldType {
        self.default.field_type()
    }
}

/// Declaration of a single table: ordered primary-key fields and data fields.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    primary_key: Vec<String>,
    data_fields: Vec<DataField>,
    positions: HashMap<String, usize>,
}

impl TableSchema {
    fn new(name: String, primary_key: Vec<String>, data_fields: Vec<DataField>) -> Self {
        let positions = data_fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name.clone(), idx))
            .collect();
        Self {
            name,
            primary_key,
            data_fields,
            positions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key_fields(&self) -> &[String] {
        &self.primary_key
    }

    pub fn key_arity(&self) -> usize {
        self.primary_key.len()
    }

    pub fn data_fields(&self) -> &[DataField] {
        &self.data_fields
    }

    pub fn data_field_names(&self) -> impl Iterator<Item = &str> {
        self.data_fields.iter().map(|field| field.name.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&DataField> {
        self.position(name).map(|idx| &self.data_fields[idx])
    }

    /// Position of a data field in declared order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn is_primary_key_field(&self, name: &str) -> bool {
        self.primary_key.iter().any(|field| field == name)
    }

    /// The only data field, when the table declares exactly one.
    pub fn sole_data_field(&self) -> Option<&DataField> {
        match self.data_fields.as_slice() {
            [field] => Some(field),
            _ => None,
        }
    }

    /// Row values built entirely from field defaults.
    pub fn default_row(&self) -> Vec<Value> {
        self.data_fields
            .iter()
            .map(|field| field.default.clone())
            .collect()
    }
}

/// Immutable set of table declarations.
///
/// Data sets share a schema behind an `Arc`, so a schema cannot change once
/// data has been built against it.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: IndexMap<String, Arc<TableSchema>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn table(&self, name: &str) -> Option<&Arc<TableSchema>> {
        self.tables.get(name)
    }

    pub fn require_table(&self, name: &str) -> Result<&Arc<TableSchema>> {
        self.table(name)
            .ok_or_else(|| CoreError::UnknownTable(name.to_string()))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<TableSchema>> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Incremental schema definition surface.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: IndexMap<String, TableSchema>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table. Data fields without an entry in `defaults` default to `0`.
    pub fn define_table(
        &mut self,
        name: &str,
        primary_key: &[&str],
        data_fields: &[&str],
        defaults: &[(&str, Value)],
    ) -> Result<&mut Self> {
        let primary_key: Vec<String> = primary_key.iter().map(|field| field.to_string()).collect();
        let field_names: Vec<String> = data_fields.iter().map(|field| field.to_string()).collect();
        let defaults: Vec<(String, Value)> = defaults
            .iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect();
        self.define_table_owned(name.to_string(), primary_key, field_names, defaults)
    }

    pub(crate) fn define_table_owned(
        &mut self,
        name: String,
        primary_key: Vec<String>,
        field_names: Vec<String>,
        defaults: Vec<(String, Value)>,
    ) -> Result<&mut Self> {
        if self.tables.contains_key(&name) {
            return Err(CoreError::Schema(format!("duplicate table name: {name}")));
        }
        validate_table_definition(&name, &primary_key, &field_names, &defaults)?;

        let data_fields = field_names
            .into_iter()
            .map(|field| {
                let default = defaults
                    .iter()
                    .rev()
                    .find(|(name, _)| *name == field)
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Number(0.0));
                DataField {
                    name: field,
                    default,
                }
            })
            .collect();

        let table = TableSchema::new(name.clone(), primary_key, data_fields);
        self.tables.insert(name, table);
        Ok(self)
    }

    /// Change the default of an already declared data field.
    pub fn set_default_value(
        &mut self,
        table: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let value = value.into();
        let schema = self
            .tables
            .get_mut(table)
            .ok_or_else(|| CoreError::UnknownTable(table.to_string()))?;
        if schema.is_primary_key_field(field) {
            return Err(CoreError::Schema(format!(
                "default value given for primary key field {table}.{field}"
            )));
        }
        if matches!(value, Value::Number(number) if number.is_nan()) {
            return Err(CoreError::Schema(format!(
                "default value for {table}.{field} must not be NaN"
            )));
        }
        let idx = schema.position(field).ok_or_else(|| CoreError::UnknownField {
            table: table.to_string(),
            field: field.to_string(),
        })?;
        schema.data_fields[idx].default = value;
        Ok(self)
    }

    pub fn build(self) -> Schema {
        Schema {
            tables: self
                .tables
                .into_iter()
                .map(|(name, table)| (name, Arc::new(table)))
                .collect(),
        }
    }
}
