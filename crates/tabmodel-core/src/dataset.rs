use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{CoreError, Result};
use crate::options::CoreOptions;
use crate::schema::{Schema, TableSchema};
use crate::value::{Key, Value};

/// Positional row record; values follow the table's declared data-field order.
#[derive(Debug, Clone, PartialEq)]
struct Row {
    values: Vec<Value>,
}

/// Read view over one row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    schema: &'a TableSchema,
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(self, field: &str) -> Option<&'a Value> {
        let idx = self.schema.position(field)?;
        self.values.get(idx)
    }

    pub fn number(self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    pub fn text(self, field: &str) -> Option<&'a str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Values in declared data-field order.
    pub fn values(self) -> &'a [Value] {
        self.values
    }

    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.schema.data_field_names().zip(self.values.iter())
    }
}

/// Rows of a single table keyed by primary key.
///
/// Rows live in one insertion-ordered store; the key index maps each primary
/// key to its slot.
#[derive(Debug, Clone)]
pub struct TableData {
    schema: Arc<TableSchema>,
    options: CoreOptions,
    rows: IndexMap<Key, Row>,
}

impl TableData {
    pub fn new(schema: Arc<TableSchema>, options: CoreOptions) -> Self {
        Self {
            schema,
            options,
            rows: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.rows.contains_key(key)
    }

    pub fn get(&self, key: &Key) -> Option<RowRef<'_>> {
        self.rows.get(key).map(|row| RowRef {
            schema: &self.schema,
            values: &row.values,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, RowRef<'_>)> {
        let schema: &TableSchema = &self.schema;
        self.rows.iter().map(move |(key, row)| {
            (
                key,
                RowRef {
                    schema,
                    values: &row.values,
                },
            )
        })
    }

    /// Insert a new row; omitted data fields take their defaults.
    pub fn insert<K, I, F, V>(&mut self, key: K, values: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<Value>,
    {
        let key = key.into();
        self.check_key(&key)?;
        if self.rows.contains_key(&key) {
            return Err(CoreError::KeyConflict {
                table: self.name().to_string(),
                key,
            });
        }
        let row = self.build_row(values)?;
        self.rows.insert(key, row);
        Ok(())
    }

    /// Insert or overwrite a whole row; omitted data fields take their defaults.
    pub fn replace_row<K, I, F, V>(&mut self, key: K, values: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<Value>,
    {
        let key = key.into();
        self.check_key(&key)?;
        let row = self.build_row(values)?;
        self.rows.insert(key, row);
        Ok(())
    }

    /// Overwrite one data field of an existing row.
    pub fn set_field(&mut self, key: &Key, field: &str, value: impl Into<Value>) -> Result<()> {
        let (idx, value) = self.coerce_field(field, value.into())?;
        let row = self
            .rows
            .get_mut(key)
            .ok_or_else(|| CoreError::MissingKey {
                table: self.schema.name().to_string(),
                key: key.clone(),
            })?;
        row.values[idx] = value;
        Ok(())
    }

    /// Remove a row, keeping the order of the remaining rows.
    pub fn remove(&mut self, key: &Key) -> bool {
        self.rows.shift_remove(key).is_some()
    }

    fn check_key(&self, key: &Key) -> Result<()> {
        let expected = self.schema.key_arity();
        if key.arity() != expected {
            return Err(CoreError::KeyArity {
                table: self.name().to_string(),
                key: key.clone(),
                expected,
                found: key.arity(),
            });
        }
        if key
            .parts()
            .iter()
            .any(|part| matches!(part, Value::Number(number) if number.is_nan()))
        {
            return Err(CoreError::Schema(format!(
                "key {key} for table {} contains NaN",
                self.name()
            )));
        }
        Ok(())
    }

    fn build_row<I, F, V>(&self, values: I) -> Result<Row>
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<Value>,
    {
        let mut row = self.schema.default_row();
        for (field, value) in values {
            let (idx, value) = self.coerce_field(field.as_ref(), value.into())?;
            row[idx] = value;
        }
        Ok(Row { values: row })
    }

    fn coerce_field(&self, field: &str, value: Value) -> Result<(usize, Value)> {
        let idx = self
            .schema
            .position(field)
            .ok_or_else(|| CoreError::UnknownField {
                table: self.name().to_string(),
                field: field.to_string(),
            })?;
        let expected = self.schema.data_fields()[idx].field_type();
        let value = self
            .options
            .validation
            .coerce(expected, value)
            .map_err(|value| CoreError::TypeMismatch {
                table: self.name().to_string(),
                field: field.to_string(),
                expected,
                value,
            })?;
        Ok((idx, value))
    }
}

/// In-memory instantiation of a [`Schema`].
#[derive(Debug, Clone)]
pub struct DataSet {
    schema: Arc<Schema>,
    options: CoreOptions,
    tables: IndexMap<String, TableData>,
}

impl DataSet {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_options(schema, CoreOptions::default())
    }

    pub fn with_options(schema: Arc<Schema>, options: CoreOptions) -> Self {
        let tables = schema
            .tables()
            .map(|table| {
                (
                    table.name().to_string(),
                    TableData::new(Arc::clone(table), options),
                )
            })
            .collect();
        Self {
            schema,
            options,
            tables,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn options(&self) -> CoreOptions {
        self.options
    }

    pub fn table(&self, name: &str) -> Option<&TableData> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableData> {
        self.tables.get_mut(name)
    }

    pub fn require_table(&self, name: &str) -> Result<&TableData> {
        self.table(name)
            .ok_or_else(|| CoreError::UnknownTable(name.to_string()))
    }

    pub fn require_table_mut(&mut self, name: &str) -> Result<&mut TableData> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownTable(name.to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableData)> {
        self.tables
            .iter()
            .map(|(name, table)| (name.as_str(), table))
    }

    /// Add a row to `table`, failing on duplicate keys.
    pub fn new_row<K, I, F, V>(&mut self, table: &str, key: K, values: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<Value>,
    {
        self.require_table_mut(table)?.insert(key, values)
    }

    /// Total number of rows across all tables.
    pub fn row_count(&self) -> usize {
        self.tables.values().map(TableData::len).sum()
    }
}
