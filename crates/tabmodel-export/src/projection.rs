use indexmap::IndexMap;

use tabmodel_core::{Key, Value};

/// Data column of a projected table, remembering the field it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedColumn {
    pub source: String,
    pub name: String,
}

/// One retained table of a [`Projection`].
///
/// Rows are owned copies of the source rows, ordered like the source table.
#[derive(Debug, Clone)]
pub struct ProjectedTable {
    name: String,
    index_columns: Vec<String>,
    data_columns: Vec<ProjectedColumn>,
    rows: Vec<(Key, Vec<Value>)>,
}

impl ProjectedTable {
    pub(crate) fn new(
        name: String,
        index_columns: Vec<String>,
        data_columns: Vec<ProjectedColumn>,
        rows: Vec<(Key, Vec<Value>)>,
    ) -> Self {
        Self {
            name,
            index_columns,
            data_columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_columns(&self) -> &[String] {
        &self.index_columns
    }

    pub fn data_columns(&self) -> &[ProjectedColumn] {
        &self.data_columns
    }

    pub fn data_column_names(&self) -> impl Iterator<Item = &str> {
        self.data_columns.iter().map(|column| column.name.as_str())
    }

    /// Index columns followed by data columns.
    pub fn column_names(&self) -> Vec<&str> {
        self.index_columns
            .iter()
            .map(String::as_str)
            .chain(self.data_column_names())
            .collect()
    }

    pub fn rows(&self) -> &[(Key, Vec<Value>)] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().map(|(key, _)| key)
    }

    /// `(key, value)` pairs of one data column, by projected name.
    pub fn column(&self, name: &str) -> Option<Vec<(&Key, &Value)>> {
        let idx = self
            .data_columns
            .iter()
            .position(|column| column.name == name)?;
        Some(
            self.rows
                .iter()
                .map(|(key, values)| (key, &values[idx]))
                .collect(),
        )
    }

    /// Source field behind a projected data column.
    pub fn source_field(&self, name: &str) -> Option<&str> {
        self.data_columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renamed and filtered view of a data set, prepared for an environment.
///
/// Only retained tables are present; probing an excluded table yields `None`.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    tables: IndexMap<String, ProjectedTable>,
}

impl Projection {
    pub(crate) fn insert(&mut self, table: ProjectedTable) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn table(&self, name: &str) -> Option<&ProjectedTable> {
        self.tables.get(name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &ProjectedTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
