use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use tabmodel_core::{
    CoreError, CoreOptions, DataField, DataSet, Key, Schema, TableSchema, Value,
};

use crate::errors::{ImportError, Result};
use crate::extraction::{Extraction, ExtractionSpec, FieldSelector};

/// Builds fresh data sets from solved variable values.
#[derive(Debug, Clone)]
pub struct Importer {
    schema: Arc<Schema>,
    options: CoreOptions,
}

/// Cell written for each accepted index.
#[derive(Clone, Copy)]
enum Target<'s> {
    Magnitude(usize, &'s DataField),
    /// `None` for tables without data fields: only the key is recorded.
    Presence(Option<(usize, &'s DataField)>),
}

/// Extraction entry checked against the schema.
struct ResolvedEntry<'s, 'e, 'v> {
    table: &'s Arc<TableSchema>,
    target: Target<'s>,
    extraction: &'e Extraction<'v>,
}

type StagedRows = IndexMap<Key, Vec<Option<Value>>>;

impl Importer {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_options(schema, CoreOptions::default())
    }

    pub fn with_options(schema: Arc<Schema>, options: CoreOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Read every variable named by `spec` and build a new data set from the
    /// accepted indices. Tables not named by `spec` stay empty.
    pub fn extract(&self, spec: &ExtractionSpec<'_>) -> Result<DataSet> {
        let start = Instant::now();
        let entries = self.resolve(spec)?;

        let mut staged: IndexMap<&str, StagedRows> = IndexMap::new();
        for entry in &entries {
            let rows = staged.entry(entry.table.name()).or_default();
            let read = self.read_entry(entry, rows)?;
            if read == 0 {
                warn!(
                    table = %entry.table.name(),
                    variable = %entry.extraction.variable().name(),
                    "extraction produced no rows"
                );
            }
        }

        let mut dataset = DataSet::with_options(Arc::clone(&self.schema), self.options);
        let mut row_count = 0;
        for (name, rows) in staged {
            let target = dataset.require_table_mut(name)?;
            let schema = self.schema.require_table(name)?;
            for (key, cells) in rows {
                let values = cells
                    .into_iter()
                    .zip(schema.data_fields())
                    .filter_map(|(cell, field)| cell.map(|value| (field.name(), value)));
                target.insert(key, values)?;
            }
            debug!(table = %name, rows = target.len(), "table extracted");
            row_count += target.len();
        }

        info!(
            entries = entries.len(),
            tables = spec.table_names().len(),
            rows = row_count,
            duration_ms = start.elapsed().as_millis() as u64,
            "extraction finished"
        );
        Ok(dataset)
    }

    fn resolve<'s, 'e, 'v>(
        &'s self,
        spec: &'e ExtractionSpec<'v>,
    ) -> Result<Vec<ResolvedEntry<'s, 'e, 'v>>> {
        let mut entries = Vec::with_capacity(spec.len());
        for (table_name, selector, extraction) in spec.entries() {
            let table = self
                .schema
                .table(table_name)
                .ok_or_else(|| ImportError::UnknownTable(table_name.to_string()))?;

            let fields = table.data_fields();
            let target = match selector {
                FieldSelector::Field(field) => {
                    let position = table.position(field).ok_or_else(|| {
                        ImportError::UnknownField {
                            table: table_name.to_string(),
                            field: field.clone(),
                        }
                    })?;
                    Target::Magnitude(position, &fields[position])
                }
                FieldSelector::Presence => match fields {
                    [] => Target::Presence(None),
                    [field] => Target::Presence(Some((0, field))),
                    _ => {
                        return Err(ImportError::AmbiguousField {
                            table: table_name.to_string(),
                            fields: fields.len(),
                        });
                    }
                },
            };

            let variable = extraction.variable();
            if variable.arity() != table.key_arity() {
                return Err(ImportError::ArityMismatch {
                    table: table_name.to_string(),
                    variable: variable.name().to_string(),
                    expected: table.key_arity(),
                    found: variable.arity(),
                });
            }

            entries.push(ResolvedEntry {
                table,
                target,
                extraction,
            });
        }
        Ok(entries)
    }

    /// Stage the accepted indices of one entry; returns how many were accepted.
    fn read_entry(
        &self,
        entry: &ResolvedEntry<'_, '_, '_>,
        rows: &mut StagedRows,
    ) -> Result<usize> {
        let table = entry.table;
        let variable = entry.extraction.variable();
        let mut accepted = 0;

        for index in variable.indices()? {
            if index.arity() != table.key_arity() {
                return Err(ImportError::ArityMismatch {
                    table: table.name().to_string(),
                    variable: variable.name().to_string(),
                    expected: table.key_arity(),
                    found: index.arity(),
                });
            }
            let solved = variable.value(&index)?;
            if !entry.extraction.accepts(solved) {
                continue;
            }

            let cell = match entry.target {
                Target::Magnitude(position, field) => {
                    let value = self
                        .options
                        .validation
                        .coerce(field.field_type(), Value::Number(solved))
                        .map_err(|value| CoreError::TypeMismatch {
                            table: table.name().to_string(),
                            field: field.name().to_string(),
                            expected: field.field_type(),
                            value,
                        })?;
                    Some((position, value))
                }
                Target::Presence(Some((position, field))) => {
                    Some((position, field.default_value().clone()))
                }
                Target::Presence(None) => None,
            };

            let cells = rows
                .entry(index)
                .or_insert_with(|| vec![None; table.data_fields().len()]);
            if let Some((position, value)) = cell {
                cells[position] = Some(value);
            }
            accepted += 1;
        }

        debug!(
            table = %table.name(),
            variable = %variable.name(),
            presence = matches!(entry.target, Target::Presence(_)),
            accepted,
            "variable read"
        );
        Ok(accepted)
    }
}

/// Extract `spec` into a new data set over `schema` with default options.
pub fn extract(spec: &ExtractionSpec<'_>, schema: &Arc<Schema>) -> Result<DataSet> {
    Importer::new(Arc::clone(schema)).extract(spec)
}
