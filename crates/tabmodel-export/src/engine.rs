use std::collections::{HashMap, HashSet};
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{debug, info};

use tabmodel_core::{CoreError, DataSet, Key, Schema, TableData, ValidationMode, Value};
use tabmodel_env::Environment;

use crate::errors::{ExportError, Result};
use crate::options::ExportOptions;
use crate::projection::{ProjectedColumn, ProjectedTable, Projection};

/// Symbols registered by a successful push, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub sets: Vec<String>,
    pub parameters: Vec<String>,
}

/// Entry point for moving data sets into a modeling environment.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Build the renamed/filtered projection of `dataset`. The data set is only read.
    ///
    /// Values are re-checked under the configured core options, or under the
    /// data set's own options when none are configured.
    pub fn project(&self, dataset: &DataSet) -> Result<Projection> {
        let start = Instant::now();
        let schema = dataset.schema();
        let renamings = self.options.renaming_map();
        validate_renamings(schema, &renamings)?;

        let excluded = self.excluded_tables(schema)?;
        let validation = self.options.core.unwrap_or(dataset.options()).validation;
        let mut projection = Projection::default();

        for (name, table) in dataset.tables() {
            if excluded.contains(name) {
                debug!(table = %name, "table excluded from projection");
                continue;
            }
            let projected = self.project_table(table, &renamings, validation)?;
            debug!(
                table = %name,
                columns = projected.data_columns().len(),
                rows = projected.len(),
                "table projected"
            );
            projection.insert(projected);
        }

        info!(
            tables = projection.len(),
            excluded = excluded.len(),
            renamings = renamings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "projection built"
        );
        Ok(projection)
    }

    /// Register index sets and parameters of `projection` in `env`.
    ///
    /// All names are checked for collisions before the first registration call.
    pub fn push<E>(&self, projection: &Projection, env: &mut E) -> Result<PushSummary>
    where
        E: Environment + ?Sized,
    {
        let start = Instant::now();
        let plan = plan_registrations(projection, &self.options.set_names)?;
        check_collisions(&plan, env)?;

        let mut summary = PushSummary::default();
        for (set_name, table) in &plan.sets {
            let members: Vec<Key> = table.keys().cloned().collect();
            env.register_set(set_name, &members)?;
            debug!(set = %set_name, table = %table.name(), members = members.len(), "set pushed");
            summary.sets.push(set_name.to_string());
        }

        for (parameter, table, idx) in &plan.parameters {
            let values: Vec<(Key, Value)> = table
                .rows()
                .iter()
                .map(|(key, row)| (key.clone(), row[*idx].clone()))
                .collect();
            env.register_parameter(parameter, table.index_columns().len(), &values)?;
            debug!(
                parameter = %parameter,
                table = %table.name(),
                values = values.len(),
                "parameter pushed"
            );
            summary.parameters.push(parameter.to_string());
        }

        info!(
            engine = env.engine(),
            sets = summary.sets.len(),
            parameters = summary.parameters.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "projection pushed"
        );
        Ok(summary)
    }

    fn excluded_tables<'a>(&'a self, schema: &Schema) -> Result<HashSet<&'a str>> {
        let mut excluded = HashSet::new();
        for table in &self.options.excluded_tables {
            if !schema.contains_table(table) {
                return Err(ExportError::UnknownExcludedTable(table.clone()));
            }
            excluded.insert(table.as_str());
        }
        Ok(excluded)
    }

    fn project_table(
        &self,
        table: &TableData,
        renamings: &IndexMap<(&str, &str), &str>,
        validation: ValidationMode,
    ) -> Result<ProjectedTable> {
        let schema = table.schema();
        let mut columns = Vec::new();
        let mut positions = Vec::new();
        let mut names = HashSet::new();

        for (idx, field) in schema.data_fields().iter().enumerate() {
            let name = renamings
                .get(&(schema.name(), field.name()))
                .copied()
                .unwrap_or(field.name());
            if name.is_empty() {
                continue;
            }
            if schema.is_primary_key_field(name) {
                return Err(ExportError::rename(
                    schema.name(),
                    field.name(),
                    format!("new name {name} collides with a primary key field"),
                ));
            }
            if !names.insert(name) {
                return Err(ExportError::rename(
                    schema.name(),
                    field.name(),
                    format!("more than one column would be named {name}"),
                ));
            }
            columns.push(ProjectedColumn {
                source: field.name().to_string(),
                name: name.to_string(),
            });
            positions.push(idx);
        }

        let mut rows = Vec::with_capacity(table.len());
        for (key, row) in table.iter() {
            let mut values = Vec::with_capacity(positions.len());
            for &idx in &positions {
                let field = &schema.data_fields()[idx];
                let value = validation
                    .coerce(field.field_type(), row.values()[idx].clone())
                    .map_err(|value| CoreError::TypeMismatch {
                        table: schema.name().to_string(),
                        field: field.name().to_string(),
                        expected: field.field_type(),
                        value,
                    })?;
                values.push(value);
            }
            rows.push((key.clone(), values));
        }

        Ok(ProjectedTable::new(
            schema.name().to_string(),
            schema.primary_key_fields().to_vec(),
            columns,
            rows,
        ))
    }
}

fn validate_renamings(schema: &Schema, renamings: &IndexMap<(&str, &str), &str>) -> Result<()> {
    for &(table, field) in renamings.keys() {
        let table_schema = schema.table(table).ok_or_else(|| {
            ExportError::rename(table, field, "table is not declared by the schema")
        })?;
        if table_schema.is_primary_key_field(field) {
            return Err(ExportError::rename(
                table,
                field,
                "primary key fields cannot be renamed",
            ));
        }
        if table_schema.field(field).is_none() {
            return Err(ExportError::rename(table, field, "unknown data field"));
        }
    }
    Ok(())
}

struct RegistrationPlan<'a> {
    sets: Vec<(&'a str, &'a ProjectedTable)>,
    parameters: Vec<(&'a str, &'a ProjectedTable, usize)>,
}

fn plan_registrations<'a>(
    projection: &'a Projection,
    set_names: &'a IndexMap<String, String>,
) -> Result<RegistrationPlan<'a>> {
    let mut sets = Vec::with_capacity(set_names.len());
    for (table, set_name) in set_names {
        let projected = projection
            .table(table)
            .ok_or_else(|| ExportError::TableNotProjected(table.clone()))?;
        sets.push((set_name.as_str(), projected));
    }

    let mut parameters = Vec::new();
    for table in projection.tables() {
        for (idx, column) in table.data_columns().iter().enumerate() {
            parameters.push((column.name.as_str(), table, idx));
        }
    }

    Ok(RegistrationPlan { sets, parameters })
}

fn check_collisions<E>(plan: &RegistrationPlan<'_>, env: &E) -> Result<()>
where
    E: Environment + ?Sized,
{
    let mut claimed: HashMap<&str, String> = HashMap::new();
    let sets = plan
        .sets
        .iter()
        .map(|(name, table)| (*name, format!("set of table {}", table.name())));
    let parameters = plan.parameters.iter().map(|(name, table, idx)| {
        (
            *name,
            format!(
                "parameter from {}.{}",
                table.name(),
                table.data_columns()[*idx].source
            ),
        )
    });

    for (name, origin) in sets.chain(parameters) {
        if let Some(previous) = claimed.get(name) {
            return Err(ExportError::Rejected {
                name: name.to_string(),
                reason: format!("{previous} and {origin} register the same name"),
            });
        }
        if env.has_symbol(name) {
            return Err(ExportError::Rejected {
                name: name.to_string(),
                reason: format!("{origin} collides with an existing environment symbol"),
            });
        }
        claimed.insert(name, origin);
    }
    Ok(())
}

/// Project `dataset` with `(table, field, new_name)` renamings and excluded tables.
pub fn project(
    dataset: &DataSet,
    renamings: &[(&str, &str, &str)],
    excluded_tables: &[&str],
) -> Result<Projection> {
    let mut options = ExportOptions::default();
    for (table, field, name) in renamings {
        options = options.rename(table, field, name);
    }
    for table in excluded_tables {
        options = options.exclude_table(table);
    }
    Exporter::new(options).project(dataset)
}

/// Push `projection` into `env`, registering one index set per `(table, set_name)` pair.
pub fn push<E>(
    projection: &Projection,
    env: &mut E,
    set_names: &[(&str, &str)],
) -> Result<PushSummary>
where
    E: Environment + ?Sized,
{
    let mut options = ExportOptions::default();
    for (table, set_name) in set_names {
        options = options.set_name(table, set_name);
    }
    Exporter::new(options).push(projection, env)
}
