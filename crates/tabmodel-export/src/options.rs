use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use tabmodel_core::CoreOptions;

use crate::errors::Result;

/// Renaming of one data field; an empty `name` drops the field from the projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRenaming {
    pub table: String,
    pub field: String,
    pub name: String,
}

/// Options for the exporter, passed per export and never persisted by it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportOptions {
    /// Field renamings; a later entry for the same field wins.
    #[serde(default)]
    pub renamings: Vec<FieldRenaming>,
    /// Tables left out of the projection entirely.
    #[serde(default)]
    pub excluded_tables: Vec<String>,
    /// Index set name per table, registered in this order.
    #[serde(default)]
    pub set_names: IndexMap<String, String>,
    /// Validation applied to projected values; the data set's own options when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<CoreOptions>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, table: &str, field: &str, name: &str) -> Self {
        self.renamings.push(FieldRenaming {
            table: table.to_string(),
            field: field.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn drop_field(self, table: &str, field: &str) -> Self {
        self.rename(table, field, "")
    }

    pub fn exclude_table(mut self, table: &str) -> Self {
        self.excluded_tables.push(table.to_string());
        self
    }

    pub fn set_name(mut self, table: &str, set: &str) -> Self {
        self.set_names.insert(table.to_string(), set.to_string());
        self
    }

    pub fn with_core(mut self, core: CoreOptions) -> Self {
        self.core = Some(core);
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Renamings keyed by `(table, field)`, last entry winning.
    pub(crate) fn renaming_map(&self) -> IndexMap<(&str, &str), &str> {
        self.renamings
            .iter()
            .map(|renaming| {
                (
                    (renaming.table.as_str(), renaming.field.as_str()),
                    renaming.name.as_str(),
                )
            })
            .collect()
    }
}
