use thiserror::Error;

use tabmodel_core::CoreError;
use tabmodel_env::EnvError;

/// Errors emitted while projecting or pushing a data set.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A renaming targets a missing table, a missing field or a primary-key field,
    /// or would leave two columns with the same name.
    #[error("invalid renaming for {table}.{field}: {reason}")]
    Rename {
        table: String,
        field: String,
        reason: String,
    },
    #[error("cannot exclude unknown table: {0}")]
    UnknownExcludedTable(String),
    /// A set name was requested for a table that is absent from the projection.
    #[error("table {0} is not part of the projection")]
    TableNotProjected(String),
    /// A registration would collide with another name; detected before any call is made.
    #[error("environment rejected {name}: {reason}")]
    Rejected { name: String, reason: String },
    #[error("environment error: {0}")]
    Environment(#[from] EnvError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ExportError {
    pub(crate) fn rename(table: &str, field: &str, reason: impl Into<String>) -> Self {
        ExportError::Rename {
            table: table.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for rejections, whether detected up front or reported by the environment.
    pub fn is_environment_rejection(&self) -> bool {
        matches!(
            self,
            ExportError::Rejected { .. } | ExportError::Environment(EnvError::Rejected { .. })
        )
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
