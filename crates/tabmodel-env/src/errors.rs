use thiserror::Error;

use tabmodel_core::Key;

/// Errors reported across the modeling-environment boundary.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The environment refused a registration (name collision, malformed data).
    #[error("environment rejected {symbol}: {reason}")]
    Rejected { symbol: String, reason: String },
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("symbol {0} has the wrong kind for this request")]
    WrongKind(String),
    #[error("index {index} is not defined for {symbol}")]
    UnknownIndex { symbol: String, index: Key },
    /// An objective was queried before any value was published for it.
    #[error("objective {0} has no value")]
    Unsolved(String),
}

impl EnvError {
    pub fn rejected(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        EnvError::Rejected {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for environment calls.
pub type Result<T> = std::result::Result<T, EnvError>;
