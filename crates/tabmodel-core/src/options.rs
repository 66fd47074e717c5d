use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::{FieldType, Value};

/// How strictly values are checked against declared field types.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Values must already carry the declared type; NaN is rejected.
    #[default]
    Strict,
    /// Numeric text is parsed into numbers and numbers are rendered as text.
    Lenient,
}

impl ValidationMode {
    /// Coerce `value` to `expected`, handing the value back when that is not possible.
    pub fn coerce(self, expected: FieldType, value: Value) -> std::result::Result<Value, Value> {
        match (self, expected, value) {
            (ValidationMode::Strict, FieldType::Number, Value::Number(number))
                if number.is_nan() =>
            {
                Err(Value::Number(number))
            }
            (_, FieldType::Number, Value::Number(number)) => Ok(Value::Number(number)),
            (_, FieldType::Text, Value::Text(text)) => Ok(Value::Text(text)),
            (ValidationMode::Lenient, FieldType::Number, Value::Text(text)) => {
                match text.trim().parse::<f64>() {
                    Ok(number) => Ok(Value::Number(number)),
                    Err(_) => Err(Value::Text(text)),
                }
            }
            (ValidationMode::Lenient, FieldType::Text, Value::Number(number)) => {
                Ok(Value::Text(number.to_string()))
            }
            (ValidationMode::Strict, _, value) => Err(value),
        }
    }
}

/// Options threaded through data sets, exporters and importers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoreOptions {
    #[serde(default)]
    pub validation: ValidationMode,
}

impl CoreOptions {
    pub fn strict() -> Self {
        Self {
            validation: ValidationMode::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            validation: ValidationMode::Lenient,
        }
    }

    /// Parse options from a TOML document such as `validation = "lenient"`.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
