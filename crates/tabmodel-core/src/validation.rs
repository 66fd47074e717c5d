use std::collections::BTreeSet;

use crate::error::{CoreError, Result};
use crate::value::Value;

/// Validate a table declaration before it is added to a schema.
///
/// This checks:
/// - table and field names are non-empty
/// - no field name repeats within the primary key or the data fields
/// - primary-key and data-field names are disjoint
/// - defaults only target declared data fields and are not NaN
pub fn validate_table_definition(
    table: &str,
    primary_key: &[String],
    data_fields: &[String],
    defaults: &[(String, Value)],
) -> Result<()> {
    if table.trim().is_empty() {
        return Err(CoreError::Schema("table name must not be empty".to_string()));
    }

    let mut key_fields = BTreeSet::new();
    for field in primary_key {
        if field.trim().is_empty() {
            return Err(CoreError::Schema(format!(
                "empty primary key field name in table {table}"
            )));
        }
        if !key_fields.insert(field.as_str()) {
            return Err(CoreError::Schema(format!(
                "duplicate primary key field: {table}.{field}"
            )));
        }
    }

    let mut value_fields = BTreeSet::new();
    for field in data_fields {
        if field.trim().is_empty() {
            return Err(CoreError::Schema(format!(
                "empty data field name in table {table}"
            )));
        }
        if key_fields.contains(field.as_str()) {
            return Err(CoreError::Schema(format!(
                "field {table}.{field} is declared as both primary key and data field"
            )));
        }
        if !value_fields.insert(field.as_str()) {
            return Err(CoreError::Schema(format!(
                "duplicate data field: {table}.{field}"
            )));
        }
    }

    for (field, value) in defaults {
        if key_fields.contains(field.as_str()) {
            return Err(CoreError::Schema(format!(
                "default value given for primary key field {table}.{field}"
            )));
        }
        if !value_fields.contains(field.as_str()) {
            return Err(CoreError::UnknownField {
                table: table.to_string(),
                field: field.clone(),
            });
        }
        if matches!(value, Value::Number(number) if number.is_nan()) {
            return Err(CoreError::Schema(format!(
                "default value for {table}.{field} must not be NaN"
            )));
        }
    }

    Ok(())
}
