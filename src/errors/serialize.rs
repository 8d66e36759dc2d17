//! JSON-safe rendering of errors for machine-readable reports.
//!
//! Field values are normalized by their `Serialize` impls: row samples become lists of
//! records, dates become ISO-8601 strings, [`crate::types::DataType`] becomes its name, and
//! `Value::Null` or non-finite floats become `null`.

use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::DomainError;

/// A JSON object describing one error.
pub type ErrorDict = serde_json::Map<String, JsonValue>;

/// Serialize a record's fields into a map.
///
/// Records only hold JSON-representable data, so the fallback branches exist for totality.
pub(crate) fn record_fields<T: Serialize>(record: &T) -> ErrorDict {
    match serde_json::to_value(record) {
        Ok(JsonValue::Object(map)) => map,
        Ok(other) => {
            let mut map = ErrorDict::new();
            map.insert("value".to_string(), other);
            map
        }
        Err(e) => {
            let mut map = ErrorDict::new();
            map.insert("message".to_string(), JsonValue::String(e.to_string()));
            map
        }
    }
}

/// Render an error as `{error_type, error_code, ..fields}`.
///
/// ```rust
/// use tablekit::errors::{error_to_dict, ColumnNotFoundError};
///
/// let e = ColumnNotFoundError::new("Age".to_string(), vec!["Name".to_string(), "Email".to_string()]);
/// let dict = error_to_dict(&e);
/// assert_eq!(
///     serde_json::Value::Object(dict),
///     serde_json::json!({
///         "error_type": "ColumnNotFoundError",
///         "error_code": 1011,
///         "column": "Age",
///         "available": ["Name", "Email"],
///     })
/// );
/// ```
pub fn error_to_dict<E: DomainError + ?Sized>(error: &E) -> ErrorDict {
    let mut dict = ErrorDict::new();
    dict.insert(
        "error_type".to_string(),
        JsonValue::String(error.error_type().to_string()),
    );
    dict.insert(
        "error_code".to_string(),
        JsonValue::from(error.error_code().value()),
    );
    for (key, value) in error.fields() {
        dict.entry(key).or_insert(value);
    }
    dict
}

/// Render an error that is not part of the taxonomy as
/// `{error_type, error_code: null, message}`.
pub fn opaque_error_to_dict<E: fmt::Display>(error: &E) -> ErrorDict {
    let mut dict = ErrorDict::new();
    dict.insert(
        "error_type".to_string(),
        JsonValue::String(short_type_name::<E>().to_string()),
    );
    dict.insert("error_code".to_string(), JsonValue::Null);
    dict.insert("message".to_string(), JsonValue::String(error.to_string()));
    dict
}

/// The integer code of any taxonomy error.
pub fn error_code_value<E: DomainError + ?Sized>(error: &E) -> u32 {
    error.error_code().value()
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
