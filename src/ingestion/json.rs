//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Nested fields are supported using dot paths in schema field names (e.g. `user.name`).

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use super::csv::DATE_FORMAT;
use crate::errors::{EmptyFileError, FileError, FileReadError, SchemaMismatchError, ValueParseError};
use crate::fp::{Maybe, Outcome};
use crate::types::{DataSet, DataType, Schema, Value};

/// Ingest JSON into an in-memory `DataSet`.
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> Outcome<DataSet, FileError> {
    let path = path.as_ref();
    let location = path.display().to_string();
    match fs::read_to_string(path) {
        Ok(text) => parse_document(&text, schema, &location).into(),
        Err(e) => Outcome::Err(FileError::from_io(&location, &e)),
    }
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> Outcome<DataSet, FileError> {
    parse_document(input, schema, "<string>").into()
}

fn parse_document(input: &str, schema: &Schema, location: &str) -> Result<DataSet, FileError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EmptyFileError::new(location.to_string()).into());
    }
    let mismatch = |message: String| -> FileError {
        SchemaMismatchError::new(location.to_string(), message).into()
    };

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<JsonValue>(trimmed) {
        match v {
            JsonValue::Array(items) => ingest_json_values(&items, schema, location),
            JsonValue::Object(_) => ingest_json_values(std::slice::from_ref(&v), schema, location),
            _ => Err(mismatch(
                "json must be an object, an array of objects, or NDJSON".to_string(),
            )),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Malformed text is unreadable input, not a schema problem.
            let v = serde_json::from_str::<JsonValue>(line).map_err(|e| -> FileError {
                FileReadError::new(location.to_string(), format!("invalid json at line {}: {e}", i + 1)).into()
            })?;
            values.push(v);
        }
        ingest_json_values(&values, schema, location)
    }
}

fn ingest_json_values(values: &[JsonValue], schema: &Schema, location: &str) -> Result<DataSet, FileError> {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let Some(obj) = v.as_object() else {
            return Err(SchemaMismatchError::new(
                location.to_string(),
                format!("row {row_num} is not a json object"),
            )
            .into());
        };

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = match get_by_dot_path(obj, &field.name) {
                Maybe::Some(jv) => jv,
                Maybe::Nothing => {
                    return Err(SchemaMismatchError::new(
                        location.to_string(),
                        format!("row {row_num} missing required field '{}'", field.name),
                    )
                    .into());
                }
            };
            row.push(convert_json_value(row_num, &field.name, field.data_type, jv)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn get_by_dot_path<'a>(root: &'a serde_json::Map<String, JsonValue>, path: &str) -> Maybe<&'a JsonValue> {
    let mut segments = path.split('.');
    let mut current = match segments.next().and_then(|head| root.get(head)) {
        Some(v) => v,
        None => return Maybe::Nothing,
    };
    for segment in segments {
        current = match current {
            JsonValue::Object(map) => match map.get(segment) {
                Some(v) => v,
                None => return Maybe::Nothing,
            },
            _ => return Maybe::Nothing,
        };
    }
    Maybe::Some(current)
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: DataType,
    v: &JsonValue,
) -> Result<Value, ValueParseError> {
    if v.is_null() {
        return Ok(Value::Null);
    }
    let parse_error = |message: &str| {
        ValueParseError::new(row, column.to_string(), v.to_string(), message.to_string())
    };

    match data_type {
        DataType::Utf8 => v
            .as_str()
            .map(|s| Value::Utf8(s.to_string()))
            .ok_or_else(|| parse_error("expected string")),
        DataType::Bool => v.as_bool().map(Value::Bool).ok_or_else(|| parse_error("expected bool")),
        DataType::Int64 => {
            if let Some(n) = v.as_i64() {
                Ok(Value::Int64(n))
            } else if let Some(n) = v.as_u64() {
                i64::try_from(n)
                    .map(Value::Int64)
                    .map_err(|_| parse_error("u64 out of range for i64"))
            } else {
                Err(parse_error("expected integer number"))
            }
        }
        DataType::Float64 => v.as_f64().map(Value::Float64).ok_or_else(|| parse_error("expected number")),
        DataType::Date => v
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .map(Value::Date)
            .ok_or_else(|| parse_error("expected date string (YYYY-MM-DD)")),
    }
}
