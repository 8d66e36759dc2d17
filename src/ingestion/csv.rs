//! CSV ingestion implementation.

use std::path::Path;

use chrono::NaiveDate;

use crate::errors::{FileError, FileReadError, SchemaMismatchError, ValueParseError};
use crate::fp::Outcome;
use crate::types::{DataSet, DataType, Schema, Value};

/// Date format accepted in text cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> Outcome<DataSet, FileError> {
    let path = path.as_ref();
    let location = path.display().to_string();
    let rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path);
    match rdr {
        Ok(mut rdr) => read_records(&mut rdr, schema, &location).into(),
        Err(e) => Outcome::Err(csv_error(&location, e)),
    }
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> Outcome<DataSet, FileError> {
    read_records(rdr, schema, "<reader>").into()
}

fn read_records<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
    location: &str,
) -> Result<DataSet, FileError> {
    let headers = rdr.headers().map_err(|e| csv_error(location, e))?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(SchemaMismatchError::new(
                    location.to_string(),
                    format!(
                        "missing required column '{}'. headers={:?}",
                        field.name,
                        headers.iter().collect::<Vec<_>>()
                    ),
                )
                .into());
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result.map_err(|e| csv_error(location, e))?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_cell(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn csv_error(location: &str, error: csv::Error) -> FileError {
    match error.kind() {
        csv::ErrorKind::Io(io) => FileError::from_io(location, io),
        _ => FileReadError::new(location.to_string(), error.to_string()).into(),
    }
}

/// Parse one text cell into `data_type`. Blank cells become [`Value::Null`].
pub(crate) fn parse_cell(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> Result<Value, ValueParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error =
        |message: String| ValueParseError::new(row, column.to_owned(), raw.to_owned(), message);

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| parse_error(format!("{e} (expected {DATE_FORMAT})"))),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::types::Field;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("joined", DataType::Date),
        ])
    }

    #[test]
    fn reads_reordered_columns_and_dates() {
        let data = "joined,id\n2024-01-31,7\n,8\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let ds = ingest_csv_from_reader(&mut rdr, &schema()).unwrap();
        assert_eq!(
            ds.rows,
            vec![
                vec![Value::Int64(7), Value::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())],
                vec![Value::Int64(8), Value::Null],
            ]
        );
    }

    #[test]
    fn bad_cell_is_value_parse_with_user_row() {
        let data = "id,joined\n1,2024-01-01\nx,2024-01-02\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let err = ingest_csv_from_reader(&mut rdr, &schema()).unwrap_err();
        match err {
            FileError::ValueParse(e) => {
                assert_eq!(*e.row(), 3);
                assert_eq!(e.column(), "id");
                assert_eq!(e.raw(), "x");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let mut rdr = csv::Reader::from_reader("id\n1\n".as_bytes());
        let err = ingest_csv_from_reader(&mut rdr, &schema()).unwrap_err();
        assert_eq!(err.error_code().value(), 12007);
        assert!(err.to_string().contains("missing required column 'joined'"));
    }
}
