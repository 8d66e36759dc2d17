//! Parquet ingestion implementation.

use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::fs::File;
use std::path::Path;

use parquet::errors::ParquetError;
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::errors::{FileError, FileReadError, SchemaMismatchError, ValueParseError};
use crate::fp::Outcome;
use crate::types::{DataSet, DataType, Schema, Value};

/// Ingest a Parquet file into an in-memory `DataSet`.
///
/// Notes:
/// - Validates that all schema fields exist as Parquet leaf columns (by column path string)
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>, schema: &Schema) -> Outcome<DataSet, FileError> {
    let path = path.as_ref();
    read_parquet(path, schema, &path.display().to_string()).into()
}

fn read_parquet(path: &Path, schema: &Schema, location: &str) -> Result<DataSet, FileError> {
    let file = File::open(path).map_err(|e| FileError::from_io(location, &e))?;
    let reader = SerializedFileReader::new(file).map_err(|e| parquet_error(location, &e))?;

    let available_columns = parquet_leaf_column_paths(&reader);
    for field in &schema.fields {
        if !available_columns.contains(field.name.as_str()) {
            let mut available: Vec<&str> = available_columns.iter().map(String::as_str).collect();
            available.sort_unstable();
            return Err(SchemaMismatchError::new(
                location.to_string(),
                format!("missing required column '{}'. columns={available:?}", field.name),
            )
            .into());
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res.map_err(|e| parquet_error(location, &e))?;

        let map: HashMap<&str, &Field> = row
            .get_column_iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for f in &schema.fields {
            let Some(v) = map.get(f.name.as_str()) else {
                return Err(SchemaMismatchError::new(
                    location.to_string(),
                    format!("row {row_num} missing required column '{}'", f.name),
                )
                .into());
            };
            out_row.push(convert_parquet_field(row_num, &f.name, f.data_type, v)?);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// I/O failures buried in the parquet error chain keep their file-level meaning.
fn parquet_error(location: &str, error: &ParquetError) -> FileError {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = cur {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return FileError::from_io(location, io);
        }
        cur = err.source();
    }
    FileReadError::new(location.to_string(), error.to_string()).into()
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> HashSet<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn convert_parquet_field(row: usize, column: &str, data_type: DataType, f: &Field) -> Result<Value, ValueParseError> {
    if matches!(f, Field::Null) {
        return Ok(Value::Null);
    }
    let parse_error =
        |message: &str| ValueParseError::new(row, column.to_string(), f.to_string(), message.to_string());

    match data_type {
        DataType::Utf8 => match f {
            Field::Str(s) => Ok(Value::Utf8(s.clone())),
            _ => Err(parse_error("expected string")),
        },
        DataType::Bool => match f {
            Field::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(parse_error("expected bool")),
        },
        DataType::Int64 => match f {
            Field::Byte(v) => Ok(Value::Int64(i64::from(*v))),
            Field::Short(v) => Ok(Value::Int64(i64::from(*v))),
            Field::Int(v) => Ok(Value::Int64(i64::from(*v))),
            Field::Long(v) => Ok(Value::Int64(*v)),
            Field::UByte(v) => Ok(Value::Int64(i64::from(*v))),
            Field::UShort(v) => Ok(Value::Int64(i64::from(*v))),
            Field::UInt(v) => Ok(Value::Int64(i64::from(*v))),
            Field::ULong(v) => i64::try_from(*v)
                .map(Value::Int64)
                .map_err(|_| parse_error("u64 out of range for i64")),
            _ => Err(parse_error("expected integer")),
        },
        DataType::Float64 => match f {
            Field::Float(v) => Ok(Value::Float64(f64::from(*v))),
            Field::Double(v) => Ok(Value::Float64(*v)),
            _ => Err(parse_error("expected number")),
        },
        DataType::Date => match f {
            // Parquet DATE is days since the Unix epoch.
            Field::Date(days) => chrono::NaiveDate::from_num_days_from_ce_opt(719_163 + *days)
                .map(Value::Date)
                .ok_or_else(|| parse_error("date out of range")),
            _ => Err(parse_error("expected date")),
        },
    }
}
