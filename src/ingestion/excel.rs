#![cfg(feature = "excel")]

//! Spreadsheet ingestion (`.xlsx`, `.xls`, `.ods`, ...).

use std::error::Error as StdError;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;

use super::csv::{parse_cell, DATE_FORMAT};
use crate::errors::{
    FileError, FileReadError, SchemaMismatchError, SheetNotFoundError, ValueParseError,
};
use crate::fp::{to_result, Maybe, Outcome};
use crate::types::{DataSet, DataType, Schema, Value};

/// Ingest one sheet of a workbook into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Validates that all schema fields exist as headers
/// - Reads remaining rows and converts cells into typed `Value`s
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> Outcome<DataSet, FileError> {
    let pick = match sheet_name {
        Some(name) => SheetPick::Named(vec![name]),
        None => SheetPick::First,
    };
    read_workbook(path.as_ref(), pick, schema).into()
}

/// Ingest multiple sheets from a workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// All selected sheets must carry the schema's headers.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
    schema: &Schema,
) -> Outcome<DataSet, FileError> {
    let pick = match sheet_names {
        Some(names) => SheetPick::Named(names.to_vec()),
        None => SheetPick::All,
    };
    read_workbook(path.as_ref(), pick, schema).into()
}

enum SheetPick<'a> {
    First,
    All,
    Named(Vec<&'a str>),
}

fn read_workbook(path: &Path, pick: SheetPick<'_>, schema: &Schema) -> Result<DataSet, FileError> {
    let location = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(&location, e))?;
    let available = workbook.sheet_names().to_vec();

    let sheets: Vec<String> = match pick {
        SheetPick::First => available.iter().take(1).cloned().collect(),
        SheetPick::All => available.clone(),
        SheetPick::Named(names) => names
            .iter()
            .map(|name| resolve_sheet(&available, name).into_result())
            .collect::<Result<_, _>>()?,
    };
    if sheets.is_empty() {
        return Err(SchemaMismatchError::new(location, "workbook has no sheets".to_string()).into());
    }

    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for sheet in &sheets {
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| FileReadError::new(location.clone(), e.to_string()))?;
        all_rows.extend(ingest_sheet_range(&location, sheet, &range, schema)?);
    }

    Ok(DataSet::new(schema.clone(), all_rows))
}

/// Exact sheet-name lookup; a miss lists the sheets that do exist.
fn resolve_sheet(available: &[String], name: &str) -> Outcome<String, SheetNotFoundError> {
    let found: Maybe<String> = available.iter().find(|s| s.as_str() == name).cloned().into();
    to_result(found, SheetNotFoundError::new(name.to_string(), available.to_vec()))
}

/// Format readers wrap I/O failures (`Error::Xlsx(XlsxError::Io(..))`), so search the source chain.
fn workbook_error(location: &str, error: calamine::Error) -> FileError {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(&error);
    while let Some(err) = cur {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return FileError::from_io(location, io);
        }
        cur = err.source();
    }
    FileReadError::new(location.to_string(), error.to_string()).into()
}

fn ingest_sheet_range(
    location: &str,
    sheet: &str,
    range: &Range<Data>,
    schema: &Schema,
) -> Result<Vec<Vec<Value>>, FileError> {
    let (header_row_idx, col_idxs) = build_header_projection(range, schema)
        .map_err(|message| SchemaMismatchError::new(format!("{location} [sheet '{sheet}']"), message))?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate().skip(header_row_idx + 1) {
        // Report 1-based row number (spreadsheet-like).
        let user_row = idx0 + 1;

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &col_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            let col_label = format!("{sheet}:{}", field.name);
            out_row.push(convert_cell(user_row, &col_label, field.data_type, cell)?);
        }
        rows.push(out_row);
    }
    Ok(rows)
}

fn build_header_projection(range: &Range<Data>, schema: &Schema) -> Result<(usize, Vec<usize>), String> {
    let (header_row_idx, header_cells) = range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx, row)| (idx, row.iter().map(cell_to_header_string).collect::<Vec<_>>()))
        .ok_or_else(|| "sheet has no non-empty rows (no header row found)".to_string())?;

    let mut col_idxs: Vec<usize> = Vec::with_capacity(schema.fields.len());
    for f in &schema.fields {
        match header_cells.iter().position(|h| h.trim() == f.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(format!(
                    "missing required column '{}'. headers={header_cells:?}",
                    f.name
                ));
            }
        }
    }
    Ok((header_row_idx, col_idxs))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> Result<Value, ValueParseError> {
    let parse_error =
        |message: &str| ValueParseError::new(row, column.to_string(), c.to_string(), message.to_string());

    match (data_type, c) {
        (_, Data::Empty) => Ok(Value::Null),
        // Text cells follow the same rules as CSV.
        (_, Data::String(s)) => parse_cell(row, column, data_type, s),
        (DataType::Utf8, other) => Ok(Value::Utf8(other.to_string())),
        (DataType::Bool, Data::Bool(b)) => Ok(Value::Bool(*b)),
        (DataType::Bool, Data::Int(i)) => Ok(Value::Bool(*i != 0)),
        (DataType::Bool, Data::Float(f)) => Ok(Value::Bool(*f != 0.0)),
        (DataType::Int64, Data::Int(i)) => Ok(Value::Int64(*i)),
        (DataType::Int64, Data::Float(f)) if f.fract() == 0.0 => Ok(Value::Int64(*f as i64)),
        (DataType::Int64, Data::Float(_)) => Err(parse_error("expected integer (got non-integer float)")),
        (DataType::Float64, Data::Float(f)) => Ok(Value::Float64(*f)),
        (DataType::Float64, Data::Int(i)) => Ok(Value::Float64(*i as f64)),
        (DataType::Date, Data::DateTime(dt)) => excel_serial_to_date(dt.as_f64())
            .map(Value::Date)
            .ok_or_else(|| parse_error("date out of range")),
        (DataType::Date, Data::DateTimeIso(s)) => NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| parse_error(&e.to_string())),
        (DataType::Bool, _) => Err(parse_error("expected bool")),
        (DataType::Int64, _) => Err(parse_error("expected integer")),
        (DataType::Float64, _) => Err(parse_error("expected number")),
        (DataType::Date, _) => Err(parse_error("expected date")),
    }
}

/// Spreadsheet serial dates count days from 1899-12-30.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::try_days(serial.trunc() as i64)?)
}
