#![cfg(feature = "excel_test_writer")]

//! Workbook ingestion over `.xlsx` files written with `rust_xlsxwriter`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use tablekit::error_codes::ErrorCode;
use tablekit::errors::{DomainError, FileError};
use tablekit::ingestion::excel::{ingest_excel_from_path, ingest_excel_workbook_from_path};
use tablekit::types::{DataType, Field, Schema, Value};

#[derive(Clone, Copy)]
enum Cell {
    Num(f64),
    Text(&'static str),
    Flag(bool),
    Blank,
}

use Cell::{Blank, Flag, Num, Text};

type Sheet<'a> = (&'a str, &'a [&'a [Cell]]);

fn write_workbook(dir: &TempDir, sheets: &[Sheet<'_>]) -> PathBuf {
    let path = dir.path().join("book.xlsx");
    let mut wb = Workbook::new();
    for (name, rows) in sheets {
        let ws = wb.add_worksheet();
        ws.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match *cell {
                    Num(n) => ws.write_number(r, c, n).map(|_| ()),
                    Text(s) => ws.write_string(r, c, s).map(|_| ()),
                    Flag(b) => ws.write_boolean(r, c, b).map(|_| ()),
                    Blank => Ok(()),
                }
                .unwrap();
            }
        }
    }
    wb.save(&path).unwrap();
    path
}

const STAFF: &[&[Cell]] = &[
    &[Text("id"), Text("name"), Text("score"), Text("start")],
    &[Num(1.0), Text("Ada"), Num(98.5), Text("2021-06-01")],
    &[Text("2"), Blank, Text("87.25"), Blank],
];

const CONTRACTORS: &[&[Cell]] = &[
    &[Text("start"), Text("score"), Text("id"), Text("name")],
    &[Text("2020-01-15"), Num(70.0), Num(3.0), Text("Linus")],
];

fn staff_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("start", DataType::Date),
    ])
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn first_sheet_by_default_with_text_numbers_and_blanks() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(&dir, &[("Staff", STAFF), ("Contractors", CONTRACTORS)]);

    let ds = ingest_excel_from_path(&path, None, &staff_schema()).unwrap();
    assert_eq!(
        ds.rows,
        vec![
            vec![Value::Int64(1), Value::Utf8("Ada".to_string()), date(2021, 6, 1)],
            vec![Value::Int64(2), Value::Null, Value::Null],
        ]
    );
}

#[test]
fn workbook_concatenates_sheets_in_requested_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(&dir, &[("Staff", STAFF), ("Contractors", CONTRACTORS)]);
    let schema = staff_schema();

    let all = ingest_excel_workbook_from_path(&path, None, &schema).unwrap();
    let ids: Vec<&Value> = all.column("id").unwrap();
    assert_eq!(ids, vec![&Value::Int64(1), &Value::Int64(2), &Value::Int64(3)]);

    let picked = ingest_excel_workbook_from_path(&path, Some(&["Contractors", "Staff"][..]), &schema).unwrap();
    assert_eq!(picked.rows[0], vec![Value::Int64(3), Value::Utf8("Linus".to_string()), date(2020, 1, 15)]);
    assert_eq!(picked.row_count(), 3);
}

#[test]
fn unknown_sheet_lists_the_real_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(&dir, &[("Staff", STAFF), ("Contractors", CONTRACTORS)]);

    let err = ingest_excel_from_path(&path, Some("Interns"), &staff_schema()).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::SheetNotFound);
    let FileError::SheetNotFound(e) = err else {
        panic!("expected a missing sheet");
    };
    assert_eq!(e.sheet(), "Interns");
    assert_eq!(e.available(), &vec!["Staff".to_string(), "Contractors".to_string()]);
}

#[test]
fn missing_header_names_the_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(&dir, &[("Staff", STAFF)]);
    let schema = Schema::new(vec![Field::new("id", DataType::Int64), Field::new("team", DataType::Utf8)]);

    let err = ingest_excel_from_path(&path, None, &schema).unwrap_err();
    assert_eq!(err.error_code().value(), 12007);
    match err {
        FileError::SchemaMismatch(e) => {
            assert_eq!(e.location(), &format!("{} [sheet 'Staff']", path.display()));
            assert!(e.message().contains("'team'"));
        }
        other => panic!("expected a schema mismatch, got {other:?}"),
    }
}

#[test]
fn bad_cell_reports_sheet_qualified_column_and_row() {
    let dir = tempfile::tempdir().unwrap();
    let rows: &[&[Cell]] = &[
        &[Text("id"), Text("active")],
        &[Num(1.0), Flag(true)],
        &[Num(2.5), Flag(false)],
    ];
    let path = write_workbook(&dir, &[("Flags", rows)]);
    let schema = Schema::new(vec![Field::new("id", DataType::Int64), Field::new("active", DataType::Bool)]);

    let err = ingest_excel_from_path(&path, None, &schema).unwrap_err();
    assert_eq!(err.error_code().value(), 5001);
    let FileError::ValueParse(e) = err else {
        panic!("expected a value parse error");
    };
    assert_eq!(*e.row(), 3);
    assert_eq!(e.column(), "Flags:id");
    assert_eq!(e.raw(), "2.5");
}

#[test]
fn missing_workbook_is_file_not_found() {
    let err = ingest_excel_from_path(Path::new("tests/fixtures/absent.xlsx"), None, &staff_schema()).unwrap_err();
    assert!(matches!(err, FileError::FileNotFound(_)));
}
