//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which ingests a file into an in-memory
//! [`crate::types::DataSet`] using a provided [`crate::types::Schema`].
//!
//! - If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//!   extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{DomainError, FileError, UnsupportedFormatError};
use crate::fp::{Maybe, Outcome};
use crate::types::{DataSet, Schema};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json, parquet};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Maybe<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Maybe::Some(Self::Csv),
            "json" | "ndjson" => Maybe::Some(Self::Json),
            "parquet" | "pq" => Maybe::Some(Self::Parquet),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Maybe::Some(Self::Excel),
            _ => Maybe::Nothing,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Outcome<Self, UnsupportedFormatError> {
        let ext: Maybe<&str> = path.extension().and_then(|s| s.to_str()).into();
        ext.and_then(Self::from_extension).ok_or_else(|| {
            UnsupportedFormatError::new(
                path.display().to_string(),
                ext.map(str::to_string).into_option(),
            )
        })
    }
}

/// How to choose sheet(s) when ingesting an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet (default).
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
    /// Ingest all sheets and concatenate rows.
    AllSheets,
    /// Ingest only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// - If `options.format` is `None`, format is inferred from the file extension.
/// - Use `options.excel_sheet_selection` for Excel multi-tab behavior.
///
/// Every failure is a [`FileError`] variant carrying its own error code. When an observer is
/// configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a severity derived from the error code
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use tablekit::fp::Outcome;
/// use tablekit::ingestion::{ingest_from_path, IngestionOptions};
/// use tablekit::types::{DataType, Field, Schema};
///
/// let schema = Schema::new(vec![
///     Field::new("id", DataType::Int64),
///     Field::new("name", DataType::Utf8),
/// ]);
///
/// match ingest_from_path("people.csv", &schema, &IngestionOptions::default()) {
///     Outcome::Ok(ds) => println!("rows={}", ds.row_count()),
///     Outcome::Err(e) => eprintln!("{e}"),
/// }
/// ```
///
/// Forcing a format for a file without an extension, with `tracing` output:
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tablekit::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions, TracingObserver};
/// use tablekit::types::{DataType, Field, Schema};
///
/// let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Csv),
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// let rows = ingest_from_path("input_without_extension", &schema, &opts)
///     .map(|ds| ds.row_count())
///     .unwrap_or(0);
/// println!("rows={rows}");
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> Outcome<DataSet, FileError> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => match IngestionFormat::from_path(path) {
            Outcome::Ok(f) => f,
            Outcome::Err(e) => {
                tracing::warn!(path = %path.display(), error_code = e.error_code().value(), "{e}");
                return Outcome::Err(e.into());
            }
        },
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
    };
    tracing::debug!(path = %path.display(), format = ?fmt, fields = schema.fields.len(), "ingesting");

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, schema),
        IngestionFormat::Json => json::ingest_json_from_path(path, schema),
        IngestionFormat::Parquet => parquet::ingest_parquet_from_path(path, schema),
        IngestionFormat::Excel => ingest_excel_dispatch(path, schema, &options.excel_sheet_selection),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Outcome::Ok(ds) => obs.on_success(&ctx, IngestionStats { rows: ds.row_count() }),
            Outcome::Err(e) => {
                let sev = IngestionSeverity::for_code(e.error_code());
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn ingest_excel_dispatch(path: &Path, schema: &Schema, sel: &ExcelSheetSelection) -> Outcome<DataSet, FileError> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::ingest_excel_from_path(path, None, schema),
            ExcelSheetSelection::Sheet(name) => excel::ingest_excel_from_path(path, Some(name.as_str()), schema),
            ExcelSheetSelection::AllSheets => excel::ingest_excel_workbook_from_path(path, None, schema),
            ExcelSheetSelection::Sheets(names) => {
                let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                excel::ingest_excel_workbook_from_path(path, Some(refs.as_slice()), schema)
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (schema, sel);
        Outcome::Err(
            UnsupportedFormatError::new(
                path.display().to_string(),
                path.extension().and_then(|s| s.to_str()).map(str::to_string),
            )
            .into(),
        )
    }
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue ingestion work in a job system.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Schema to validate/parse values into.
    pub schema: Schema,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("schema_fields", &self.schema.fields.len())
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> Outcome<DataSet, FileError> {
        ingest_from_path(&self.path, &self.schema, &self.options)
    }
}
