//! `tablekit` is a tabular data toolkit whose every fallible operation reports failure as a
//! value: an [`fp::Outcome`] carrying an immutable, coded error record.
//!
//! ## Layers
//!
//! - [`fp`]: [`fp::Maybe`] (presence/absence) and [`fp::Outcome`] (success/typed failure), with
//!   `map`/`and_then` composition and conversions between them.
//! - [`error_codes`]: the stable numeric [`ErrorCode`] registry, banded by subsystem.
//! - [`errors`]: one record type per failure condition, grouped into per-operation unions
//!   (e.g. [`errors::FilterError`]), plus JSON rendering via [`errors::error_to_dict`].
//! - [`types`]: schema and in-memory [`types::DataSet`].
//! - [`ingestion`], [`processing`], [`validation`]: operations built on the layers above.
//! - [`report`]: text/JSON error reports and process exit codes for hosts.
//!
//! ## Composing fallible steps
//!
//! ```rust
//! use tablekit::fp::{err, ok, Outcome};
//!
//! let out = ok::<i32, String>(5).and_then(|n| ok(n * 2)).and_then(|n| ok(n + 1));
//! assert_eq!(out, Outcome::Ok(11));
//!
//! let failed = ok::<i32, &str>(1).and_then(|_| err("stop")).map(|n: i32| n + 1);
//! assert_eq!(failed, Outcome::Err("stop"));
//! ```
//!
//! ## Errors are data
//!
//! ```rust
//! use tablekit::errors::{error_to_dict, DomainError, FilterError};
//! use tablekit::processing::filter_where;
//! use tablekit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![Field::new("Name", DataType::Utf8), Field::new("Email", DataType::Utf8)]),
//!     vec![vec![Value::Utf8("Ada".to_string()), Value::Null]],
//! );
//!
//! let err = filter_where(&ds, "Age > 30").unwrap_err();
//! assert!(matches!(err, FilterError::ColumnNotFound(_)));
//! assert_eq!(err.error_code().value(), 1011);
//! assert_eq!(
//!     serde_json::Value::Object(error_to_dict(&err)),
//!     serde_json::json!({
//!         "error_type": "ColumnNotFoundError",
//!         "error_code": 1011,
//!         "column": "Age",
//!         "available": ["Name", "Email"],
//!     })
//! );
//! ```
//!
//! ## Ingestion
//!
//! ```no_run
//! use tablekit::fp::Outcome;
//! use tablekit::ingestion::{ingest_from_path, IngestionOptions};
//! use tablekit::types::{DataType, Field, Schema};
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", DataType::Int64),
//!     Field::new("user.name", DataType::Utf8),
//! ]);
//! match ingest_from_path("events.ndjson", &schema, &IngestionOptions::default()) {
//!     Outcome::Ok(ds) => println!("rows={}", ds.row_count()),
//!     Outcome::Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! **File formats (auto-detected by extension):** CSV (`.csv`), JSON (`.json`, `.ndjson`),
//! Parquet (`.parquet`, `.pq`), and with the `excel` feature `.xlsx`, `.xls`, `.xlsm`, `.xlsb`,
//! `.ods`. Empty cells, empty strings and JSON `null` become [`types::Value::Null`].

pub mod error_codes;
pub mod errors;
pub mod fp;
pub mod ingestion;
pub mod processing;
pub mod report;
pub mod types;
pub mod validation;

pub use error_codes::{ErrorCategory, ErrorCode};
pub use errors::{error_to_dict, DomainError};
pub use fp::{Maybe, Outcome};
