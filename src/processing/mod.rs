//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! Every fallible operation returns an [`crate::fp::Outcome`] whose error side is the
//! operation's own error union.
//!
//! - [`filter()`] / [`filter_where()`]: row filtering by predicate or textual condition
//! - [`sort_by()`]: stable multi-key sort
//! - [`map()`] / [`try_map()`]: row mapping
//! - [`aggregate()`] / [`reduce()`]: count/sum/min/max/mean over a column
//!
//! ## Example: filter → map → aggregate
//!
//! ```rust
//! use tablekit::fp::Outcome;
//! use tablekit::processing::{aggregate, filter_where, map, ReduceOp};
//! use tablekit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", DataType::Int64),
//!     Field::new("active", DataType::Bool),
//!     Field::new("score", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Bool(true), Value::Float64(10.0)],
//!         vec![Value::Int64(2), Value::Bool(false), Value::Float64(20.0)],
//!         vec![Value::Int64(3), Value::Bool(true), Value::Null],
//!     ],
//! );
//!
//! let total = filter_where(&ds, "active == true")
//!     .map_err(|e| e.to_string())
//!     .and_then(|active| {
//!         map(&active, |row| {
//!             let mut out = row.to_vec();
//!             if let Some(Value::Float64(v)) = out.get(2) {
//!                 out[2] = Value::Float64(v * 2.0);
//!             }
//!             out
//!         })
//!         .map_err(|e| e.to_string())
//!     })
//!     .and_then(|scaled| aggregate(&scaled, "score", ReduceOp::Sum).map_err(|e| e.to_string()));
//!
//! assert_eq!(total, Outcome::Ok(Value::Float64(20.0)));
//! ```

pub mod condition;
pub mod filter;
pub mod map;
pub mod reduce;
pub mod sort;

pub use condition::{parse_condition, CompareOp, Condition, Literal};
pub use filter::{filter, filter_where};
pub use map::{map, try_map};
pub use reduce::{aggregate, reduce, ReduceOp};
pub use sort::{sort_by, SortKey};
