//! Data-quality rule violations (codes `11000-11999`).
//!
//! These are produced by [`crate::validation`] when a dataset breaks a declared rule. Samples
//! are bounded so a report on a large file stays small.

use std::fmt;

use chrono::NaiveDate;

use super::validation::{ColumnNotFoundError, TypeMismatchError};
use crate::types::{Record, Value};

/// Renders an optional bound as the value or `-inf`/`+inf`.
struct Bound<'a, T>(&'a Option<T>, &'static str);

impl<T: fmt::Display> fmt::Display for Bound<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str(self.1),
        }
    }
}

error_record! {
    /// A numeric value lies outside the allowed range.
    #[error(
        "value {actual} in column '{column}' at row {row} is outside [{}, {}]",
        Bound(.min, "-inf"),
        Bound(.max, "+inf")
    )]
    ValueOutOfRangeError => ValueOutOfRange {
        column: String,
        min: Option<f64>,
        max: Option<f64>,
        actual: f64,
        /// 0-based row index of the first offending value.
        row: usize,
    }
}

error_record! {
    /// A column that must be fully populated has nulls.
    #[error("column '{column}' has {null_count} null values")]
    NullValueError => NullValue {
        column: String,
        null_count: usize,
        /// First offending row indexes.
        rows: Vec<usize>,
    }
}

error_record! {
    /// A column that must be unique repeats values.
    #[error("column '{column}' has {duplicate_count} duplicate values")]
    DuplicateValuesError => DuplicateValues {
        column: String,
        duplicate_count: usize,
        sample: Vec<Value>,
    }
}

error_record! {
    /// String values do not match the required pattern.
    #[error("{mismatch_count} values in column '{column}' do not match /{pattern}/")]
    PatternMismatchError => PatternMismatch {
        column: String,
        pattern: String,
        mismatch_count: usize,
        sample: Vec<String>,
    }
}

error_record! {
    /// Values fall outside an enumerated allow-list.
    #[error("column '{column}' has values outside {allowed:?}")]
    DisallowedValueError => DisallowedValue {
        column: String,
        allowed: Vec<String>,
        found: Vec<Value>,
    }
}

error_record! {
    /// A date lies outside the allowed window.
    #[error(
        "date {actual} in column '{column}' at row {row} is outside [{}, {}]",
        Bound(.earliest, "-inf"),
        Bound(.latest, "+inf")
    )]
    DateOutOfRangeError => DateOutOfRange {
        column: String,
        earliest: Option<NaiveDate>,
        latest: Option<NaiveDate>,
        actual: NaiveDate,
        row: usize,
    }
}

error_record! {
    /// A rule definition itself is unusable.
    #[error("invalid rule '{rule}': {reason}")]
    InvalidRuleError => InvalidRule {
        rule: String,
        reason: String,
    }
}

error_record! {
    /// Whole rows repeat over the given key columns.
    #[error("{duplicate_count} duplicate rows over columns {columns:?}")]
    DuplicateRowsError => DuplicateRows {
        columns: Vec<String>,
        duplicate_count: usize,
        sample: Vec<Record>,
    }
}

error_union! {
    /// Everything a data-quality rule can report.
    RuleError {
        ColumnNotFound(ColumnNotFoundError),
        TypeMismatch(TypeMismatchError),
        ValueOutOfRange(ValueOutOfRangeError),
        NullValue(NullValueError),
        DuplicateValues(DuplicateValuesError),
        PatternMismatch(PatternMismatchError),
        DisallowedValue(DisallowedValueError),
        DateOutOfRange(DateOutOfRangeError),
        InvalidRule(InvalidRuleError),
        DuplicateRows(DuplicateRowsError),
    }
}
