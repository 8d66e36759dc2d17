//! Reduction operations for [`crate::types::DataSet`].

use std::cmp::Ordering;

use crate::errors::{
    AggregateError, EmptyDatasetError, NonNumericColumnError, UnsupportedAggregationError,
};
use crate::fp::{Maybe, Outcome};
use crate::types::{cell_at, DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum value, ignoring nulls.
    Min,
    /// Maximum value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
}

impl ReduceOp {
    pub fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
        }
    }
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - `Count` works on any column and counts nulls.
/// - `Sum`/`Mean` need a numeric column (`NonNumericColumnError` otherwise).
/// - `Min`/`Max` work on numeric, string and date columns; bool columns give
///   `UnsupportedAggregationError`.
/// - Every operation except `Count` needs at least one row (`EmptyDatasetError`).
/// - If every value is null the result is [`Value::Null`]. An integer sum that overflows `i64`
///   is returned as a `Float64` sum instead.
pub fn aggregate(dataset: &DataSet, column: &str, op: ReduceOp) -> Outcome<Value, AggregateError> {
    aggregate_inner(dataset, column, op).into()
}

/// Optional-lookup form of [`aggregate`]: any failure becomes `Nothing`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Maybe<Value> {
    aggregate(dataset, column, op).ok_value()
}

fn aggregate_inner(dataset: &DataSet, column: &str, op: ReduceOp) -> Result<Value, AggregateError> {
    let idx = dataset.schema.column_index(column).into_result()?;
    let dtype = dataset.schema.fields[idx].data_type;

    if op == ReduceOp::Count {
        return Ok(Value::Int64(dataset.row_count() as i64));
    }
    if dataset.is_empty() {
        return Err(EmptyDatasetError::new(format!("{}({column})", op.name())).into());
    }

    let values = dataset.rows.iter().map(|row| cell_at(row, idx)).filter(|v| !v.is_null());
    match (op, dtype) {
        (ReduceOp::Sum | ReduceOp::Mean, d) if !d.is_numeric() => {
            Err(NonNumericColumnError::new(column.to_string(), dtype).into())
        }
        (ReduceOp::Min | ReduceOp::Max, DataType::Bool) => Err(UnsupportedAggregationError::new(
            op.name().to_string(),
            column.to_string(),
            dtype,
        )
        .into()),
        (ReduceOp::Sum, DataType::Int64) => {
            let ints: Vec<i64> = values
                .filter_map(|v| match v {
                    Value::Int64(n) => Some(*n),
                    _ => None,
                })
                .collect();
            Ok(sum_ints(&ints))
        }
        (ReduceOp::Sum, _) => Ok(values
            .filter_map(|v| v.as_f64().into_option())
            .reduce(|a, b| a + b)
            .map_or(Value::Null, Value::Float64)),
        (ReduceOp::Mean, _) => {
            let (sum, n) = values
                .filter_map(|v| v.as_f64().into_option())
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            Ok(if n == 0 { Value::Null } else { Value::Float64(sum / n as f64) })
        }
        (ReduceOp::Min, _) => Ok(values.min_by(|a, b| order(a, b)).cloned().unwrap_or(Value::Null)),
        (ReduceOp::Max, _) => Ok(values.max_by(|a, b| order(a, b)).cloned().unwrap_or(Value::Null)),
        (ReduceOp::Count, _) => Ok(Value::Int64(dataset.row_count() as i64)),
    }
}

fn sum_ints(ints: &[i64]) -> Value {
    if ints.is_empty() {
        return Value::Null;
    }
    match ints.iter().try_fold(0i64, |acc, &n| acc.checked_add(n)) {
        Some(total) => Value::Int64(total),
        None => {
            tracing::debug!(values = ints.len(), "integer sum overflowed, widening to float");
            Value::Float64(ints.iter().map(|&n| n as f64).sum())
        }
    }
}

fn order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int64(x), Value::Int64(y)) => x.cmp(y),
        (Value::Float64(x), Value::Float64(y)) => x.total_cmp(y),
        (Value::Utf8(x), Value::Utf8(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
