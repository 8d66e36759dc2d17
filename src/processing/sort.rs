//! Multi-key row sorting for [`crate::types::DataSet`].

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::errors::{
    InvalidSortOrderError, MissingParameterError, MixedTypesError, NotSortableError, SortError,
};
use crate::fp::Outcome;
use crate::types::{cell_at, DataSet, Value};

/// One sort key: a column and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Build a key from a direction string (`asc`, `ascending`, `desc`, `descending`).
    pub fn parse(column: impl Into<String>, order: &str) -> Outcome<Self, InvalidSortOrderError> {
        match order.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Outcome::Ok(Self::asc(column)),
            "desc" | "descending" => Outcome::Ok(Self::desc(column)),
            _ => Outcome::Err(InvalidSortOrderError::new(order.to_string())),
        }
    }
}

/// Sort rows by `keys`, first key most significant.
///
/// The sort is stable and nulls sort last in either direction. A key column must hold a single
/// value type and no NaN.
pub fn sort_by(dataset: &DataSet, keys: &[SortKey]) -> Outcome<DataSet, SortError> {
    sort_inner(dataset, keys).into()
}

fn sort_inner(dataset: &DataSet, keys: &[SortKey]) -> Result<DataSet, SortError> {
    if keys.is_empty() {
        return Err(MissingParameterError::new("keys".to_string()).into());
    }

    let mut resolved = Vec::with_capacity(keys.len());
    for key in keys {
        let idx = dataset.schema.column_index(&key.column).into_result()?;
        check_sortable(dataset, &key.column, idx)?;
        resolved.push((idx, key.descending));
    }

    let mut rows = dataset.rows.clone();
    rows.sort_by(|a, b| {
        resolved
            .iter()
            .map(|&(idx, descending)| compare_cells(cell_at(a, idx), cell_at(b, idx), descending))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    tracing::debug!(keys = keys.len(), rows = rows.len(), "sorted rows");
    Ok(DataSet::new(dataset.schema.clone(), rows))
}

fn check_sortable(dataset: &DataSet, column: &str, idx: usize) -> Result<(), SortError> {
    let mut types = BTreeSet::new();
    for row in &dataset.rows {
        let cell = cell_at(row, idx);
        if matches!(cell, Value::Float64(v) if v.is_nan()) {
            return Err(NotSortableError::new(column.to_string(), "column contains NaN".to_string()).into());
        }
        if let crate::fp::Maybe::Some(t) = cell.data_type() {
            types.insert(t.name());
        }
    }
    if types.len() > 1 {
        return Err(MixedTypesError::new(column.to_string(), types.into_iter().map(str::to_string).collect()).into());
    }
    Ok(())
}

fn compare_cells(a: &Value, b: &Value, descending: bool) -> Ordering {
    let ord = match (a, b) {
        (Value::Null, Value::Null) => return Ordering::Equal,
        (Value::Null, _) => return Ordering::Greater,
        (_, Value::Null) => return Ordering::Less,
        (Value::Int64(x), Value::Int64(y)) => x.cmp(y),
        (Value::Float64(x), Value::Float64(y)) => x.total_cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Utf8(x), Value::Utf8(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        // Mixed columns are rejected before sorting.
        _ => Ordering::Equal,
    };
    if descending { ord.reverse() } else { ord }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::types::{DataType, Field, Schema};

    fn dataset(rows: Vec<Vec<Value>>) -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("team", DataType::Utf8),
                Field::new("score", DataType::Float64),
            ]),
            rows,
        )
    }

    fn row(team: &str, score: Option<f64>) -> Vec<Value> {
        vec![
            Value::Utf8(team.to_string()),
            score.map_or(Value::Null, Value::Float64),
        ]
    }

    #[test]
    fn multi_key_sort_is_stable_with_nulls_last() {
        let ds = dataset(vec![
            row("b", Some(1.0)),
            row("a", None),
            row("a", Some(2.0)),
            row("b", Some(1.0)),
            row("a", Some(3.0)),
        ]);
        let out = sort_by(&ds, &[SortKey::asc("team"), SortKey::desc("score")]).unwrap();
        assert_eq!(
            out.rows,
            vec![
                row("a", Some(3.0)),
                row("a", Some(2.0)),
                row("a", None),
                row("b", Some(1.0)),
                row("b", Some(1.0)),
            ]
        );
    }

    #[test]
    fn nan_and_mixed_types_are_rejected() {
        let ds = dataset(vec![row("a", Some(f64::NAN))]);
        let err = sort_by(&ds, &[SortKey::asc("score")]).unwrap_err();
        assert_eq!(err.error_code().value(), 3001);

        let mut ds = dataset(vec![row("a", Some(1.0)), row("b", Some(2.0))]);
        ds.rows[1][1] = Value::Utf8("x".to_string());
        match sort_by(&ds, &[SortKey::asc("score")]).unwrap_err() {
            SortError::MixedTypes(e) => assert_eq!(e.types(), &vec!["float64".to_string(), "utf8".to_string()]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn short_rows_sort_as_nulls() {
        let ds = dataset(vec![vec![Value::Utf8("b".to_string())], row("a", Some(2.0))]);
        let out = sort_by(&ds, &[SortKey::asc("score")]).unwrap();
        assert_eq!(out.rows[0], row("a", Some(2.0)));
        assert_eq!(out.rows[1], vec![Value::Utf8("b".to_string())]);
    }

    #[test]
    fn key_validation() {
        let ds = dataset(vec![]);
        assert_eq!(sort_by(&ds, &[]).unwrap_err().error_type(), "MissingParameterError");
        assert_eq!(
            sort_by(&ds, &[SortKey::asc("rank")]).unwrap_err().error_type(),
            "ColumnNotFoundError"
        );
        assert_eq!(SortKey::parse("x", "DESC"), Outcome::Ok(SortKey::desc("x")));
        assert_eq!(SortKey::parse("x", "up").unwrap_err().order(), "up");
    }
}
