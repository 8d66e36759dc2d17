//! Row mapping for [`crate::types::DataSet`].

use crate::errors::{RowArityMismatchError, TransformError};
use crate::fp::Outcome;
use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] by applying `mapper` to every row.
///
/// This is a convenience wrapper around [`DataSet::map_rows`]: a mapped row with the wrong
/// number of values stops the mapping with a `RowArityMismatchError`.
pub fn map<F>(dataset: &DataSet, mapper: F) -> Outcome<DataSet, TransformError>
where
    F: FnMut(&[Value]) -> Vec<Value>,
{
    dataset.map_rows(mapper).map_err(TransformError::from)
}

/// Like [`map`], with a mapper that may itself fail. The first failing row stops the mapping
/// and later rows are never visited.
pub fn try_map<F>(dataset: &DataSet, mut mapper: F) -> Outcome<DataSet, TransformError>
where
    F: FnMut(&[Value]) -> Outcome<Vec<Value>, TransformError>,
{
    let expected = dataset.schema.fields.len();
    let mut rows = Vec::with_capacity(dataset.row_count());
    for (idx, row) in dataset.rows.iter().enumerate() {
        let out = match mapper(row.as_slice()) {
            Outcome::Ok(out) => out,
            Outcome::Err(e) => {
                tracing::warn!(row = idx, "row mapping failed: {e}");
                return Outcome::Err(e);
            }
        };
        if out.len() != expected {
            return Outcome::Err(RowArityMismatchError::new(idx, expected, out.len()).into());
        }
        rows.push(out);
    }
    Outcome::Ok(DataSet::new(dataset.schema.clone(), rows))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{map, try_map};
    use crate::errors::{DivisionByZeroError, DomainError, TransformError};
    use crate::fp::Outcome;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("active", DataType::Bool),
            Field::new("name", DataType::Utf8),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Bool(true), Value::Utf8("a".to_string())],
            vec![Value::Int64(2), Value::Bool(false), Value::Utf8("b".to_string())],
            vec![Value::Int64(3), Value::Bool(true), Value::Utf8("c".to_string())],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn map_rows_transforms_values_and_preserves_schema() {
        let ds = sample_dataset();
        let out = map(&ds, |row| {
            let id = match &row[0] {
                Value::Int64(v) => Value::Int64(v + 10),
                other => other.clone(),
            };
            let name = match &row[2] {
                Value::Utf8(s) => Value::Utf8(s.to_uppercase()),
                other => other.clone(),
            };
            vec![id, row[1].clone(), name]
        })
        .unwrap();

        assert_eq!(out.schema, ds.schema);
        assert_eq!(
            out.rows[0],
            vec![Value::Int64(11), Value::Bool(true), Value::Utf8("A".to_string())]
        );
        // Original unchanged
        assert_eq!(ds.rows[0][0], Value::Int64(1));
    }

    #[test]
    fn map_reports_wrong_arity() {
        let err = map(&sample_dataset(), |_row| vec![Value::Int64(1)]).unwrap_err();
        assert_eq!(err.error_type(), "RowArityMismatchError");
        assert_eq!(err.to_string(), "mapped row 0 has 1 values, schema has 3 fields");
    }

    #[test]
    fn try_map_stops_at_first_failure() {
        let visited = Cell::new(0);
        let out = try_map(&sample_dataset(), |row| {
            visited.set(visited.get() + 1);
            match &row[0] {
                Value::Int64(2) => Outcome::Err(DivisionByZeroError::new("id".to_string()).into()),
                _ => Outcome::Ok(row.to_vec()),
            }
        });
        assert_eq!(
            out,
            Outcome::Err(TransformError::DivisionByZero(DivisionByZeroError::new("id".to_string())))
        );
        assert_eq!(visited.get(), 2);
    }
}
