//! Row filtering for [`crate::types::DataSet`].

use crate::errors::{FilterError, QueryFailedError};
use crate::fp::Outcome;
use crate::types::{DataSet, Value};

use super::condition::parse_condition;

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Filter rows with a textual condition (see [`super::condition`] for the grammar).
///
/// The condition is parsed and checked against the schema before any row is touched. A cell
/// whose value contradicts its column type stops evaluation with a `QueryFailedError`.
pub fn filter_where(dataset: &DataSet, condition: &str) -> Outcome<DataSet, FilterError> {
    filter_where_inner(dataset, condition).into()
}

fn filter_where_inner(dataset: &DataSet, text: &str) -> Result<DataSet, FilterError> {
    let condition = parse_condition(text).into_result()?;
    condition.check(&dataset.schema).into_result()?;

    let mut rows = Vec::new();
    for (idx, row) in dataset.rows.iter().enumerate() {
        let keep = condition
            .evaluate(&dataset.schema, row)
            .map_err(|message| QueryFailedError::new(text.to_string(), format!("row {idx}: {message}")))?;
        if keep {
            rows.push(row.clone());
        }
    }
    tracing::debug!(condition = text, kept = rows.len(), total = dataset.row_count(), "filtered rows");
    Ok(DataSet::new(dataset.schema.clone(), rows))
}

#[cfg(test)]
mod tests {
    use super::{filter, filter_where};
    use crate::errors::{DomainError, FilterError};
    use crate::fp::some;
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
    fn filter_where_accepts_symbols_in_string_literals() {
        let mut ds = sample_dataset();
        ds.rows[1][2] = Value::Utf8("b@example.com".to_string());
        let out = filter_where(&ds, "name == 'b@example.com'").unwrap();
        assert_eq!(out.rows, vec![ds.rows[1].clone()]);
    }

    #[test]
    fn schema_index_of_works() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.index_of("id"), some(0));
        assert_eq!(ds.schema.index_of("name"), some(2));
        assert!(ds.schema.index_of("missing").is_nothing());
    }

    #[test]
    fn filter_rows_by_bool_predicate() {
        let ds = sample_dataset();
        let active_idx = ds.schema.index_of("active").unwrap();

        let out = filter(&ds, |row| matches!(row.get(active_idx), Some(Value::Bool(true))));

        assert_eq!(out.row_count(), 2);
        assert_eq!(out.schema, ds.schema);
        // Original unchanged
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn filter_where_matches_predicate_filter() {
        let ds = sample_dataset();
        let out = filter_where(&ds, "id > 1 and active == true").unwrap();
        assert_eq!(
            out.rows,
            vec![vec![Value::Int64(3), Value::Bool(true), Value::Utf8("c".to_string())]]
        );
        assert!(filter_where(&ds, "id > 10").unwrap().rows.is_empty());
    }

    #[test]
    fn filter_where_reports_missing_column() {
        let err = filter_where(&sample_dataset(), "age > 3").unwrap_err();
        match &err {
            FilterError::ColumnNotFound(e) => assert_eq!(e.column(), "age"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.error_code().value(), 1011);
    }

    #[test]
    fn filter_where_reports_cells_that_contradict_schema() {
        let mut ds = sample_dataset();
        ds.rows[1][0] = Value::Utf8("two".to_string());
        let err = filter_where(&ds, "id > 1").unwrap_err();
        assert_eq!(err.error_type(), "QueryFailedError");
        assert!(err.to_string().contains("row 1"));
    }
}
