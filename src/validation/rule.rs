//! Declarative data-quality rules and their checks.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{
    DateOutOfRangeError, DisallowedValueError, DuplicateRowsError, DuplicateValuesError, InvalidRuleError,
    NullValueError, PatternMismatchError, RuleError, TypeMismatchError, ValueOutOfRangeError,
};
use crate::types::{cell_at, DataSet, DataType, Record, Value};

/// Maximum number of offending values or rows kept in a violation.
pub const SAMPLE_LIMIT: usize = 5;

/// One data-quality rule.
///
/// Rules deserialize from JSON objects tagged by `rule`:
///
/// ```rust
/// use tablekit::validation::Rule;
///
/// let rules: Vec<Rule> = serde_json::from_str(r#"[
///     {"rule": "not_null", "column": "id"},
///     {"rule": "range", "column": "age", "min": 0, "max": 130}
/// ]"#).unwrap();
/// assert_eq!(rules[0], Rule::NotNull { column: "id".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Numeric values must lie in `[min, max]`; a missing bound is open.
    Range {
        column: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// No nulls.
    NotNull { column: String },
    /// Non-null values must not repeat.
    Unique { column: String },
    /// Every non-null string must match the whole pattern.
    Pattern { column: String, pattern: String },
    /// Non-null values, rendered as text, must be in the list.
    AllowedValues { column: String, allowed: Vec<String> },
    /// Dates must lie in `[earliest, latest]`.
    DateRange {
        column: String,
        #[serde(default)]
        earliest: Option<NaiveDate>,
        #[serde(default)]
        latest: Option<NaiveDate>,
    },
    /// The column and each of its values must have the given type.
    ColumnType { column: String, expected: DataType },
    /// No two rows may agree on `columns` (all columns when empty).
    DuplicateRows {
        #[serde(default)]
        columns: Vec<String>,
    },
}

impl Rule {
    /// Short name used in logs and `InvalidRuleError`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::NotNull { .. } => "not_null",
            Self::Unique { .. } => "unique",
            Self::Pattern { .. } => "pattern",
            Self::AllowedValues { .. } => "allowed_values",
            Self::DateRange { .. } => "date_range",
            Self::ColumnType { .. } => "column_type",
            Self::DuplicateRows { .. } => "duplicate_rows",
        }
    }

    /// Check the rule, reporting its first violation.
    pub(crate) fn check(&self, ds: &DataSet) -> Result<(), RuleError> {
        match self {
            Self::Range { column, min, max } => check_range(ds, column, *min, *max),
            Self::NotNull { column } => check_not_null(ds, column),
            Self::Unique { column } => check_unique(ds, column),
            Self::Pattern { column, pattern } => check_pattern(ds, column, pattern),
            Self::AllowedValues { column, allowed } => check_allowed(ds, column, allowed),
            Self::DateRange { column, earliest, latest } => check_dates(ds, column, *earliest, *latest),
            Self::ColumnType { column, expected } => check_type(ds, column, *expected),
            Self::DuplicateRows { columns } => check_duplicate_rows(ds, columns),
        }
    }
}

fn column_of<'a>(ds: &'a DataSet, column: &str) -> Result<(DataType, Vec<&'a Value>), RuleError> {
    let values = ds.column(column).into_result()?;
    let dtype = ds.schema.field(column).into_result()?.data_type;
    Ok((dtype, values))
}

fn require_type(column: &str, actual: DataType, ok: bool, expected: DataType) -> Result<(), RuleError> {
    if ok {
        Ok(())
    } else {
        Err(TypeMismatchError::new(column.to_string(), expected, actual).into())
    }
}

fn invalid(rule: &str, reason: String) -> RuleError {
    InvalidRuleError::new(rule.to_string(), reason).into()
}

// Hash key for values; f64 has no `Hash`, and the debug form distinguishes types.
fn key_of(value: &Value) -> String {
    format!("{value:?}")
}

fn check_range(ds: &DataSet, column: &str, min: Option<f64>, max: Option<f64>) -> Result<(), RuleError> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(invalid("range", format!("min {lo} is greater than max {hi}")));
        }
    }
    let (dtype, values) = column_of(ds, column)?;
    require_type(column, dtype, dtype.is_numeric(), DataType::Float64)?;

    let in_range = |v: f64| min.is_none_or(|lo| v >= lo) && max.is_none_or(|hi| v <= hi);
    for (row, value) in values.iter().enumerate() {
        if let crate::fp::Maybe::Some(v) = value.as_f64() {
            if !in_range(v) {
                return Err(ValueOutOfRangeError::new(column.to_string(), min, max, v, row).into());
            }
        }
    }
    Ok(())
}

fn check_not_null(ds: &DataSet, column: &str) -> Result<(), RuleError> {
    let (_, values) = column_of(ds, column)?;
    let rows: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_null())
        .map(|(i, _)| i)
        .collect();
    if rows.is_empty() {
        return Ok(());
    }
    let null_count = rows.len();
    Err(NullValueError::new(column.to_string(), null_count, rows.into_iter().take(SAMPLE_LIMIT).collect()).into())
}

fn check_unique(ds: &DataSet, column: &str) -> Result<(), RuleError> {
    let (_, values) = column_of(ds, column)?;
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut duplicate_count = 0;
    let mut sample = Vec::new();
    for value in values.into_iter().filter(|v| !v.is_null()) {
        let count = seen.entry(key_of(value)).or_insert(0);
        *count += 1;
        if *count > 1 {
            duplicate_count += 1;
            if *count == 2 && sample.len() < SAMPLE_LIMIT {
                sample.push(value.clone());
            }
        }
    }
    if duplicate_count == 0 {
        return Ok(());
    }
    Err(DuplicateValuesError::new(column.to_string(), duplicate_count, sample).into())
}

fn check_pattern(ds: &DataSet, column: &str, pattern: &str) -> Result<(), RuleError> {
    let re = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| invalid("pattern", format!("invalid regex /{pattern}/: {e}")))?;
    let (dtype, values) = column_of(ds, column)?;
    require_type(column, dtype, dtype == DataType::Utf8, DataType::Utf8)?;

    let mismatches: Vec<&str> = values
        .iter()
        .filter_map(|v| match v {
            Value::Utf8(s) if !re.is_match(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    if mismatches.is_empty() {
        return Ok(());
    }
    Err(PatternMismatchError::new(
        column.to_string(),
        pattern.to_string(),
        mismatches.len(),
        mismatches.iter().take(SAMPLE_LIMIT).map(|s| s.to_string()).collect(),
    )
    .into())
}

fn check_allowed(ds: &DataSet, column: &str, allowed: &[String]) -> Result<(), RuleError> {
    let (_, values) = column_of(ds, column)?;
    let mut found: Vec<Value> = Vec::new();
    for value in values.into_iter().filter(|v| !v.is_null()) {
        let text = value.to_string();
        if !allowed.contains(&text) && !found.contains(value) {
            found.push(value.clone());
        }
    }
    if found.is_empty() {
        return Ok(());
    }
    found.truncate(SAMPLE_LIMIT);
    Err(DisallowedValueError::new(column.to_string(), allowed.to_vec(), found).into())
}

fn check_dates(
    ds: &DataSet,
    column: &str,
    earliest: Option<NaiveDate>,
    latest: Option<NaiveDate>,
) -> Result<(), RuleError> {
    if let (Some(lo), Some(hi)) = (earliest, latest) {
        if lo > hi {
            return Err(invalid("date_range", format!("earliest {lo} is after latest {hi}")));
        }
    }
    let (dtype, values) = column_of(ds, column)?;
    require_type(column, dtype, dtype == DataType::Date, DataType::Date)?;

    for (row, value) in values.iter().enumerate() {
        if let Value::Date(d) = value {
            let before = earliest.is_some_and(|lo| *d < lo);
            let after = latest.is_some_and(|hi| *d > hi);
            if before || after {
                return Err(DateOutOfRangeError::new(column.to_string(), earliest, latest, *d, row).into());
            }
        }
    }
    Ok(())
}

fn check_type(ds: &DataSet, column: &str, expected: DataType) -> Result<(), RuleError> {
    let (dtype, values) = column_of(ds, column)?;
    require_type(column, dtype, dtype == expected, expected)?;
    for value in values {
        if let crate::fp::Maybe::Some(actual) = value.data_type() {
            require_type(column, actual, actual == expected, expected)?;
        }
    }
    Ok(())
}

fn check_duplicate_rows(ds: &DataSet, columns: &[String]) -> Result<(), RuleError> {
    let columns: Vec<String> = if columns.is_empty() {
        ds.schema.field_names().map(str::to_string).collect()
    } else {
        columns.to_vec()
    };
    let mut idxs = Vec::with_capacity(columns.len());
    for column in &columns {
        idxs.push(ds.schema.column_index(column).into_result()?);
    }

    let mut seen: HashMap<Vec<String>, usize> = HashMap::new();
    let mut duplicate_count = 0;
    let mut sample: Vec<Record> = Vec::new();
    for row in &ds.rows {
        let key: Vec<String> = idxs.iter().map(|&i| key_of(cell_at(row, i))).collect();
        let count = seen.entry(key).or_insert(0);
        *count += 1;
        if *count > 1 {
            duplicate_count += 1;
            if *count == 2 && sample.len() < SAMPLE_LIMIT {
                sample.push(columns.iter().cloned().zip(idxs.iter().map(|&i| cell_at(row, i).clone())).collect());
            }
        }
    }
    if duplicate_count == 0 {
        return Ok(());
    }
    Err(DuplicateRowsError::new(columns, duplicate_count, sample).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::types::{Field, Schema};

    fn people() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("email", DataType::Utf8),
                Field::new("age", DataType::Int64),
                Field::new("joined", DataType::Date),
            ]),
            vec![
                vec![
                    Value::Int64(1),
                    Value::Utf8("ada@example.com".to_string()),
                    Value::Int64(36),
                    Value::Date(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()),
                ],
                vec![
                    Value::Int64(2),
                    Value::Utf8("grace".to_string()),
                    Value::Int64(-4),
                    Value::Null,
                ],
                vec![
                    Value::Int64(2),
                    Value::Null,
                    Value::Int64(36),
                    Value::Date(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()),
                ],
            ],
        )
    }

    #[test]
    fn range_reports_first_offending_row() {
        let rule = Rule::Range { column: "age".to_string(), min: Some(0.0), max: None };
        match rule.check(&people()).unwrap_err() {
            RuleError::ValueOutOfRange(e) => {
                assert_eq!(*e.row(), 1);
                assert_eq!(*e.actual(), -4.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        let inverted = Rule::Range { column: "age".to_string(), min: Some(5.0), max: Some(1.0) };
        assert_eq!(inverted.check(&people()).unwrap_err().error_type(), "InvalidRuleError");
    }

    #[test]
    fn not_null_and_unique() {
        let err = Rule::NotNull { column: "email".to_string() }.check(&people()).unwrap_err();
        assert_eq!(err, RuleError::NullValue(NullValueError::new("email".to_string(), 1, vec![2])));

        let err = Rule::Unique { column: "id".to_string() }.check(&people()).unwrap_err();
        assert_eq!(
            err,
            RuleError::DuplicateValues(DuplicateValuesError::new("id".to_string(), 1, vec![Value::Int64(2)]))
        );
    }

    #[test]
    fn pattern_must_match_whole_value() {
        let rule = Rule::Pattern { column: "email".to_string(), pattern: r"[^@]+@[^@]+".to_string() };
        match rule.check(&people()).unwrap_err() {
            RuleError::PatternMismatch(e) => assert_eq!(e.sample(), &vec!["grace".to_string()]),
            other => panic!("unexpected {other:?}"),
        }
        let bad = Rule::Pattern { column: "email".to_string(), pattern: "(".to_string() };
        assert_eq!(bad.check(&people()).unwrap_err().error_code().value(), 11007);
        let wrong_type = Rule::Pattern { column: "age".to_string(), pattern: ".*".to_string() };
        assert_eq!(wrong_type.check(&people()).unwrap_err().error_type(), "TypeMismatchError");
    }

    #[test]
    fn dates_and_allowed_values() {
        let rule = Rule::DateRange {
            column: "joined".to_string(),
            earliest: NaiveDate::from_ymd_opt(2000, 1, 1),
            latest: None,
        };
        assert_eq!(rule.check(&people()).unwrap_err().error_code().value(), 11006);

        let rule = Rule::AllowedValues { column: "age".to_string(), allowed: vec!["36".to_string()] };
        match rule.check(&people()).unwrap_err() {
            RuleError::DisallowedValue(e) => assert_eq!(e.found(), &vec![Value::Int64(-4)]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_rows_over_key_columns() {
        let rule = Rule::DuplicateRows { columns: vec!["age".to_string()] };
        match rule.check(&people()).unwrap_err() {
            RuleError::DuplicateRows(e) => {
                assert_eq!(*e.duplicate_count(), 1);
                assert_eq!(e.sample()[0]["age"], Value::Int64(36));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Rule::DuplicateRows { columns: vec![] }.check(&people()).is_ok());
    }

    #[test]
    fn column_type_checks_schema_and_cells() {
        assert!(Rule::ColumnType { column: "id".to_string(), expected: DataType::Int64 }
            .check(&people())
            .is_ok());
        let err = Rule::ColumnType { column: "id".to_string(), expected: DataType::Utf8 }
            .check(&people())
            .unwrap_err();
        assert_eq!(err.to_string(), "column 'id' has type int64, expected utf8");
    }

    #[test]
    fn short_rows_count_as_nulls() {
        let mut ds = people();
        ds.rows.push(vec![Value::Int64(9)]);
        match (Rule::NotNull { column: "email".to_string() }).check(&ds).unwrap_err() {
            RuleError::NullValue(e) => assert_eq!(e.rows(), &vec![2, 3]),
            other => panic!("unexpected {other:?}"),
        }
        let err = (Rule::DuplicateRows { columns: vec!["email".to_string()] }).check(&ds).unwrap_err();
        assert_eq!(err.error_type(), "DuplicateRowsError");
    }
}
