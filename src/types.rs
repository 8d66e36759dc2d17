//! Core tabular data model.
//!
//! Every ingested file becomes an in-memory [`DataSet`] with a user-provided [`Schema`] (a list
//! of typed [`Field`]s). Rows are stored positionally; [`DataSet::record`] gives a name-keyed view.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{ColumnNotFoundError, RowArityMismatchError};
use crate::fp::{Maybe, Outcome};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Calendar date without time zone.
    Date,
}

impl DataType {
    /// Lowercase name used in messages and JSON (`"int64"`, `"utf8"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Utf8 => "utf8",
            Self::Date => "date",
        }
    }

    /// `true` for types that numeric aggregations accept.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the expected shape of incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Index of a field by name.
    pub fn index_of(&self, name: &str) -> Maybe<usize> {
        self.fields.iter().position(|f| f.name == name).into()
    }

    /// Index of a field by name, or a [`ColumnNotFoundError`] listing the columns that exist.
    pub fn column_index(&self, name: &str) -> Outcome<usize, ColumnNotFoundError> {
        self.index_of(name).ok_or_else(|| {
            ColumnNotFoundError::new(
                name.to_string(),
                self.field_names().map(str::to_string).collect(),
            )
        })
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Outcome<&Field, ColumnNotFoundError> {
        self.column_index(name).map(|idx| &self.fields[idx])
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Type of a non-null value.
    pub fn data_type(&self) -> Maybe<DataType> {
        match self {
            Self::Null => Maybe::Nothing,
            Self::Int64(_) => Maybe::Some(DataType::Int64),
            Self::Float64(_) => Maybe::Some(DataType::Float64),
            Self::Bool(_) => Maybe::Some(DataType::Bool),
            Self::Utf8(_) => Maybe::Some(DataType::Utf8),
            Self::Date(_) => Maybe::Some(DataType::Date),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view used by aggregations and range rules.
    pub fn as_f64(&self) -> Maybe<f64> {
        match self {
            Self::Int64(v) => Maybe::Some(*v as f64),
            Self::Float64(v) => Maybe::Some(*v),
            _ => Maybe::Nothing,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

// Null and non-finite floats have no JSON form and become `null`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Int64(v) => serializer.serialize_i64(*v),
            Self::Float64(v) if v.is_finite() => serializer.serialize_f64(*v),
            Self::Float64(_) => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Utf8(v) => serializer.serialize_str(v),
            Self::Date(v) => serializer.collect_str(&v.format("%Y-%m-%d")),
        }
    }
}

/// Cell `idx` of `row`. Cells past the end of a short row read as [`Value::Null`].
pub fn cell_at(row: &[Value], idx: usize) -> &Value {
    static NULL: Value = Value::Null;
    row.get(idx).unwrap_or(&NULL)
}

/// One row keyed by column name.
pub type Record = BTreeMap<String, Value>;

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row `index` as a name-keyed record.
    pub fn record(&self, index: usize) -> Maybe<Record> {
        Maybe::from(self.rows.get(index)).map(|row| {
            self.schema
                .field_names()
                .enumerate()
                .map(|(idx, name)| (name.to_string(), cell_at(row, idx).clone()))
                .collect()
        })
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Outcome<Vec<&Value>, ColumnNotFoundError> {
        self.schema
            .column_index(name)
            .map(|idx| self.rows.iter().map(|row| cell_at(row, idx)).collect())
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The first row whose mapped length differs from the schema's field count stops the
    /// mapping with a [`RowArityMismatchError`].
    pub fn map_rows<F>(&self, mut mapper: F) -> Outcome<Self, RowArityMismatchError>
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected = self.schema.fields.len();
        let mut rows = Vec::with_capacity(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate() {
            let out = mapper(row.as_slice());
            if out.len() != expected {
                return Outcome::Err(RowArityMismatchError::new(idx, expected, out.len()));
            }
            rows.push(out);
        }
        Outcome::Ok(Self {
            schema: self.schema.clone(),
            rows,
        })
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn people() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("name", DataType::Utf8),
            ]),
            vec![
                vec![Value::Int64(1), Value::Utf8("Ada".to_string())],
                vec![Value::Int64(2), Value::Null],
            ],
        )
    }

    #[test]
    fn column_index_reports_available_columns() {
        let ds = people();
        assert_eq!(ds.schema.column_index("name"), Outcome::Ok(1));
        let err = ds.schema.column_index("age").unwrap_err();
        assert_eq!(err.column(), "age");
        assert_eq!(err.available(), &vec!["id".to_string(), "name".to_string()]);
    }

    #[test]
    fn record_is_keyed_by_name() {
        let rec = people().record(0).unwrap();
        assert_eq!(rec["name"], Value::Utf8("Ada".to_string()));
        assert!(people().record(9).is_nothing());
    }

    #[test]
    fn short_rows_read_missing_cells_as_null() {
        let mut ds = people();
        ds.rows.push(vec![Value::Int64(3)]);
        let names = ds.column("name").unwrap();
        assert_eq!(names, vec![&Value::Utf8("Ada".to_string()), &Value::Null, &Value::Null]);
        assert_eq!(ds.record(2).unwrap()["name"], Value::Null);
        assert_eq!(cell_at(&[], 4), &Value::Null);
    }

    #[test]
    fn map_rows_rejects_wrong_arity() {
        let err = people().map_rows(|row| row[..1].to_vec()).unwrap_err();
        assert_eq!((*err.row(), *err.expected(), *err.actual()), (0, 2, 1));

        let ok = people().map_rows(|row| row.to_vec());
        assert_eq!(ok, Outcome::Ok(people()));
    }

    #[test]
    fn values_serialize_json_native() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let values = vec![
            Value::Null,
            Value::Int64(3),
            Value::Float64(f64::NAN),
            Value::Utf8("x".to_string()),
            Value::Date(date),
        ];
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!([null, 3, null, "x", "2024-02-29"])
        );
        assert_eq!(serde_json::to_value(DataType::Float64).unwrap(), json!("float64"));
        assert_eq!(DataType::Utf8.to_string(), "utf8");
    }
}
