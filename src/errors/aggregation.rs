//! Aggregation errors (codes `6000-6999`).

use super::validation::{ColumnNotFoundError, EmptyDatasetError};
use crate::types::DataType;

error_record! {
    /// The aggregation is not defined for the column's type.
    #[error("aggregation '{operation}' is not supported for column '{column}' of type {dtype}")]
    UnsupportedAggregationError => UnsupportedAggregation {
        operation: String,
        column: String,
        dtype: DataType,
    }
}

error_record! {
    /// A numeric aggregation was requested over a non-numeric column.
    #[error("column '{column}' of type {dtype} is not numeric")]
    NonNumericColumnError => NonNumericColumn {
        column: String,
        dtype: DataType,
    }
}

error_record! {
    /// Grouping rows failed.
    #[error("group by {columns:?} failed: {message}")]
    GroupByFailedError => GroupByFailed {
        columns: Vec<String>,
        message: String,
    }
}

error_union! {
    /// Everything [`crate::processing::aggregate`] can fail with.
    AggregateError {
        ColumnNotFound(ColumnNotFoundError),
        EmptyDataset(EmptyDatasetError),
        UnsupportedAggregation(UnsupportedAggregationError),
        NonNumericColumn(NonNumericColumnError),
        GroupByFailed(GroupByFailedError),
    }
}
