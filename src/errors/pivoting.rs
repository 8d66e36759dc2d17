//! Pivot-table errors (codes `4000-4999`).

use super::validation::{ColumnNotFoundError, EmptyDatasetError};

error_record! {
    /// The aggregation function named for the pivot is not supported.
    #[error("unsupported pivot aggregation '{function}' (supported: {supported:?})")]
    InvalidAggFunctionError => InvalidAggFunction {
        function: String,
        supported: Vec<String>,
    }
}

error_record! {
    /// The pivot index has repeated entries and no aggregation was requested.
    #[error("pivot index {index:?} has {duplicate_count} duplicate entries")]
    DuplicatePivotIndexError => DuplicatePivotIndex {
        index: Vec<String>,
        duplicate_count: usize,
    }
}

error_record! {
    /// The pivot could not be computed.
    #[error("pivot failed: {message}")]
    PivotFailedError => PivotFailed {
        message: String,
    }
}

error_union! {
    /// Failure contract of pivot operations.
    PivotError {
        ColumnNotFound(ColumnNotFoundError),
        EmptyDataset(EmptyDatasetError),
        InvalidAggFunction(InvalidAggFunctionError),
        DuplicatePivotIndex(DuplicatePivotIndexError),
        PivotFailed(PivotFailedError),
    }
}
