//! Dataset comparison errors (codes `7000-7999`).

use super::validation::{ColumnNotFoundError, TypeMismatchError};

error_record! {
    /// Two datasets compared cell-by-cell have different shapes.
    #[error("shape mismatch: left is {left_rows}x{left_columns}, right is {right_rows}x{right_columns}")]
    ShapeMismatchError => ShapeMismatch {
        left_rows: usize,
        left_columns: usize,
        right_rows: usize,
        right_columns: usize,
    }
}

error_record! {
    /// A key column exists on one side only.
    #[error("key column '{key}' is missing in the {missing_in} dataset")]
    KeyColumnMismatchError => KeyColumnMismatch {
        key: String,
        missing_in: String,
    }
}

error_record! {
    /// The comparison could not be computed.
    #[error("comparison failed: {message}")]
    ComparisonFailedError => ComparisonFailed {
        message: String,
    }
}

error_union! {
    /// Failure contract of dataset comparison.
    CompareError {
        ColumnNotFound(ColumnNotFoundError),
        TypeMismatch(TypeMismatchError),
        ShapeMismatch(ShapeMismatchError),
        KeyColumnMismatch(KeyColumnMismatchError),
        ComparisonFailed(ComparisonFailedError),
    }
}
