//! Column transform errors (codes `9000-9999`).

use super::validation::{ColumnAlreadyExistsError, ColumnNotFoundError};
use crate::types::DataType;

error_record! {
    /// A computed-column expression is malformed.
    #[error("invalid expression '{expression}': {reason}")]
    InvalidExpressionError => InvalidExpression {
        expression: String,
        reason: String,
    }
}

error_record! {
    /// Some values could not be converted to the target type.
    #[error("cannot cast column '{column}' from {from_type} to {to_type}: {failed_count} values failed")]
    CastFailedError => CastFailed {
        column: String,
        from_type: DataType,
        to_type: DataType,
        failed_count: usize,
    }
}

error_record! {
    /// A division used a zero divisor.
    #[error("division by zero in column '{column}'")]
    DivisionByZeroError => DivisionByZero {
        column: String,
    }
}

error_record! {
    /// A row mapper returned the wrong number of cells.
    #[error("mapped row {row} has {actual} values, schema has {expected} fields")]
    RowArityMismatchError => RowArityMismatch {
        /// 0-based row index.
        row: usize,
        expected: usize,
        actual: usize,
    }
}

error_record! {
    /// A transform failed for another reason.
    #[error("transform failed: {message}")]
    TransformFailedError => TransformFailed {
        message: String,
    }
}

error_union! {
    /// Everything [`crate::processing::map`] and column transforms can fail with.
    TransformError {
        ColumnNotFound(ColumnNotFoundError),
        ColumnAlreadyExists(ColumnAlreadyExistsError),
        InvalidExpression(InvalidExpressionError),
        CastFailed(CastFailedError),
        DivisionByZero(DivisionByZeroError),
        RowArityMismatch(RowArityMismatchError),
        TransformFailed(TransformFailedError),
    }
}
