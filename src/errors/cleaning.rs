//! Cleaning errors (codes `8000-8999`).

use super::validation::{ColumnNotFoundError, TypeMismatchError};

error_record! {
    /// The fill strategy for missing values is unknown.
    #[error("unknown fill strategy '{strategy}' (supported: {supported:?})")]
    InvalidFillStrategyError => InvalidFillStrategy {
        strategy: String,
        supported: Vec<String>,
    }
}

error_record! {
    /// A threshold lies outside its allowed interval.
    #[error("threshold {threshold} is outside [{min}, {max}]")]
    InvalidThresholdError => InvalidThreshold {
        threshold: f64,
        min: f64,
        max: f64,
    }
}

error_record! {
    /// A cleaning step failed on a column.
    #[error("cleaning '{operation}' failed on column '{column}': {message}")]
    CleaningFailedError => CleaningFailed {
        column: String,
        operation: String,
        message: String,
    }
}

error_union! {
    /// Failure contract of cleaning operations.
    CleanError {
        ColumnNotFound(ColumnNotFoundError),
        TypeMismatch(TypeMismatchError),
        InvalidFillStrategy(InvalidFillStrategyError),
        InvalidThreshold(InvalidThresholdError),
        CleaningFailed(CleaningFailedError),
    }
}
