//! Generic input-validation errors (codes `1000-1999`).

use crate::types::DataType;

error_record! {
    /// A parameter has a value the operation cannot use.
    #[error("invalid value '{value}' for parameter '{parameter}': {reason}")]
    InvalidParameterError => InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    }
}

error_record! {
    /// A required parameter was not supplied.
    #[error("missing required parameter '{parameter}'")]
    MissingParameterError => MissingParameter {
        parameter: String,
    }
}

error_record! {
    /// The operation needs at least one row.
    #[error("operation '{operation}' requires a non-empty dataset")]
    EmptyDatasetError => EmptyDataset {
        operation: String,
    }
}

error_record! {
    /// Two or more options cannot be combined.
    #[error("conflicting options {options:?}: {reason}")]
    ConflictingOptionsError => ConflictingOptions {
        options: Vec<String>,
        reason: String,
    }
}

error_record! {
    /// A referenced column does not exist.
    #[error("column '{column}' not found (available: {available:?})")]
    ColumnNotFoundError => ColumnNotFound {
        /// The requested column.
        column: String,
        /// Columns that do exist, in schema order.
        available: Vec<String>,
    }
}

error_record! {
    /// A column would be created under a name that is already taken.
    #[error("column '{column}' already exists")]
    ColumnAlreadyExistsError => ColumnAlreadyExists {
        column: String,
    }
}

error_record! {
    /// A column has a different type than the operation requires.
    #[error("column '{column}' has type {actual}, expected {expected}")]
    TypeMismatchError => TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    }
}

error_union! {
    /// Failures of generic parameter and column validation.
    ValidationError {
        InvalidParameter(InvalidParameterError),
        MissingParameter(MissingParameterError),
        EmptyDataset(EmptyDatasetError),
        ConflictingOptions(ConflictingOptionsError),
        ColumnNotFound(ColumnNotFoundError),
        ColumnAlreadyExists(ColumnAlreadyExistsError),
        TypeMismatch(TypeMismatchError),
    }
}
