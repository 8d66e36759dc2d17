//! Join errors (codes `10000-10999`).

use crate::types::DataType;

error_record! {
    /// A join key is missing on one side.
    #[error("join key '{key}' not found in {side} dataset")]
    JoinKeyNotFoundError => JoinKeyNotFound {
        key: String,
        /// `"left"` or `"right"`.
        side: String,
    }
}

error_record! {
    /// The requested join type is unknown.
    #[error("invalid join type '{join_type}' (supported: {supported:?})")]
    InvalidJoinTypeError => InvalidJoinType {
        join_type: String,
        supported: Vec<String>,
    }
}

error_record! {
    /// The key column has different types on each side.
    #[error("join key '{key}' has type {left_type} on the left and {right_type} on the right")]
    KeyTypeMismatchError => KeyTypeMismatch {
        key: String,
        left_type: DataType,
        right_type: DataType,
    }
}

error_record! {
    /// The join could not be computed.
    #[error("join failed: {message}")]
    JoinFailedError => JoinFailed {
        message: String,
    }
}

error_union! {
    /// Failure contract of join operations.
    JoinError {
        JoinKeyNotFound(JoinKeyNotFoundError),
        InvalidJoinType(InvalidJoinTypeError),
        KeyTypeMismatch(KeyTypeMismatchError),
        JoinFailed(JoinFailedError),
    }
}
