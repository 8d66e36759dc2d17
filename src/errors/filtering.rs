//! Row-filtering errors (codes `2000-2999`).

use super::parsing::UnexpectedTokenError;
use super::validation::{ColumnNotFoundError, TypeMismatchError};

error_record! {
    /// A condition contains a construct that is never evaluated.
    #[error("condition contains forbidden pattern '{pattern}': {condition}")]
    DangerousPatternError => DangerousPattern {
        pattern: String,
        condition: String,
    }
}

error_record! {
    /// Opening and closing parentheses do not pair up.
    #[error("unbalanced parentheses: {open_count} '(' vs {close_count} ')'")]
    UnbalancedParenthesesError => UnbalancedParentheses {
        open_count: usize,
        close_count: usize,
    }
}

error_record! {
    /// A condition is syntactically valid but cannot be applied.
    #[error("invalid condition '{condition}': {reason}")]
    InvalidConditionError => InvalidCondition {
        condition: String,
        reason: String,
    }
}

error_record! {
    /// Evaluating a condition against the data failed.
    #[error("query '{condition}' failed: {message}")]
    QueryFailedError => QueryFailed {
        condition: String,
        message: String,
    }
}

error_union! {
    /// Everything [`crate::processing::parse_condition`] and
    /// [`crate::processing::filter_where`] can fail with.
    FilterError {
        DangerousPattern(DangerousPatternError),
        UnbalancedParentheses(UnbalancedParenthesesError),
        InvalidCondition(InvalidConditionError),
        UnexpectedToken(UnexpectedTokenError),
        ColumnNotFound(ColumnNotFoundError),
        TypeMismatch(TypeMismatchError),
        QueryFailed(QueryFailedError),
    }
}
