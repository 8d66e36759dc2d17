//! Error records and the per-operation error unions.
//!
//! Every failure condition is one immutable record type (e.g. [`ColumnNotFoundError`]) holding
//! only the fields needed to explain it, plus its stable [`ErrorCode`]. Each operation family
//! declares a closed union of the records it may produce (e.g. [`FilterError`]); that union is
//! the operation's failure contract.
//!
//! Records are built once with `new` and read through accessors. Their fields are private, so
//! mutation after construction does not compile:
//!
//! ```compile_fail
//! use tablekit::errors::ColumnNotFoundError;
//!
//! let mut e = ColumnNotFoundError::new("Age".to_string(), vec!["Name".to_string()]);
//! e.column = "Email".to_string();
//! ```
//!
//! Two records with the same fields are equal:
//!
//! ```rust
//! use tablekit::errors::{error_to_dict, ColumnNotFoundError};
//!
//! let a = ColumnNotFoundError::new("Age".to_string(), vec!["Name".to_string()]);
//! let b = ColumnNotFoundError::new("Age".to_string(), vec!["Name".to_string()]);
//! assert_eq!(a, b);
//! assert_eq!(error_to_dict(&a)["error_code"], 1011);
//! ```

use crate::error_codes::ErrorCode;

/// Common interface of every error record and error union.
pub trait DomainError: std::error::Error {
    /// Stable numeric identity.
    fn error_code(&self) -> ErrorCode;

    /// Name of the concrete record type (e.g. `"ColumnNotFoundError"`).
    fn error_type(&self) -> &'static str;

    /// The record's diagnostic fields as JSON values.
    fn fields(&self) -> ErrorDict;
}

macro_rules! error_record {
    (
        $(#[$meta:meta])*
        $name:ident => $code:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
        $(#[$meta])*
        pub struct $name {
            $( $(#[$fmeta])* $field: $ty, )*
        }

        impl $name {
            /// Stable code shared by every instance.
            pub const CODE: $crate::error_codes::ErrorCode = $crate::error_codes::ErrorCode::$code;

            /// Build the record.
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: $ty),*) -> Self {
                Self { $($field),* }
            }

            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> &$ty {
                    &self.$field
                }
            )*
        }

        impl $crate::errors::DomainError for $name {
            fn error_code(&self) -> $crate::error_codes::ErrorCode {
                Self::CODE
            }

            fn error_type(&self) -> &'static str {
                stringify!($name)
            }

            fn fields(&self) -> $crate::errors::ErrorDict {
                $crate::errors::serialize::record_fields(self)
            }
        }
    };
}

macro_rules! error_union {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident($inner:ty) ),* $(,)? }
    ) => {
        #[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
        $(#[$meta])*
        #[serde(untagged)]
        pub enum $name {
            $(
                #[error(transparent)]
                $variant(#[from] $inner),
            )*
        }

        impl $crate::errors::DomainError for $name {
            fn error_code(&self) -> $crate::error_codes::ErrorCode {
                match self {
                    $( Self::$variant(e) => $crate::errors::DomainError::error_code(e), )*
                }
            }

            fn error_type(&self) -> &'static str {
                match self {
                    $( Self::$variant(e) => $crate::errors::DomainError::error_type(e), )*
                }
            }

            fn fields(&self) -> $crate::errors::ErrorDict {
                match self {
                    $( Self::$variant(e) => $crate::errors::DomainError::fields(e), )*
                }
            }
        }
    };
}

pub mod aggregation;
pub mod cleaning;
pub mod comparison;
pub mod file;
pub mod filtering;
pub mod joining;
pub mod parsing;
pub mod pivoting;
pub mod rules;
pub mod serialize;
pub mod sorting;
pub mod transforming;
pub mod validation;

pub use aggregation::{AggregateError, GroupByFailedError, NonNumericColumnError, UnsupportedAggregationError};
pub use cleaning::{CleanError, CleaningFailedError, InvalidFillStrategyError, InvalidThresholdError};
pub use comparison::{CompareError, ComparisonFailedError, KeyColumnMismatchError, ShapeMismatchError};
pub use file::{
    EmptyFileError, FileError, FileNotFoundError, FileReadError, FileWriteError, PermissionDeniedError,
    SchemaMismatchError, SheetNotFoundError, UnsupportedFormatError,
};
pub use filtering::{
    DangerousPatternError, FilterError, InvalidConditionError, QueryFailedError, UnbalancedParenthesesError,
};
pub use joining::{InvalidJoinTypeError, JoinError, JoinFailedError, JoinKeyNotFoundError, KeyTypeMismatchError};
pub use parsing::{InvalidDateError, ParseError, UnexpectedTokenError, ValueParseError};
pub use pivoting::{DuplicatePivotIndexError, InvalidAggFunctionError, PivotError, PivotFailedError};
pub use rules::{
    DateOutOfRangeError, DisallowedValueError, DuplicateRowsError, DuplicateValuesError, InvalidRuleError,
    NullValueError, PatternMismatchError, RuleError, ValueOutOfRangeError,
};
pub use serialize::{error_code_value, error_to_dict, opaque_error_to_dict, ErrorDict};
pub use sorting::{InvalidSortOrderError, MixedTypesError, NotSortableError, SortError};
pub use transforming::{
    CastFailedError, DivisionByZeroError, InvalidExpressionError, RowArityMismatchError, TransformError,
    TransformFailedError,
};
pub use validation::{
    ColumnAlreadyExistsError, ColumnNotFoundError, ConflictingOptionsError, EmptyDatasetError,
    InvalidParameterError, MissingParameterError, TypeMismatchError, ValidationError,
};
