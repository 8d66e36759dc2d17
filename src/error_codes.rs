//! Stable numeric error codes.
//!
//! Every error condition in the crate has exactly one [`ErrorCode`]. Codes are an external
//! compatibility contract for programmatic consumers: a value, once assigned, is never reused
//! for a different meaning. Gaps inside a band are reserved.
//!
//! | Range         | Category                      |
//! |---------------|-------------------------------|
//! | `1000-1999`   | input validation              |
//! | `2000-2999`   | filtering                     |
//! | `3000-3999`   | sorting                       |
//! | `4000-4999`   | pivoting                      |
//! | `5000-5999`   | parsing                       |
//! | `6000-6999`   | aggregation                   |
//! | `7000-7999`   | comparison                    |
//! | `8000-8999`   | cleaning                      |
//! | `9000-9999`   | transforming                  |
//! | `10000-10999` | joining                       |
//! | `11000-11999` | data-validation rules         |
//! | `12000-12999` | file handling                 |

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::fp::Maybe;

/// Subsystem band an error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Generic input validation (columns, parameters).
    Validation,
    /// Row filtering and condition handling.
    Filtering,
    /// Sorting.
    Sorting,
    /// Pivot tables.
    Pivoting,
    /// Value and expression parsing.
    Parsing,
    /// Aggregations and group-by.
    Aggregation,
    /// Dataset comparison.
    Comparison,
    /// Cleaning (fill, dedupe, trim).
    Cleaning,
    /// Column transforms and casts.
    Transforming,
    /// Joins and merges.
    Joining,
    /// Data-validation rules.
    DataValidation,
    /// Reading and writing files.
    FileHandling,
    /// Outside every known band.
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Filtering => "filtering",
            Self::Sorting => "sorting",
            Self::Pivoting => "pivoting",
            Self::Parsing => "parsing",
            Self::Aggregation => "aggregation",
            Self::Comparison => "comparison",
            Self::Cleaning => "cleaning",
            Self::Transforming => "transforming",
            Self::Joining => "joining",
            Self::DataValidation => "data_validation",
            Self::FileHandling => "file_handling",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Classify a raw integer code by band. Never fails: integers outside every band are
/// [`ErrorCategory::Unknown`].
pub fn error_category(code: u32) -> ErrorCategory {
    match code {
        1000..=1999 => ErrorCategory::Validation,
        2000..=2999 => ErrorCategory::Filtering,
        3000..=3999 => ErrorCategory::Sorting,
        4000..=4999 => ErrorCategory::Pivoting,
        5000..=5999 => ErrorCategory::Parsing,
        6000..=6999 => ErrorCategory::Aggregation,
        7000..=7999 => ErrorCategory::Comparison,
        8000..=8999 => ErrorCategory::Cleaning,
        9000..=9999 => ErrorCategory::Transforming,
        10000..=10999 => ErrorCategory::Joining,
        11000..=11999 => ErrorCategory::DataValidation,
        12000..=12999 => ErrorCategory::FileHandling,
        _ => ErrorCategory::Unknown,
    }
}

/// Registered error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    // -- Validation --
    InvalidParameter = 1001,
    MissingParameter = 1002,
    EmptyDataset = 1003,
    ConflictingOptions = 1004,
    ColumnNotFound = 1011,
    ColumnAlreadyExists = 1012,
    TypeMismatch = 1013,

    // -- Filtering --
    DangerousPattern = 2001,
    UnbalancedParentheses = 2002,
    InvalidCondition = 2003,
    QueryFailed = 2004,

    // -- Sorting --
    NotSortable = 3001,
    MixedTypes = 3002,
    InvalidSortOrder = 3003,

    // -- Pivoting --
    InvalidAggFunction = 4001,
    DuplicatePivotIndex = 4002,
    PivotFailed = 4003,

    // -- Parsing --
    ValueParse = 5001,
    InvalidDate = 5002,
    UnexpectedToken = 5003,

    // -- Aggregation --
    UnsupportedAggregation = 6001,
    NonNumericColumn = 6002,
    GroupByFailed = 6003,

    // -- Comparison --
    ShapeMismatch = 7001,
    KeyColumnMismatch = 7002,
    ComparisonFailed = 7003,

    // -- Cleaning --
    InvalidFillStrategy = 8001,
    InvalidThreshold = 8002,
    CleaningFailed = 8003,

    // -- Transforming --
    InvalidExpression = 9001,
    CastFailed = 9002,
    DivisionByZero = 9003,
    RowArityMismatch = 9004,
    TransformFailed = 9005,

    // -- Joining --
    JoinKeyNotFound = 10001,
    InvalidJoinType = 10002,
    KeyTypeMismatch = 10003,
    JoinFailed = 10004,

    // -- Data-validation rules --
    ValueOutOfRange = 11001,
    NullValue = 11002,
    DuplicateValues = 11003,
    PatternMismatch = 11004,
    DisallowedValue = 11005,
    DateOutOfRange = 11006,
    InvalidRule = 11007,
    DuplicateRows = 11008,

    // -- File handling --
    FileNotFound = 12001,
    PermissionDenied = 12002,
    UnsupportedFormat = 12003,
    FileRead = 12004,
    FileWrite = 12005,
    SheetNotFound = 12006,
    SchemaMismatch = 12007,
    EmptyFile = 12008,
}

impl ErrorCode {
    /// Every registered code, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        Self::InvalidParameter,
        Self::MissingParameter,
        Self::EmptyDataset,
        Self::ConflictingOptions,
        Self::ColumnNotFound,
        Self::ColumnAlreadyExists,
        Self::TypeMismatch,
        Self::DangerousPattern,
        Self::UnbalancedParentheses,
        Self::InvalidCondition,
        Self::QueryFailed,
        Self::NotSortable,
        Self::MixedTypes,
        Self::InvalidSortOrder,
        Self::InvalidAggFunction,
        Self::DuplicatePivotIndex,
        Self::PivotFailed,
        Self::ValueParse,
        Self::InvalidDate,
        Self::UnexpectedToken,
        Self::UnsupportedAggregation,
        Self::NonNumericColumn,
        Self::GroupByFailed,
        Self::ShapeMismatch,
        Self::KeyColumnMismatch,
        Self::ComparisonFailed,
        Self::InvalidFillStrategy,
        Self::InvalidThreshold,
        Self::CleaningFailed,
        Self::InvalidExpression,
        Self::CastFailed,
        Self::DivisionByZero,
        Self::RowArityMismatch,
        Self::TransformFailed,
        Self::JoinKeyNotFound,
        Self::InvalidJoinType,
        Self::KeyTypeMismatch,
        Self::JoinFailed,
        Self::ValueOutOfRange,
        Self::NullValue,
        Self::DuplicateValues,
        Self::PatternMismatch,
        Self::DisallowedValue,
        Self::DateOutOfRange,
        Self::InvalidRule,
        Self::DuplicateRows,
        Self::FileNotFound,
        Self::PermissionDenied,
        Self::UnsupportedFormat,
        Self::FileRead,
        Self::FileWrite,
        Self::SheetNotFound,
        Self::SchemaMismatch,
        Self::EmptyFile,
    ];

    /// The stable integer value.
    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Band this code belongs to.
    pub fn category(self) -> ErrorCategory {
        error_category(self.value())
    }

    /// Look up a registered code by its integer value.
    pub fn from_value(value: u32) -> Maybe<ErrorCode> {
        Self::ALL.iter().copied().find(|c| c.value() == value).into()
    }

    /// Stable symbolic name (e.g. `"COLUMN_NOT_FOUND"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::ConflictingOptions => "CONFLICTING_OPTIONS",
            Self::ColumnNotFound => "COLUMN_NOT_FOUND",
            Self::ColumnAlreadyExists => "COLUMN_ALREADY_EXISTS",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::DangerousPattern => "DANGEROUS_PATTERN",
            Self::UnbalancedParentheses => "UNBALANCED_PARENTHESES",
            Self::InvalidCondition => "INVALID_CONDITION",
            Self::QueryFailed => "QUERY_FAILED",
            Self::NotSortable => "NOT_SORTABLE",
            Self::MixedTypes => "MIXED_TYPES",
            Self::InvalidSortOrder => "INVALID_SORT_ORDER",
            Self::InvalidAggFunction => "INVALID_AGG_FUNCTION",
            Self::DuplicatePivotIndex => "DUPLICATE_PIVOT_INDEX",
            Self::PivotFailed => "PIVOT_FAILED",
            Self::ValueParse => "VALUE_PARSE",
            Self::InvalidDate => "INVALID_DATE",
            Self::UnexpectedToken => "UNEXPECTED_TOKEN",
            Self::UnsupportedAggregation => "UNSUPPORTED_AGGREGATION",
            Self::NonNumericColumn => "NON_NUMERIC_COLUMN",
            Self::GroupByFailed => "GROUP_BY_FAILED",
            Self::ShapeMismatch => "SHAPE_MISMATCH",
            Self::KeyColumnMismatch => "KEY_COLUMN_MISMATCH",
            Self::ComparisonFailed => "COMPARISON_FAILED",
            Self::InvalidFillStrategy => "INVALID_FILL_STRATEGY",
            Self::InvalidThreshold => "INVALID_THRESHOLD",
            Self::CleaningFailed => "CLEANING_FAILED",
            Self::InvalidExpression => "INVALID_EXPRESSION",
            Self::CastFailed => "CAST_FAILED",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::RowArityMismatch => "ROW_ARITY_MISMATCH",
            Self::TransformFailed => "TRANSFORM_FAILED",
            Self::JoinKeyNotFound => "JOIN_KEY_NOT_FOUND",
            Self::InvalidJoinType => "INVALID_JOIN_TYPE",
            Self::KeyTypeMismatch => "KEY_TYPE_MISMATCH",
            Self::JoinFailed => "JOIN_FAILED",
            Self::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            Self::NullValue => "NULL_VALUE",
            Self::DuplicateValues => "DUPLICATE_VALUES",
            Self::PatternMismatch => "PATTERN_MISMATCH",
            Self::DisallowedValue => "DISALLOWED_VALUE",
            Self::DateOutOfRange => "DATE_OUT_OF_RANGE",
            Self::InvalidRule => "INVALID_RULE",
            Self::DuplicateRows => "DUPLICATE_ROWS",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            Self::FileRead => "FILE_READ",
            Self::FileWrite => "FILE_WRITE",
            Self::SheetNotFound => "SHEET_NOT_FOUND",
            Self::SchemaMismatch => "SCHEMA_MISMATCH",
            Self::EmptyFile => "EMPTY_FILE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.value())
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.value()
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Self::from_value(raw)
            .into_option()
            .ok_or_else(|| de::Error::custom(format!("unregistered error code {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ErrorCode::ALL {
            assert!(seen.insert(code.value()), "duplicate value for {code:?}");
        }
    }

    #[test]
    fn symbolic_names_are_unique() {
        let mut seen = HashSet::new();
        for code in ErrorCode::ALL {
            assert!(seen.insert(code.as_str()), "duplicate name for {code:?}");
        }
    }

    #[test]
    fn all_is_sorted_and_complete() {
        let mut sorted = ErrorCode::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, ErrorCode::ALL);
        assert_eq!(ErrorCode::ALL.len(), 54);
    }

    #[test]
    fn no_registered_code_is_unknown() {
        for code in ErrorCode::ALL {
            assert_ne!(code.category(), ErrorCategory::Unknown, "{code:?}");
        }
    }

    #[test]
    fn pinned_values_never_change() {
        assert_eq!(ErrorCode::ColumnNotFound.value(), 1011);
        assert_eq!(ErrorCode::DangerousPattern.value(), 2001);
        assert_eq!(ErrorCode::UnbalancedParentheses.value(), 2002);
        assert_eq!(ErrorCode::ValueOutOfRange.value(), 11001);
        assert_eq!(ErrorCode::FileNotFound.value(), 12001);
        assert_eq!(ErrorCode::JoinKeyNotFound.value(), 10001);
    }

    #[test]
    fn category_by_band() {
        assert_eq!(error_category(1011), ErrorCategory::Validation);
        assert_eq!(error_category(2999), ErrorCategory::Filtering);
        assert_eq!(error_category(3000), ErrorCategory::Sorting);
        assert_eq!(error_category(9005), ErrorCategory::Transforming);
        assert_eq!(error_category(10004), ErrorCategory::Joining);
        assert_eq!(error_category(11008), ErrorCategory::DataValidation);
        assert_eq!(error_category(12001), ErrorCategory::FileHandling);
    }

    #[test]
    fn out_of_band_codes_are_unknown() {
        assert_eq!(error_category(0), ErrorCategory::Unknown);
        assert_eq!(error_category(999), ErrorCategory::Unknown);
        assert_eq!(error_category(13000), ErrorCategory::Unknown);
        assert_eq!(error_category(u32::MAX), ErrorCategory::Unknown);
    }

    #[test]
    fn from_value_finds_registered_codes_only() {
        assert_eq!(ErrorCode::from_value(1011), Maybe::Some(ErrorCode::ColumnNotFound));
        assert_eq!(ErrorCode::from_value(1005), Maybe::Nothing);
    }

    #[test]
    fn serde_uses_integer_value() {
        let json = serde_json::to_string(&ErrorCode::ColumnNotFound).unwrap();
        assert_eq!(json, "1011");
        let back: ErrorCode = serde_json::from_str("12006").unwrap();
        assert_eq!(back, ErrorCode::SheetNotFound);
        assert!(serde_json::from_str::<ErrorCode>("42").is_err());
    }

    #[test]
    fn display_formats() {
        assert_eq!(ErrorCode::ColumnNotFound.to_string(), "COLUMN_NOT_FOUND (1011)");
        assert_eq!(ErrorCategory::DataValidation.to_string(), "data_validation");
    }
}
