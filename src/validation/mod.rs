//! Data-quality validation over an in-memory [`crate::types::DataSet`].
//!
//! [`validate`] runs every rule and collects all violations; [`validate_strict`] stops at the
//! first one. Violations are [`crate::errors::RuleError`] values, so they carry error codes and
//! serialize with [`crate::errors::error_to_dict`].
//!
//! ```rust
//! use tablekit::errors::DomainError;
//! use tablekit::validation::{validate, Rule};
//! use tablekit::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![Field::new("id", DataType::Int64)]),
//!     vec![vec![Value::Int64(1)], vec![Value::Null]],
//! );
//! let report = validate(&ds, &[Rule::NotNull { column: "id".to_string() }]);
//! assert!(!report.is_valid());
//! assert_eq!(report.violations[0].error_code().value(), 11002);
//! ```

pub mod rule;

pub use rule::{Rule, SAMPLE_LIMIT};

use serde::Serialize;

use crate::errors::{error_to_dict, DomainError, ErrorDict, RuleError};
use crate::fp::Outcome;
use crate::types::DataSet;

/// Result of running a rule set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub rows_checked: usize,
    pub rules_checked: usize,
    pub violations: Vec<RuleError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations as error dicts, in rule order.
    pub fn error_dicts(&self) -> Vec<ErrorDict> {
        self.violations.iter().map(|v| error_to_dict(v)).collect()
    }
}

/// Run every rule and collect one violation per failing rule.
pub fn validate(dataset: &DataSet, rules: &[Rule]) -> ValidationReport {
    let violations: Vec<RuleError> = rules
        .iter()
        .filter_map(|rule| match rule.check(dataset) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(rule = rule.name(), error_code = e.error_code().value(), "{e}");
                Some(e)
            }
        })
        .collect();
    tracing::debug!(rules = rules.len(), violations = violations.len(), "validated dataset");
    ValidationReport {
        rows_checked: dataset.row_count(),
        rules_checked: rules.len(),
        violations,
    }
}

/// Run rules in order and return the first violation; later rules are not evaluated.
pub fn validate_strict(dataset: &DataSet, rules: &[Rule]) -> Outcome<(), RuleError> {
    rules
        .iter()
        .try_for_each(|rule| rule.check(dataset))
        .into()
}
