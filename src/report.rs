//! Error reports for hosts: a text rendering for people, JSON for machines, and a process exit
//! code.
//!
//! A [`ReportPolicy`] marks some codes as advisory. Advisory findings are listed but only fail
//! the run when `fail_on_advisory` is set.
//!
//! ```rust
//! use tablekit::errors::{ColumnNotFoundError, TypeMismatchError, ValidationError};
//! use tablekit::report::{ErrorReport, ReportPolicy};
//! use tablekit::types::DataType;
//!
//! let errors: Vec<ValidationError> = vec![
//!     TypeMismatchError::new("score".to_string(), DataType::Float64, DataType::Utf8).into(),
//! ];
//! let report = ErrorReport::from_errors(&errors, ReportPolicy::default());
//! assert_eq!(report.exit_code(), 0);
//!
//! let strict = ReportPolicy { fail_on_advisory: true, ..ReportPolicy::default() };
//! assert_eq!(ErrorReport::from_errors(&errors, strict).exit_code(), 2);
//!
//! let hard = vec![ColumnNotFoundError::new("Age".to_string(), vec![])];
//! assert_eq!(ErrorReport::from_errors(&hard, ReportPolicy::default()).exit_code(), 1);
//! ```

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error_codes::ErrorCode;
use crate::errors::{error_to_dict, opaque_error_to_dict, DomainError, ErrorDict, FileWriteError};
use crate::fp::Outcome;

/// How much a finding matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Advisory,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Advisory => "advisory",
            Self::Error => "error",
        })
    }
}

/// Which codes are advisory and whether advisories fail the run.
///
/// Loadable from JSON, e.g. `{"advisory": [1013, 11002], "fail_on_advisory": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPolicy {
    pub advisory: BTreeSet<ErrorCode>,
    pub fail_on_advisory: bool,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            advisory: BTreeSet::from([ErrorCode::TypeMismatch]),
            fail_on_advisory: false,
        }
    }
}

impl ReportPolicy {
    pub fn severity_of(&self, code: ErrorCode) -> Severity {
        if self.advisory.contains(&code) {
            Severity::Advisory
        } else {
            Severity::Error
        }
    }
}

/// One reported error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// `None` for errors outside the taxonomy.
    pub code: Option<ErrorCode>,
    pub message: String,
    pub error: ErrorDict,
}

/// An ordered collection of findings under one policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    policy: ReportPolicy,
    findings: Vec<Finding>,
}

impl ErrorReport {
    pub fn new(policy: ReportPolicy) -> Self {
        Self {
            policy,
            findings: Vec::new(),
        }
    }

    /// Build a report from taxonomy errors, keeping their order.
    pub fn from_errors<'a, E, I>(errors: I, policy: ReportPolicy) -> Self
    where
        E: DomainError + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut report = Self::new(policy);
        for error in errors {
            report.push(error);
        }
        report
    }

    pub fn push<E: DomainError + ?Sized>(&mut self, error: &E) {
        let code = error.error_code();
        self.findings.push(Finding {
            severity: self.policy.severity_of(code),
            code: Some(code),
            message: error.to_string(),
            error: error_to_dict(error),
        });
    }

    /// Record an error that has no code. It always counts as a hard error.
    pub fn push_opaque<E: fmt::Display>(&mut self, error: &E) {
        self.findings.push(Finding {
            severity: Severity::Error,
            code: None,
            message: error.to_string(),
            error: opaque_error_to_dict(error),
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn policy(&self) -> &ReportPolicy {
        &self.policy
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn advisory_count(&self) -> usize {
        self.count(Severity::Advisory)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// `0` when nothing fails the run, `1` when any hard error is present, `2` when only
    /// advisories are present and the policy fails on them.
    pub fn exit_code(&self) -> i32 {
        if self.error_count() > 0 {
            1
        } else if self.advisory_count() > 0 && self.policy.fail_on_advisory {
            2
        } else {
            0
        }
    }

    /// One line per finding followed by a summary line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for finding in &self.findings {
            let label = finding
                .code
                .map_or_else(|| "UNCODED".to_string(), |code| code.to_string());
            let _ = writeln!(out, "[{}] {label}: {}", finding.severity, finding.message);
        }
        let _ = write!(
            out,
            "{} error(s), {} advisory finding(s)",
            self.error_count(),
            self.advisory_count()
        );
        out
    }

    /// `{"summary": {...}, "findings": [{severity, display, error_type, error_code, ..}]}`.
    ///
    /// `display` is the rendered message; every field of the error dict is kept as is.
    pub fn to_json(&self) -> JsonValue {
        let findings: Vec<JsonValue> = self
            .findings
            .iter()
            .map(|f| {
                let mut entry = f.error.clone();
                entry.insert("severity".to_string(), JsonValue::String(f.severity.to_string()));
                entry.insert("display".to_string(), JsonValue::String(f.message.clone()));
                JsonValue::Object(entry)
            })
            .collect();
        serde_json::json!({
            "summary": {
                "errors": self.error_count(),
                "advisories": self.advisory_count(),
                "exit_code": self.exit_code(),
            },
            "findings": findings,
        })
    }

    /// Write [`Self::to_json`] as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Outcome<(), FileWriteError> {
        let path = path.as_ref();
        let write_error = |message: String| FileWriteError::new(path.display().to_string(), message);
        let text = match serde_json::to_string_pretty(&self.to_json()) {
            Ok(text) => text,
            Err(e) => return Outcome::Err(write_error(e.to_string())),
        };
        match fs::write(path, text) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), findings = self.findings.len(), "wrote error report");
                Outcome::Ok(())
            }
            Err(e) => Outcome::Err(write_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ColumnNotFoundError, FileReadError, TypeMismatchError, ValidationError};
    use crate::types::DataType;

    fn mixed() -> Vec<ValidationError> {
        vec![
            TypeMismatchError::new("score".to_string(), DataType::Float64, DataType::Utf8).into(),
            ColumnNotFoundError::new("Age".to_string(), vec!["Name".to_string()]).into(),
        ]
    }

    #[test]
    fn severities_follow_policy() {
        let report = ErrorReport::from_errors(&mixed(), ReportPolicy::default());
        assert_eq!(report.advisory_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.findings()[1].code, Some(ErrorCode::ColumnNotFound));
    }

    #[test]
    fn empty_report_exits_zero() {
        let report = ErrorReport::new(ReportPolicy::default());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.render_text(), "0 error(s), 0 advisory finding(s)");
    }

    #[test]
    fn text_lists_codes_and_messages() {
        let mut report = ErrorReport::from_errors(&mixed(), ReportPolicy::default());
        report.push_opaque(&"boom");
        let text = report.render_text();
        assert!(text.contains("[advisory] TYPE_MISMATCH (1013): column 'score' has type utf8, expected float64"));
        assert!(text.contains("[error] COLUMN_NOT_FOUND (1011)"));
        assert!(text.contains("[error] UNCODED: boom"));
        assert!(text.ends_with("2 error(s), 1 advisory finding(s)"));
    }

    #[test]
    fn json_flattens_error_dicts() {
        let report = ErrorReport::from_errors(&mixed(), ReportPolicy::default());
        let json = report.to_json();
        assert_eq!(json["summary"]["exit_code"], 1);
        assert_eq!(json["findings"][1]["error_code"], 1011);
        assert_eq!(json["findings"][1]["column"], "Age");
        assert_eq!(json["findings"][0]["severity"], "advisory");
    }

    #[test]
    fn json_keeps_record_message_fields() {
        let mut report = ErrorReport::new(ReportPolicy::default());
        report.push(&FileReadError::new("a.csv".to_string(), "truncated".to_string()));
        let finding = &report.to_json()["findings"][0];
        assert_eq!(finding["message"], "truncated");
        assert_eq!(finding["path"], "a.csv");
        assert_eq!(finding["display"], "failed to read 'a.csv': truncated");
        assert_eq!(finding["error_code"], 12004);
    }

    #[test]
    fn policy_loads_from_json() {
        let policy: ReportPolicy =
            serde_json::from_str(r#"{"advisory": [11002], "fail_on_advisory": true}"#).unwrap();
        assert_eq!(policy.severity_of(ErrorCode::NullValue), Severity::Advisory);
        assert_eq!(policy.severity_of(ErrorCode::TypeMismatch), Severity::Error);
        assert!(serde_json::from_str::<ReportPolicy>(r#"{"advisory": [42]}"#).is_err());
    }
}
