//! The contract-violation error raised when a value is unwrapped from the wrong variant.

use std::fmt;

use thiserror::Error;

/// Which variant a checked extraction found instead of the one it expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `Maybe::Some`.
    Some,
    /// `Maybe::Nothing`.
    Nothing,
    /// `Outcome::Ok`.
    Ok,
    /// `Outcome::Err`.
    Err,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Some => "Some",
            Self::Nothing => "Nothing",
            Self::Ok => "Ok",
            Self::Err => "Err",
        };
        f.write_str(s)
    }
}

/// Raised when `unwrap`/`unwrap_err` is called on the wrong variant.
///
/// This is a programming error, not a domain error: it carries no [`crate::ErrorCode`] and the
/// panicking extractors surface it as a crash. [`crate::fp::Maybe::try_unwrap`] and
/// [`crate::fp::Outcome::try_unwrap`] return it as a value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("called `{operation}` on a `{found}` value{}", render_payload(.payload))]
pub struct UnwrapError {
    operation: &'static str,
    found: Variant,
    payload: Option<String>,
}

impl UnwrapError {
    pub(crate) fn new(operation: &'static str, found: Variant, payload: Option<String>) -> Self {
        Self {
            operation,
            found,
            payload,
        }
    }

    /// Name of the extractor that was misused (e.g. `Outcome::unwrap`).
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The variant that was actually present.
    pub fn found(&self) -> Variant {
        self.found
    }

    /// `Debug` rendering of the value held by the unexpected variant, if any.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

fn render_payload(payload: &Option<String>) -> String {
    match payload {
        Some(p) => format!(": {p}"),
        None => String::new(),
    }
}
