//! Bridges between optional and fallible values.

use super::maybe::Maybe;
use super::outcome::Outcome;

/// Drop the error information: `Ok(v) -> Some(v)`, `Err(_) -> Nothing`.
#[inline]
pub fn to_maybe<T, E>(outcome: Outcome<T, E>) -> Maybe<T> {
    outcome.ok_value()
}

/// Promote absence to failure: `Some(v) -> Ok(v)`, `Nothing -> Err(error)`.
#[inline]
pub fn to_result<T, E>(maybe: Maybe<T>, error: E) -> Outcome<T, E> {
    maybe.ok_or(error)
}
