//! `Outcome<T, E>`: the success/failure value every fallible operation returns.
//!
//! `Outcome` is the crate's return channel for expected failure. It converts losslessly to and
//! from `std::result::Result`, so code that wants `?` can call [`Outcome::into_result`].
//!
//! ```rust
//! use tablekit::fp::{err, ok, Outcome};
//!
//! let total = ok::<i32, String>(5).and_then(|n| ok(n * 2)).and_then(|n| ok(n + 1));
//! assert_eq!(total, Outcome::Ok(11));
//!
//! let failed = err::<i32, _>("boom").and_then(|n| ok(n * 2));
//! assert_eq!(failed, Outcome::Err("boom"));
//! ```

use std::fmt;

use super::maybe::Maybe;
use super::unwrap::{UnwrapError, Variant};

/// Either a success value (`Ok`) or an error value (`Err`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use = "this `Outcome` may be an `Err` variant, which should be handled"]
pub enum Outcome<T, E> {
    /// Success.
    Ok(T),
    /// Failure.
    Err(E),
}

/// Wrap a success value.
#[inline]
pub fn ok<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Ok(value)
}

/// Wrap an error value.
#[inline]
pub fn err<T, E>(error: E) -> Outcome<T, E> {
    Outcome::Err(error)
}

impl<T, E> Outcome<T, E> {
    /// Returns `true` on success.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns `true` on failure.
    #[inline]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// Borrow both sides.
    #[inline]
    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Ok(v) => Outcome::Ok(v),
            Self::Err(e) => Outcome::Err(e),
        }
    }

    /// Transform the success value. `f` is not called on `Err`.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(v) => Outcome::Ok(f(v)),
            Self::Err(e) => Outcome::Err(e),
        }
    }

    /// Transform the error value. `f` is not called on `Ok`.
    #[inline]
    pub fn map_err<G, F>(self, f: F) -> Outcome<T, G>
    where
        F: FnOnce(E) -> G,
    {
        match self {
            Self::Ok(v) => Outcome::Ok(v),
            Self::Err(e) => Outcome::Err(f(e)),
        }
    }

    /// Run the next fallible step. Once a step fails, later steps are never evaluated.
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Self::Ok(v) => f(v),
            Self::Err(e) => Outcome::Err(e),
        }
    }

    /// Return `self` if it succeeded, otherwise the already-built `fallback`.
    #[inline]
    pub fn or_else(self, fallback: Outcome<T, E>) -> Outcome<T, E> {
        match self {
            Self::Ok(v) => Outcome::Ok(v),
            Self::Err(_) => fallback,
        }
    }

    /// Return `self` if it succeeded, otherwise call `f` to try again.
    #[inline]
    pub fn or_else_try<F>(self, f: F) -> Outcome<T, E>
    where
        F: FnOnce() -> Outcome<T, E>,
    {
        match self {
            Self::Ok(v) => Outcome::Ok(v),
            Self::Err(_) => f(),
        }
    }

    /// Extract the success value, falling back to `default`.
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Ok(v) => v,
            Self::Err(_) => default,
        }
    }

    /// Extract the success value, computing a fallback only on failure.
    #[inline]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Ok(v) => v,
            Self::Err(e) => f(e),
        }
    }

    /// Discard the error side.
    #[inline]
    pub fn ok_value(self) -> Maybe<T> {
        match self {
            Self::Ok(v) => Maybe::Some(v),
            Self::Err(_) => Maybe::Nothing,
        }
    }

    /// Discard the success side.
    #[inline]
    pub fn err_value(self) -> Maybe<E> {
        match self {
            Self::Ok(_) => Maybe::Nothing,
            Self::Err(e) => Maybe::Some(e),
        }
    }

    /// Convert into the standard library's `Result`.
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Ok(v) => Ok(v),
            Self::Err(e) => Err(e),
        }
    }
}

impl<T, E: fmt::Debug> Outcome<T, E> {
    /// Extract the success value, or report the misuse as an [`UnwrapError`].
    pub fn try_unwrap(self) -> Result<T, UnwrapError> {
        match self {
            Self::Ok(v) => Ok(v),
            Self::Err(e) => Err(UnwrapError::new(
                "Outcome::unwrap",
                Variant::Err,
                Some(format!("{e:?}")),
            )),
        }
    }

    /// Extract the success value.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] diagnostic when called on `Err`.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.try_unwrap() {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: fmt::Debug, E> Outcome<T, E> {
    /// Extract the error value, or report the misuse as an [`UnwrapError`].
    pub fn try_unwrap_err(self) -> Result<E, UnwrapError> {
        match self {
            Self::Ok(v) => Err(UnwrapError::new(
                "Outcome::unwrap_err",
                Variant::Ok,
                Some(format!("{v:?}")),
            )),
            Self::Err(e) => Ok(e),
        }
    }

    /// Extract the error value.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] diagnostic when called on `Ok`.
    #[track_caller]
    pub fn unwrap_err(self) -> E {
        match self.try_unwrap_err() {
            Ok(e) => e,
            Err(misuse) => panic!("{misuse}"),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(v) => Self::Ok(v),
            Err(e) => Self::Err(e),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(value: Outcome<T, E>) -> Self {
        value.into_result()
    }
}

/// Collect an iterator of outcomes, stopping at the first `Err`.
///
/// Items after the first failure are not pulled from the iterator.
pub fn collect_outcomes<T, E, I>(items: I) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = Outcome<T, E>>,
{
    let mut out = Vec::new();
    for item in items {
        match item {
            Outcome::Ok(v) => out.push(v),
            Outcome::Err(e) => return Outcome::Err(e),
        }
    }
    Outcome::Ok(out)
}
