//! `Maybe<T>`: a value that is either present or absent.
//!
//! `Maybe` is used where absence is not itself an error, for example "does this sheet exist"
//! or "which index does this column have". When absence must be reported, convert with
//! [`Maybe::ok_or`] or [`crate::fp::to_result`].
//!
//! ```rust
//! use tablekit::fp::{nothing, some, Maybe};
//!
//! let m = some(20).map(|n| n + 1).and_then(|n| if n > 0 { some(n * 2) } else { nothing() });
//! assert_eq!(m, Maybe::Some(42));
//!
//! let empty: Maybe<i32> = nothing();
//! assert_eq!(empty.map(|n| n * 2).unwrap_or(7), 7);
//! ```

use std::fmt;

use super::outcome::Outcome;
use super::unwrap::{UnwrapError, Variant};

/// An optional value: `Some(value)` or `Nothing`.
///
/// `Nothing` carries no data, so every `Nothing` of a given type is the same value; equality,
/// hashing and ordering agree with that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Maybe<T> {
    /// The empty value.
    #[default]
    Nothing,
    /// A present value.
    Some(T),
}

/// Wrap a value in `Maybe::Some`.
#[inline]
pub fn some<T>(value: T) -> Maybe<T> {
    Maybe::Some(value)
}

/// The shared empty value.
#[inline]
pub const fn nothing<T>() -> Maybe<T> {
    Maybe::Nothing
}

impl<T> Maybe<T> {
    /// Returns `true` if a value is present.
    #[inline]
    pub const fn is_some(&self) -> bool {
        matches!(self, Self::Some(_))
    }

    /// Returns `true` if no value is present.
    #[inline]
    pub const fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Borrow the contained value.
    #[inline]
    pub const fn as_ref(&self) -> Maybe<&T> {
        match self {
            Self::Some(v) => Maybe::Some(v),
            Self::Nothing => Maybe::Nothing,
        }
    }

    /// Apply `f` to the contained value. `f` is not called on `Nothing`.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Some(v) => Maybe::Some(f(v)),
            Self::Nothing => Maybe::Nothing,
        }
    }

    /// Chain a computation that may itself produce `Nothing`.
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self {
            Self::Some(v) => f(v),
            Self::Nothing => Maybe::Nothing,
        }
    }

    /// Keep the value only if `predicate` holds.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Self::Some(v) if predicate(&v) => Self::Some(v),
            _ => Self::Nothing,
        }
    }

    /// Extract the value, falling back to `default`.
    ///
    /// The fallback is evaluated by the caller before the call; use
    /// [`Maybe::unwrap_or_else`] to defer it.
    #[inline]
    pub fn or_else(self, default: T) -> T {
        match self {
            Self::Some(v) => v,
            Self::Nothing => default,
        }
    }

    /// Extract the value, falling back to `default`.
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        self.or_else(default)
    }

    /// Extract the value, computing a fallback only when empty.
    #[inline]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Some(v) => v,
            Self::Nothing => f(),
        }
    }

    /// Extract the value, or report the misuse as an [`UnwrapError`].
    pub fn try_unwrap(self) -> Result<T, UnwrapError> {
        match self {
            Self::Some(v) => Ok(v),
            Self::Nothing => Err(UnwrapError::new("Maybe::unwrap", Variant::Nothing, None)),
        }
    }

    /// Extract the value.
    ///
    /// # Panics
    ///
    /// Panics with an [`UnwrapError`] diagnostic when called on `Nothing`. That is a caller bug:
    /// check [`Maybe::is_some`] first or use one of the total extractors.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.try_unwrap() {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// Convert to an [`Outcome`], using `error` when empty.
    #[inline]
    pub fn ok_or<E>(self, error: E) -> Outcome<T, E> {
        match self {
            Self::Some(v) => Outcome::Ok(v),
            Self::Nothing => Outcome::Err(error),
        }
    }

    /// Like [`Maybe::ok_or`], building the error only when it is needed.
    #[inline]
    pub fn ok_or_else<E, F>(self, f: F) -> Outcome<T, E>
    where
        F: FnOnce() -> E,
    {
        match self {
            Self::Some(v) => Outcome::Ok(v),
            Self::Nothing => Outcome::Err(f()),
        }
    }

    /// Convert into the standard library's `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Some(v) => Some(v),
            Self::Nothing => None,
        }
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Some(v),
            None => Self::Nothing,
        }
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.into_option()
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Some(v) => write!(f, "Some({v})"),
            Self::Nothing => f.write_str("Nothing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{nothing, some, Maybe};
    use crate::fp::unwrap::Variant;
    use crate::fp::Outcome;

    #[test]
    fn predicates() {
        assert!(some(1).is_some());
        assert!(!some(1).is_nothing());
        assert!(nothing::<i32>().is_nothing());
        assert!(!nothing::<i32>().is_some());
    }

    #[test]
    fn map_does_not_call_function_on_nothing() {
        let calls = Cell::new(0);
        let out = nothing::<i32>().map(|n| {
            calls.set(calls.get() + 1);
            n + 1
        });
        assert_eq!(out, Maybe::Nothing);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn and_then_can_flip_to_nothing() {
        let out = some(3).and_then(|n| if n > 5 { some(n) } else { nothing() });
        assert_eq!(out, Maybe::Nothing);
    }

    #[test]
    fn or_else_returns_value_or_default() {
        assert_eq!(some(1).or_else(9), 1);
        assert_eq!(nothing().or_else(9), 9);
    }

    #[test]
    fn unwrap_or_else_is_lazy() {
        let calls = Cell::new(0);
        let v = some(1).unwrap_or_else(|| {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!(v, 1);
        assert_eq!(calls.get(), 0);

        let v = nothing().unwrap_or_else(|| {
            calls.set(calls.get() + 1);
            5
        });
        assert_eq!(v, 5);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn try_unwrap_reports_nothing() {
        let err = nothing::<u8>().try_unwrap().unwrap_err();
        assert_eq!(err.found(), Variant::Nothing);
        assert_eq!(err.operation(), "Maybe::unwrap");
    }

    #[test]
    #[should_panic(expected = "called `Maybe::unwrap` on a `Nothing` value")]
    fn unwrap_panics_on_nothing() {
        let _ = nothing::<u8>().unwrap();
    }

    #[test]
    fn filter_and_ok_or() {
        assert_eq!(some(4).filter(|n| n % 2 == 0), some(4));
        assert_eq!(some(3).filter(|n| n % 2 == 0), nothing());
        assert_eq!(nothing::<i32>().ok_or("missing"), Outcome::Err("missing"));
        assert_eq!(some(1).ok_or("missing"), Outcome::Ok(1));
    }

    #[test]
    fn option_conversions() {
        assert_eq!(Maybe::from(Some(2)), some(2));
        assert_eq!(Maybe::<i32>::from(None), nothing());
        assert_eq!(Option::from(some("a")), Some("a"));
        assert_eq!(Maybe::<i32>::default(), nothing());
    }

    #[test]
    fn display() {
        assert_eq!(some(3).to_string(), "Some(3)");
        assert_eq!(nothing::<i32>().to_string(), "Nothing");
    }
}
