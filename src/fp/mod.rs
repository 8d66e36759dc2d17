//! Algebraic types for total, composable error handling.
//!
//! - [`Maybe`]: presence or absence of a value, where absence is not an error.
//! - [`Outcome`]: success or a typed failure; the return channel of every fallible operation.
//! - [`to_maybe`] / [`to_result`]: conversions between the two.
//!
//! Expected failures are always values. The only panic raised here is the [`UnwrapError`]
//! diagnostic when a caller extracts the wrong variant without checking.

pub mod convert;
pub mod maybe;
pub mod outcome;
pub mod unwrap;

pub use convert::{to_maybe, to_result};
pub use maybe::{nothing, some, Maybe};
pub use outcome::{collect_outcomes, err, ok, Outcome};
pub use unwrap::{UnwrapError, Variant};
