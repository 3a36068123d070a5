//! Sequential error accumulation over tuples of fallible closures.

use crate::report::AggregateError;

pub(crate) mod tuple;

/// Runs every branch of a tuple of fallible closures, accumulating all
/// failures.
///
/// Implemented on tuples of `FnOnce() -> Result<T, Report<E>>` closures with
/// two through nine elements. Every branch runs in argument order regardless
/// of earlier branches' outcomes — accumulation requires full execution — and
/// the result is either the tuple of all values or the aggregate of every
/// reported error.
///
/// # Examples
///
/// ```rust
/// use futures_accumulate::prelude::*;
/// use futures_accumulate::Report;
///
/// fn field(value: &str, name: &'static str) -> Result<String, Report<&'static str>> {
///     if value.is_empty() {
///         Err(Report::One(name))
///     } else {
///         Ok(value.to_string())
///     }
/// }
///
/// let ok = (|| field("ada", "name"), || field("ada@email", "email")).zip_or_accumulate();
/// assert_eq!(ok.unwrap(), ("ada".to_string(), "ada@email".to_string()));
///
/// let err = (|| field("", "name"), || field("", "email")).zip_or_accumulate();
/// assert_eq!(&err.unwrap_err()[..], ["name", "email"]);
/// ```
pub trait ZipOrAccumulate {
    /// The tuple of values produced when every branch succeeds.
    type Value;

    /// The error type branches report.
    type Error;

    /// Runs every branch, returning all values or every reported error in
    /// branch order.
    fn zip_or_accumulate(self) -> Result<Self::Value, AggregateError<Self::Error>>;

    /// Runs every branch, reducing all reported errors into one with
    /// `combine`, in branch order.
    fn zip_or_reduce<C>(self, combine: C) -> Result<Self::Value, Self::Error>
    where
        C: FnMut(Self::Error, Self::Error) -> Self::Error;
}
