use crate::report::AggregateError;

use core::future::Future;

pub(crate) mod tuple;
pub(crate) mod vec;

/// Waits for all branch futures to complete, accumulating every logical
/// failure.
///
/// Implemented on `Vec`s of futures and on tuples of futures with two through
/// nine elements, where each future outputs `Result<T, Report<E>>`. All
/// branches are awaited to completion even when some of them fail; the result
/// carries either every value or every reported error, in input order.
pub trait JoinOrAccumulate {
    /// The values produced when every branch succeeds.
    type Value;

    /// The error type branches report.
    type Error;

    /// Which kind of future does [`join_or_accumulate`] return?
    ///
    /// [`join_or_accumulate`]: JoinOrAccumulate::join_or_accumulate
    type Accumulate: Future<Output = Result<Self::Value, AggregateError<Self::Error>>>;

    /// Which kind of future does [`join_or_reduce`] return?
    ///
    /// [`join_or_reduce`]: JoinOrAccumulate::join_or_reduce
    type Reduce<C>: Future<Output = Result<Self::Value, Self::Error>>
    where
        C: FnMut(Self::Error, Self::Error) -> Self::Error;

    /// Waits for every branch, returning all values or every reported error
    /// in input order.
    fn join_or_accumulate(self) -> Self::Accumulate;

    /// Waits for every branch, reducing all reported errors into one with
    /// `combine`, in input order.
    fn join_or_reduce<C>(self, combine: C) -> Self::Reduce<C>
    where
        C: FnMut(Self::Error, Self::Error) -> Self::Error;
}
