//! Sequential error accumulation over the elements of a collection.

use crate::accumulator::{Accumulator, Collect, Fold};
use crate::report::{AggregateError, Report};

/// Maps a fallible function over every element of a collection, accumulating
/// all failures.
///
/// Unlike `Iterator::collect::<Result<_, _>>()`, which stops at the first
/// error, these operations run the function over *every* element and report
/// either all the values or all the errors. The output is built through
/// `FromIterator`, so a list maps to a list and a keyed map keeps its keys.
///
/// Mapping over an empty collection trivially succeeds with an empty output.
/// Processing is a plain loop, so arbitrarily large inputs never grow the
/// call stack.
///
/// # Examples
///
/// ```rust
/// use futures_accumulate::prelude::*;
/// use futures_accumulate::{AggregateError, Report};
///
/// fn positive(n: i64) -> Result<i64, Report<String>> {
///     if n > 0 {
///         Ok(n)
///     } else {
///         Err(Report::One(format!("{n} is not positive")))
///     }
/// }
///
/// let ok: Result<Vec<_>, AggregateError<String>> =
///     vec![1, 2, 3].map_or_accumulate(positive);
/// assert_eq!(ok.unwrap(), vec![1, 2, 3]);
///
/// let err: Result<Vec<_>, AggregateError<String>> =
///     vec![1, -2, -3].map_or_accumulate(positive);
/// let err = err.unwrap_err();
/// assert_eq!(&err[..], ["-2 is not positive", "-3 is not positive"]);
/// ```
pub trait MapOrAccumulate: IntoIterator + Sized {
    /// Maps `f` over every element, collecting either all values or all
    /// reported errors in input order.
    fn map_or_accumulate<O, B, E, F>(self, f: F) -> Result<O, AggregateError<E>>
    where
        F: FnMut(Self::Item) -> Result<B, Report<E>>,
        O: FromIterator<B>,
    {
        map_with(self.into_iter(), Collect::new(), f).map(collect)
    }

    /// Maps `f` over every element, reducing all reported errors into one
    /// with `combine`, in input order.
    fn map_or_reduce<O, B, E, C, F>(self, combine: C, f: F) -> Result<O, E>
    where
        C: FnMut(E, E) -> E,
        F: FnMut(Self::Item) -> Result<B, Report<E>>,
        O: FromIterator<B>,
    {
        map_with(self.into_iter(), Fold::new(combine), f).map(collect)
    }

    /// Accumulates a collection of already-computed results.
    ///
    /// Returns all `Ok` values when every result succeeded, or every `Err` in
    /// input order otherwise.
    ///
    /// ```rust
    /// use futures_accumulate::prelude::*;
    /// use futures_accumulate::AggregateError;
    ///
    /// let results = vec![Ok(1), Err("two"), Ok(3), Err("four")];
    /// let err: Result<Vec<i32>, AggregateError<&str>> = results.collect_or_accumulate();
    /// assert_eq!(err.unwrap_err().into_vec(), vec!["two", "four"]);
    /// ```
    fn collect_or_accumulate<O, T, E>(self) -> Result<O, AggregateError<E>>
    where
        Self: IntoIterator<Item = Result<T, E>>,
        O: FromIterator<T>,
    {
        self.map_or_accumulate(|result| result.map_err(Report::One))
    }
}

impl<I: IntoIterator> MapOrAccumulate for I {}

fn collect<B, O: FromIterator<B>>(values: Vec<B>) -> O {
    values.into_iter().collect()
}

/// Two-phase driver shared by both flavors: buffer successes until the first
/// failing element; after that, keep evaluating the remaining elements for
/// their reports but stop buffering, since the operation is already a
/// failure.
fn map_with<I, B, E, A, F>(mut iter: I, mut acc: A, mut f: F) -> Result<Vec<B>, A::Error>
where
    I: Iterator,
    A: Accumulator<E>,
    F: FnMut(I::Item) -> Result<B, Report<E>>,
{
    let mut values = Vec::with_capacity(iter.size_hint().0);

    while let Some(item) = iter.next() {
        match f(item) {
            Ok(value) => values.push(value),
            Err(report) => {
                drop(values);
                acc.push(report);

                for item in iter.by_ref() {
                    if let Err(report) = f(item) {
                        acc.push(report);
                    }
                }

                return match acc.finish() {
                    Some(error) => Err(error),
                    None => unreachable!("at least one report was pushed"),
                };
            }
        }
    }

    match acc.finish() {
        Some(error) => Err(error),
        None => Ok(values),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    fn small(n: u32) -> Result<u32, Report<String>> {
        if n < 10 {
            Ok(n * 2)
        } else {
            Err(Report::One(format!("{n} is too big")))
        }
    }

    #[test]
    fn all_ok() {
        let res: Result<Vec<_>, AggregateError<String>> = vec![1, 2, 3].map_or_accumulate(small);
        assert_eq!(res.unwrap(), vec![2, 4, 6]);
    }

    #[test]
    fn empty_input_trivially_succeeds() {
        let res: Result<Vec<u32>, AggregateError<String>> =
            Vec::<u32>::new().map_or_accumulate(small);
        assert_eq!(res.unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn collects_every_error_in_input_order() {
        let res: Result<Vec<_>, _> = vec![1, 11, 2, 12].map_or_accumulate(small);
        let err = res.unwrap_err();
        assert_eq!(err.into_vec(), vec!["11 is too big", "12 is too big"]);
    }

    #[test]
    fn every_element_still_runs_after_a_failure() {
        let mut seen = Vec::new();
        let res: Result<Vec<u32>, _> = vec![11, 1, 2].map_or_accumulate(|n| {
            seen.push(n);
            small(n)
        });
        assert!(res.is_err());
        assert_eq!(seen, vec![11, 1, 2]);
    }

    #[test]
    fn reduce_folds_with_combine() {
        let res: Result<Vec<u32>, u32> =
            vec![10, 20, 30].map_or_reduce(|a, b| a + b, |n| Err(Report::One(n)));
        assert_eq!(res.unwrap_err(), 60);
    }

    #[test]
    fn forwarded_batches_splice_in_place() {
        let res: Result<Vec<u32>, _> = vec![vec![11, 12], vec![1], vec![13]].map_or_accumulate(
            |chunk| -> Result<u32, Report<String>> {
                let inner: Vec<u32> = chunk.map_or_accumulate(small).map_err(Report::Many)?;
                Ok(inner.iter().sum())
            },
        );
        let err = res.unwrap_err();
        assert_eq!(
            err.into_vec(),
            vec!["11 is too big", "12 is too big", "13 is too big"]
        );
    }

    #[test]
    fn keyed_maps_keep_their_keys() {
        let input = BTreeMap::from([("a", 1), ("b", 2)]);
        let res: Result<BTreeMap<&str, u32>, AggregateError<String>> = input
            .into_iter()
            .map_or_accumulate(|(key, value)| Ok((key, small(value)?)));
        assert_eq!(res.unwrap(), BTreeMap::from([("a", 2), ("b", 4)]));
    }

    #[test]
    fn stack_safe_for_large_inputs() {
        let res: Result<Vec<u32>, AggregateError<String>> =
            (0..100_000u32).map_or_accumulate(|n| Ok(n % 10));
        assert_eq!(res.unwrap().len(), 100_000);
    }

    #[test]
    fn collect_or_accumulate_binds_results() {
        let oks: Vec<Result<u32, &str>> = vec![Ok(1), Ok(2)];
        let res: Result<Vec<u32>, AggregateError<&str>> = oks.collect_or_accumulate();
        assert_eq!(res.unwrap(), vec![1, 2]);
    }
}
