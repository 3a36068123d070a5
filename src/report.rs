use core::fmt;
use core::ops::Deref;
use std::error::Error;
use std::vec;

/// A logical failure reported by a single branch.
///
/// Branches participating in an accumulating operation signal failure by
/// returning `Err(Report<E>)`. A report carries either one error, or a whole
/// batch produced by a nested accumulation which is forwarded upward without
/// re-wrapping. Anything *not* expressed through a `Report` — a panic — is a
/// fault: it is never accumulated and unwinds past the accumulation boundary,
/// cancelling in-flight sibling branches.
///
/// `Report<E>` implements `From<E>`, so inside a branch the `?` operator
/// lifts plain errors into the reporting channel:
///
/// ```rust
/// use futures_accumulate::Report;
///
/// fn parse(input: &str) -> Result<u32, Report<std::num::ParseIntError>> {
///     let n = input.parse::<u32>()?;
///     Ok(n * 2)
/// }
///
/// assert!(parse("7").is_ok());
/// assert!(parse("seven").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report<E> {
    /// A single error.
    One(E),
    /// A non-empty batch of errors forwarded from a nested accumulation.
    ///
    /// The batch is spliced into the enclosing aggregate in place, preserving
    /// its own internal order.
    Many(AggregateError<E>),
}

impl<E> From<E> for Report<E> {
    fn from(error: E) -> Self {
        Self::One(error)
    }
}

/// A non-empty, ordered collection of errors.
///
/// Produced by the `*_or_accumulate` operations when at least one branch
/// fails: one entry per reported error, in branch order, with forwarded
/// batches expanded in place.
#[derive(Clone, PartialEq, Eq)]
pub struct AggregateError<E> {
    inner: Vec<E>,
}

impl<E> AggregateError<E> {
    /// Creates a new `AggregateError` from its first error.
    pub fn new(first: E) -> Self {
        Self { inner: vec![first] }
    }

    /// Appends another error.
    pub fn push(&mut self, error: E) {
        self.inner.push(error);
    }

    /// Returns `None` when `errors` is empty, upholding the non-empty
    /// invariant.
    pub(crate) fn from_vec(errors: Vec<E>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { inner: errors })
        }
    }

    /// Consumes the aggregate, returning the underlying errors.
    pub fn into_vec(self) -> Vec<E> {
        self.inner
    }
}

impl<E: fmt::Debug> fmt::Debug for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} errors occurred:", self.inner.len())?;

        for (i, err) in self.inner.iter().enumerate() {
            writeln!(f, "- Error {}: {err}", i + 1)?;
        }

        Ok(())
    }
}

impl<E: Error> Error for AggregateError<E> {}

impl<E> Deref for AggregateError<E> {
    type Target = [E];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<E> IntoIterator for AggregateError<E> {
    type Item = E;
    type IntoIter = vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a AggregateError<E> {
    type Item = &'a E;
    type IntoIter = core::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut err = AggregateError::new("first");
        err.push("second");
        err.push("third");
        assert_eq!(err.into_vec(), vec!["first", "second", "third"]);
    }

    #[test]
    fn from_vec_rejects_empty() {
        assert!(AggregateError::<u32>::from_vec(vec![]).is_none());
        assert!(AggregateError::from_vec(vec![1]).is_some());
    }

    #[test]
    fn question_mark_lifts_errors() {
        fn branch(fail: bool) -> Result<u32, Report<&'static str>> {
            if fail {
                Err("nope")?;
            }
            Ok(1)
        }

        assert_eq!(branch(false), Ok(1));
        assert_eq!(branch(true), Err(Report::One("nope")));
    }

    #[test]
    fn display_lists_every_error() {
        let mut err = AggregateError::new("oops");
        err.push("oh no");
        let formatted = format!("{err}");
        assert!(formatted.starts_with("2 errors occurred:"));
        assert!(formatted.contains("- Error 1: oops"));
        assert!(formatted.contains("- Error 2: oh no"));
    }
}
