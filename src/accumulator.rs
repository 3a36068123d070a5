use crate::report::{AggregateError, Report};

use core::fmt;

/// A strategy for merging the failure reports of many branches into one
/// aggregate error.
///
/// Reports are pushed in branch order; [`finish`] returns `None` when no
/// branch failed, or the aggregate error otherwise. Every accumulating
/// operation in this crate is generic over its accumulator, which is how the
/// "collect every error" and "reduce with a combine function" flavors share
/// one engine.
///
/// [`finish`]: Accumulator::finish
pub trait Accumulator<E> {
    /// The aggregate error produced when at least one report was pushed.
    type Error;

    /// Records one branch's failure report.
    fn push(&mut self, report: Report<E>);

    /// Completes the accumulation.
    fn finish(self) -> Option<Self::Error>;
}

/// Accumulates every reported error into an ordered [`AggregateError`].
///
/// Forwarded batches are expanded in place, so the final sequence reflects
/// branch order first and within-batch order second.
#[derive(Debug)]
pub struct Collect<E> {
    errors: Vec<E>,
}

impl<E> Collect<E> {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }
}

impl<E> Accumulator<E> for Collect<E> {
    type Error = AggregateError<E>;

    fn push(&mut self, report: Report<E>) {
        match report {
            Report::One(error) => self.errors.push(error),
            Report::Many(batch) => self.errors.extend(batch),
        }
    }

    fn finish(self) -> Option<Self::Error> {
        AggregateError::from_vec(self.errors)
    }
}

/// Left-folds every reported error into a single one using a caller-supplied
/// `combine` function.
///
/// Batches are flattened first, so each error folds individually, in branch
/// order and then within-batch order.
pub struct Fold<E, C> {
    combine: C,
    reduced: Option<E>,
}

impl<E, C> Fold<E, C> {
    pub(crate) fn new(combine: C) -> Self {
        Self {
            combine,
            reduced: None,
        }
    }
}

impl<E, C> Fold<E, C>
where
    C: FnMut(E, E) -> E,
{
    fn apply(&mut self, error: E) {
        self.reduced = Some(match self.reduced.take() {
            Some(reduced) => (self.combine)(reduced, error),
            None => error,
        });
    }
}

impl<E, C> Accumulator<E> for Fold<E, C>
where
    C: FnMut(E, E) -> E,
{
    type Error = E;

    fn push(&mut self, report: Report<E>) {
        match report {
            Report::One(error) => self.apply(error),
            Report::Many(batch) => {
                for error in batch {
                    self.apply(error);
                }
            }
        }
    }

    fn finish(self) -> Option<Self::Error> {
        self.reduced
    }
}

impl<E: fmt::Debug, C> fmt::Debug for Fold<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fold")
            .field("reduced", &self.reduced)
            .finish_non_exhaustive()
    }
}
