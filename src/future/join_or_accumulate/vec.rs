use super::JoinOrAccumulate as JoinOrAccumulateTrait;
use crate::accumulator::{Accumulator, Collect, Fold};
use crate::executor::{Executor, Via};
use crate::report::Report;

use core::fmt;
use core::future::{Future, IntoFuture};
use core::num::NonZeroUsize;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::vec::IntoIter;

use futures_buffered::FuturesUnordered;
use futures_core::Stream;
use pin_project::pin_project;

/// A future which waits for all branches to complete, accumulating every
/// logical failure.
///
/// This `struct` is created by the [`join_or_accumulate`] and
/// [`join_or_reduce`] methods on the [`JoinOrAccumulate`] trait. See its
/// documentation for more.
///
/// [`join_or_accumulate`]: crate::future::JoinOrAccumulate::join_or_accumulate
/// [`join_or_reduce`]: crate::future::JoinOrAccumulate::join_or_reduce
/// [`JoinOrAccumulate`]: crate::future::JoinOrAccumulate
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub struct JoinOrAccumulate<Fut, T, E, A>
where
    Fut: Future<Output = Result<T, Report<E>>>,
    A: Accumulator<E>,
{
    /// Branches not yet admitted, in input order.
    pending: IntoIter<Fut>,
    /// The branches currently holding a permit.
    #[pin]
    running: FuturesUnordered<Indexed<Fut>>,
    /// One outcome slot per branch, addressed by input index.
    slots: Vec<Option<Result<T, Report<E>>>>,
    /// Input index of the next branch to admit.
    next_index: usize,
    /// The concurrency budget; `usize::MAX` when unbounded.
    limit: usize,
    /// The error-merging strategy; `None` once the future has completed.
    acc: Option<A>,
}

impl<Fut, T, E, A> JoinOrAccumulate<Fut, T, E, A>
where
    Fut: Future<Output = Result<T, Report<E>>>,
    A: Accumulator<E>,
{
    pub(crate) fn new(futures: Vec<Fut>, acc: A) -> Self {
        let len = futures.len();
        Self {
            pending: futures.into_iter(),
            running: FuturesUnordered::new(),
            slots: (0..len).map(|_| None).collect(),
            next_index: 0,
            limit: usize::MAX,
            acc: Some(acc),
        }
    }

    /// Bounds how many branches may be running at once.
    ///
    /// `None` means unbounded. Branches are admitted in input order as slots
    /// free up; a branch holds its slot from the moment it is first polled
    /// until it completes, so a limit of one is true mutual exclusion.
    #[must_use]
    pub fn limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.limit = match limit {
            Some(n) => n.get(),
            None => usize::MAX,
        };
        self
    }

    /// Runs every branch on `executor` instead of the ambient task.
    ///
    /// A branch is handed to [`Executor::spawn`] when it is admitted, not up
    /// front, so [`limit`] still bounds how much work is running on the
    /// executor at once.
    ///
    /// Must be called before the future is first polled.
    ///
    /// [`limit`]: JoinOrAccumulate::limit
    pub fn via<'a, X>(self, executor: &'a X) -> JoinOrAccumulate<Via<'a, X, Fut>, T, E, A>
    where
        X: Executor,
        Fut: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        debug_assert!(
            self.next_index == 0,
            "via must be called before the future is first polled"
        );
        let futures: Vec<_> = self
            .pending
            .map(|fut| Via::new(executor, fut))
            .collect();
        JoinOrAccumulate {
            pending: futures.into_iter(),
            running: FuturesUnordered::new(),
            slots: self.slots,
            next_index: self.next_index,
            limit: self.limit,
            acc: self.acc,
        }
    }
}

impl<Fut, T, E> JoinOrAccumulateTrait for Vec<Fut>
where
    Fut: IntoFuture<Output = Result<T, Report<E>>>,
{
    type Value = Vec<T>;
    type Error = E;
    type Accumulate = JoinOrAccumulate<Fut::IntoFuture, T, E, Collect<E>>;
    type Reduce<C> = JoinOrAccumulate<Fut::IntoFuture, T, E, Fold<E, C>>
    where
        C: FnMut(E, E) -> E;

    fn join_or_accumulate(self) -> Self::Accumulate {
        JoinOrAccumulate::new(
            self.into_iter().map(IntoFuture::into_future).collect(),
            Collect::new(),
        )
    }

    fn join_or_reduce<C>(self, combine: C) -> Self::Reduce<C>
    where
        C: FnMut(E, E) -> E,
    {
        JoinOrAccumulate::new(
            self.into_iter().map(IntoFuture::into_future).collect(),
            Fold::new(combine),
        )
    }
}

impl<Fut, T, E, A> fmt::Debug for JoinOrAccumulate<Fut, T, E, A>
where
    Fut: Future<Output = Result<T, Report<E>>>,
    A: Accumulator<E>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinOrAccumulate")
            .field("pending", &self.pending.len())
            .field("running", &self.running.len())
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<Fut, T, E, A> Future for JoinOrAccumulate<Fut, T, E, A>
where
    Fut: Future<Output = Result<T, Report<E>>>,
    A: Accumulator<E>,
{
    type Output = Result<Vec<T>, A::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        assert!(
            this.acc.is_some(),
            "Futures must not be polled after completing"
        );

        loop {
            // Admit queued branches in input order while the budget allows.
            while this.running.len() < *this.limit {
                match this.pending.next() {
                    Some(fut) => {
                        let index = *this.next_index;
                        *this.next_index += 1;
                        this.running.as_mut().push(Indexed { index, fut });
                    }
                    None => break,
                }
            }

            match this.running.as_mut().poll_next(cx) {
                // A branch completed; record its outcome by input index and
                // release its permit.
                Poll::Ready(Some((index, outcome))) => this.slots[index] = Some(outcome),
                // Nothing running and nothing pending: every branch is done.
                Poll::Ready(None) => break,
                Poll::Pending => return Poll::Pending,
            }
        }

        // Fold all outcomes in input order, never completion order.
        let mut acc = this.acc.take().unwrap();
        let mut values = Vec::with_capacity(this.slots.len());
        for slot in this.slots.iter_mut() {
            match slot.take() {
                Some(Ok(value)) => values.push(value),
                Some(Err(report)) => acc.push(report),
                None => unreachable!("all branches have completed"),
            }
        }

        Poll::Ready(match acc.finish() {
            Some(error) => Err(error),
            None => Ok(values),
        })
    }
}

/// Tags a branch future with its input index.
#[pin_project]
struct Indexed<Fut> {
    index: usize,
    #[pin]
    fut: Fut,
}

impl<Fut: Future> Future for Indexed<Fut> {
    type Output = (usize, Fut::Output);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        this.fut.poll(cx).map(|output| (*this.index, output))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::report::AggregateError;
    use std::future;

    #[test]
    fn all_ok() {
        futures_lite::future::block_on(async {
            let res: Result<Vec<_>, AggregateError<&str>> = vec![
                future::ready(Ok("hello")),
                future::ready(Ok("world")),
            ]
            .join_or_accumulate()
            .await;
            assert_eq!(res.unwrap(), vec!["hello", "world"]);
        })
    }

    #[test]
    fn empty_input_trivially_succeeds() {
        futures_lite::future::block_on(async {
            let futures: Vec<future::Ready<Result<u8, Report<&str>>>> = vec![];
            let res = futures.join_or_accumulate().await;
            assert_eq!(res.unwrap(), Vec::<u8>::new());
        })
    }

    #[test]
    fn collects_every_failure_in_input_order() {
        futures_lite::future::block_on(async {
            let res: Result<Vec<u32>, _> = vec![
                future::ready(Err(Report::One("one"))),
                future::ready(Ok(2)),
                future::ready(Err(Report::One("three"))),
            ]
            .join_or_accumulate()
            .await;
            assert_eq!(res.unwrap_err().into_vec(), vec!["one", "three"]);
        })
    }

    #[test]
    fn reduce_folds_every_failure() {
        futures_lite::future::block_on(async {
            let futures: Vec<_> = (0..5)
                .map(|_| future::ready(Err::<u32, _>(Report::One(1u32))))
                .collect();
            let res = futures.join_or_reduce(|a, b| a + b).await;
            assert_eq!(res.unwrap_err(), 5);
        })
    }

    #[test]
    fn limit_bounds_inflight_branches() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        futures_lite::future::block_on(async {
            let inflight = Arc::new(AtomicUsize::new(0));
            let futures: Vec<_> = (0..10u32)
                .map(|n| {
                    let inflight = Arc::clone(&inflight);
                    async move {
                        let now = inflight.fetch_add(1, Ordering::SeqCst) + 1;
                        assert!(now <= 3, "more than three branches were running");
                        futures_lite::future::yield_now().await;
                        inflight.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, Report<&str>>(n)
                    }
                })
                .collect();

            let res = futures
                .join_or_accumulate()
                .limit(NonZeroUsize::new(3))
                .await;
            assert_eq!(res.unwrap(), (0..10).collect::<Vec<_>>());
        })
    }
}
