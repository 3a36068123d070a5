use super::JoinOrAccumulate as JoinOrAccumulateTrait;
use crate::accumulator::{Accumulator, Collect, Fold};
use crate::executor::{Executor, Via};
use crate::report::Report;

use core::fmt;
use core::future::{Future, IntoFuture};
use core::num::NonZeroUsize;
use core::pin::Pin;
use core::task::{Context, Poll};

use pin_project::pin_project;

/// The scheduling state of one branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BranchState {
    /// Waiting for a permit; the branch has never been polled.
    Queued,
    /// Holding a permit; the branch is in flight.
    Running,
    /// Completed; the permit has been released.
    Done,
}

macro_rules! impl_join_or_accumulate_tuple {
    ($mod_name:ident $StructName:ident $(($F:ident $T:ident $idx:tt))+) => {
        mod $mod_name {
            #[pin_project::pin_project]
            pub(super) struct Futures<$($F,)+> { $(#[pin] pub(super) $F: $F,)+ }

            #[repr(u8)]
            pub(super) enum Indexes { $($F,)+ }

            pub(super) const LEN: usize = [$(Indexes::$F,)+].len();
        }

        /// A future which waits for all branches of a tuple to complete,
        /// accumulating every logical failure.
        ///
        /// This `struct` is created by the [`join_or_accumulate`] and
        /// [`join_or_reduce`] methods on the [`JoinOrAccumulate`] trait. See
        /// its documentation for more.
        ///
        /// [`join_or_accumulate`]: crate::future::JoinOrAccumulate::join_or_accumulate
        /// [`join_or_reduce`]: crate::future::JoinOrAccumulate::join_or_reduce
        /// [`JoinOrAccumulate`]: crate::future::JoinOrAccumulate
        #[pin_project]
        #[must_use = "futures do nothing unless you `.await` or poll them"]
        #[allow(non_snake_case)]
        pub struct $StructName<$($F, $T,)+ E, A>
        where
            $($F: Future<Output = Result<$T, Report<E>>>,)+
            A: Accumulator<E>,
        {
            #[pin]
            futures: $mod_name::Futures<$($F,)+>,
            outputs: ($(Option<$T>,)+),
            reports: [Option<Report<E>>; $mod_name::LEN],
            state: [BranchState; $mod_name::LEN],
            /// How many branches currently hold a permit.
            active: usize,
            /// The concurrency budget; `usize::MAX` when unbounded.
            limit: usize,
            /// The error-merging strategy; `None` once the future has completed.
            acc: Option<A>,
        }

        impl<$($F, $T,)+ E, A> $StructName<$($F, $T,)+ E, A>
        where
            $($F: Future<Output = Result<$T, Report<E>>>,)+
            A: Accumulator<E>,
        {
            pub(crate) fn new(($($F,)+): ($($F,)+), acc: A) -> Self {
                Self {
                    futures: $mod_name::Futures { $($F,)+ },
                    outputs: ($(Option::<$T>::None,)+),
                    reports: core::array::from_fn(|_| None),
                    state: [BranchState::Queued; $mod_name::LEN],
                    active: 0,
                    limit: usize::MAX,
                    acc: Some(acc),
                }
            }

            /// Bounds how many branches may be running at once.
            ///
            /// `None` means unbounded. Branches are admitted in input order
            /// as permits free up; a branch holds its permit from the moment
            /// it is first polled until it completes, so a limit of one is
            /// true mutual exclusion.
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
            /// A branch is handed to [`Executor::spawn`] when it is admitted,
            /// not up front, so [`limit`] still bounds how much work is
            /// running on the executor at once.
            ///
            /// Must be called before the future is first polled.
            ///
            /// [`limit`]: Self::limit
            pub fn via<'a, X>(
                self,
                executor: &'a X,
            ) -> $StructName<$(Via<'a, X, $F>, $T,)+ E, A>
            where
                X: Executor,
                $(
                    $F: Send + 'static,
                    $T: Send + 'static,
                )+
                E: Send + 'static,
            {
                debug_assert!(
                    self.state.iter().all(|state| *state == BranchState::Queued),
                    "via must be called before the future is first polled"
                );
                let $mod_name::Futures { $($F,)+ } = self.futures;
                $StructName {
                    futures: $mod_name::Futures { $($F: Via::new(executor, $F),)+ },
                    outputs: self.outputs,
                    reports: self.reports,
                    state: self.state,
                    active: self.active,
                    limit: self.limit,
                    acc: self.acc,
                }
            }
        }

        impl<$($F, $T,)+ E, A> fmt::Debug for $StructName<$($F, $T,)+ E, A>
        where
            $($F: Future<Output = Result<$T, Report<E>>>,)+
            A: Accumulator<E>,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.state.iter()).finish()
            }
        }

        #[allow(unused_parens)]
        impl<$($F, $T,)+ E, A> Future for $StructName<$($F, $T,)+ E, A>
        where
            $($F: Future<Output = Result<$T, Report<E>>>,)+
            A: Accumulator<E>,
        {
            type Output = Result<($($T,)+), A::Error>;

            fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
                const LEN: usize = $mod_name::LEN;

                let mut this = self.project();

                assert!(
                    this.acc.is_some(),
                    "Futures must not be polled after completing"
                );

                let mut futures = this.futures.project();

                loop {
                    // Admit queued branches in input order while the budget
                    // allows.
                    for index in 0..LEN {
                        if *this.active < *this.limit
                            && this.state[index] == BranchState::Queued
                        {
                            this.state[index] = BranchState::Running;
                            *this.active += 1;
                        }
                    }

                    // Poll every branch holding a permit. Completion releases
                    // the permit, letting the next pass admit a queued branch.
                    let mut progressed = false;
                    $(
                        if this.state[$idx] == BranchState::Running {
                            if let Poll::Ready(output) = futures.$F.as_mut().poll(cx) {
                                this.state[$idx] = BranchState::Done;
                                *this.active -= 1;
                                progressed = true;
                                match output {
                                    Ok(value) => this.outputs.$idx = Some(value),
                                    Err(report) => this.reports[$idx] = Some(report),
                                }
                            }
                        }
                    )+

                    if this.state.iter().all(|state| *state == BranchState::Done) {
                        // Fold all reports in input order, never completion
                        // order.
                        let mut acc = this.acc.take().unwrap();
                        for report in this.reports.iter_mut() {
                            if let Some(report) = report.take() {
                                acc.push(report);
                            }
                        }
                        return Poll::Ready(match acc.finish() {
                            Some(error) => Err(error),
                            None => Ok(($(this.outputs.$idx.take().unwrap(),)+)),
                        });
                    }

                    if !progressed {
                        return Poll::Pending;
                    }
                }
            }
        }

        impl<E, $($F, $T),+> JoinOrAccumulateTrait for ($($F,)+)
        where
            $($F: IntoFuture<Output = Result<$T, Report<E>>>,)+
        {
            type Value = ($($T,)+);
            type Error = E;
            type Accumulate = $StructName<$($F::IntoFuture, $T,)+ E, Collect<E>>;
            type Reduce<C> = $StructName<$($F::IntoFuture, $T,)+ E, Fold<E, C>>
            where
                C: FnMut(E, E) -> E;

            fn join_or_accumulate(self) -> Self::Accumulate {
                let ($($F,)+) = self;
                $StructName::new(($($F.into_future(),)+), Collect::new())
            }

            fn join_or_reduce<C>(self, combine: C) -> Self::Reduce<C>
            where
                C: FnMut(E, E) -> E,
            {
                let ($($F,)+) = self;
                $StructName::new(($($F.into_future(),)+), Fold::new(combine))
            }
        }
    };
}

impl_join_or_accumulate_tuple! { join_or_accumulate_2 JoinOrAccumulate2 (F0 T0 0) (F1 T1 1) }
impl_join_or_accumulate_tuple! { join_or_accumulate_3 JoinOrAccumulate3 (F0 T0 0) (F1 T1 1) (F2 T2 2) }
impl_join_or_accumulate_tuple! { join_or_accumulate_4 JoinOrAccumulate4 (F0 T0 0) (F1 T1 1) (F2 T2 2) (F3 T3 3) }
impl_join_or_accumulate_tuple! { join_or_accumulate_5 JoinOrAccumulate5 (F0 T0 0) (F1 T1 1) (F2 T2 2) (F3 T3 3) (F4 T4 4) }
impl_join_or_accumulate_tuple! { join_or_accumulate_6 JoinOrAccumulate6 (F0 T0 0) (F1 T1 1) (F2 T2 2) (F3 T3 3) (F4 T4 4) (F5 T5 5) }
impl_join_or_accumulate_tuple! { join_or_accumulate_7 JoinOrAccumulate7 (F0 T0 0) (F1 T1 1) (F2 T2 2) (F3 T3 3) (F4 T4 4) (F5 T5 5) (F6 T6 6) }
impl_join_or_accumulate_tuple! { join_or_accumulate_8 JoinOrAccumulate8 (F0 T0 0) (F1 T1 1) (F2 T2 2) (F3 T3 3) (F4 T4 4) (F5 T5 5) (F6 T6 6) (F7 T7 7) }
impl_join_or_accumulate_tuple! { join_or_accumulate_9 JoinOrAccumulate9 (F0 T0 0) (F1 T1 1) (F2 T2 2) (F3 T3 3) (F4 T4 4) (F5 T5 5) (F6 T6 6) (F7 T7 7) (F8 T8 8) }
