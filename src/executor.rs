use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use pin_project::pin_project;

/// An execution resource that branches of a concurrent operation can be
/// shifted onto.
///
/// By default the concurrent operations poll their branches on whichever task
/// awaits them. Passing an `Executor` through the `via` adapter reroutes
/// every branch through [`spawn`] instead, so the branches run on a specific
/// worker pool or runtime. A branch is handed to [`spawn`] only when the
/// operation admits it, so a concurrency limit bounds the work running on the
/// executor just as it bounds ambient branches.
///
/// # Contract
///
/// The returned [`Task`] must resolve to the spawned future's output, and
/// dropping it must stop the underlying work. The combinators rely on this
/// for cancellation: when one branch faults (panics), the combinator unwinds
/// and drops the remaining task handles.
///
/// [`spawn`]: Executor::spawn
/// [`Task`]: Executor::Task
pub trait Executor {
    /// Handle to a spawned task, resolving to the task's output.
    type Task<T: Send + 'static>: Future<Output = T> + Send;

    /// Submits a future to this execution resource.
    fn spawn<F>(&self, future: F) -> Self::Task<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;
}

/// A branch rerouted through an [`Executor`].
///
/// This `struct` is created by the `via` adapters on the concurrent
/// combinators. The inner future is handed to [`Executor::spawn`] on first
/// poll, not on construction, so work starts only once the branch has been
/// admitted by the enclosing operation.
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub struct Via<'a, X, F>
where
    X: Executor,
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    executor: &'a X,
    queued: Option<F>,
    #[pin]
    task: Option<X::Task<F::Output>>,
}

impl<'a, X, F> Via<'a, X, F>
where
    X: Executor,
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    pub(crate) fn new(executor: &'a X, future: F) -> Self {
        Self {
            executor,
            queued: Some(future),
            task: None,
        }
    }
}

impl<'a, X, F> fmt::Debug for Via<'a, X, F>
where
    X: Executor,
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Via")
            .field("spawned", &self.queued.is_none())
            .finish_non_exhaustive()
    }
}

impl<'a, X, F> Future for Via<'a, X, F>
where
    X: Executor,
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        // Spawn at first poll: admission, not construction, starts the work.
        if let Some(future) = this.queued.take() {
            this.task.set(Some(this.executor.spawn(future)));
        }

        match this.task.as_pin_mut() {
            Some(task) => task.poll(cx),
            None => unreachable!("the branch is spawned on first poll"),
        }
    }
}
