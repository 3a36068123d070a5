//! Concurrent error-accumulating operations on futures.
//!
//! The [`JoinOrAccumulate`] family awaits a collection or tuple of fallible
//! branch futures concurrently, then reports either every value or every
//! logical failure — never a partial result. Branch futures have the output
//! type `Result<T, Report<E>>`: an `Err` is a logical failure, accumulated
//! without cancelling sibling branches; a panic is a fault, which unwinds
//! through the combinator and cancels every in-flight branch by dropping it.
//!
//! Values and errors always come back in input order, no matter in which
//! order the branches complete. The returned combinators support two
//! adapters:
//!
//! - `limit(Option<NonZeroUsize>)` bounds how many branches may be running at
//!   once; branches are admitted in input order as slots free up. A limit of
//!   one is true mutual exclusion.
//! - `via(&executor)` reroutes every branch through an [`Executor`], running
//!   them on a caller-supplied resource instead of the ambient task.
//!
//! [`Executor`]: crate::Executor
//!
//! # Examples
//!
//! ```rust
//! use futures_accumulate::prelude::*;
//! use futures_accumulate::{AggregateError, Report};
//!
//! futures_lite::future::block_on(async {
//!     async fn fetch(id: u32) -> Result<u32, Report<String>> {
//!         if id % 2 == 0 {
//!             Ok(id * 10)
//!         } else {
//!             Err(Report::One(format!("no user {id}")))
//!         }
//!     }
//!
//!     let ok: Result<Vec<_>, _> = vec![fetch(0), fetch(2)].join_or_accumulate().await;
//!     assert_eq!(ok.unwrap(), vec![0, 20]);
//!
//!     let err = vec![fetch(1), fetch(2), fetch(3)].join_or_accumulate().await;
//!     let err: AggregateError<String> = err.unwrap_err();
//!     assert_eq!(&err[..], ["no user 1", "no user 3"]);
//! })
//! ```

pub use join_or_accumulate::JoinOrAccumulate;

pub(crate) mod join_or_accumulate;
