//! Error-accumulating combinators for fallible computations, sync and
//! `async`.
//!
//! `Result` and `?` short-circuit: the first error wins and every later
//! branch is skipped. That is the right default for control flow, but the
//! wrong shape for validation-style work where the caller wants *every*
//! failure that occurred — think form validation, config loading, or fanning
//! out requests and reporting all the ones that came back bad.
//!
//! This library provides combinators which run every branch to completion and
//! return either all the values or all the errors:
//!
//! - [`zip::ZipOrAccumulate`]: run a tuple of fallible closures, in order.
//! - [`map::MapOrAccumulate`]: run a fallible function over a collection.
//! - [`future::JoinOrAccumulate`]: await a tuple or `Vec` of fallible
//!   futures concurrently, with an optional concurrency limit and an
//!   optional [`Executor`] to run branches on.
//!
//! Each operation comes in two flavors: `*_or_accumulate` collects every
//! error into a non-empty, input-ordered [`AggregateError`], and
//! `*_or_reduce` folds every error into a single one with a caller-supplied
//! `combine` function.
//!
//! # Reporting failures
//!
//! Branches report failure through [`Report`]: `Report::One` carries a
//! single error, `Report::Many` forwards the whole batch of a nested
//! accumulation. Both are logical failures — they are accumulated, and never
//! stop sibling branches. A panic is a *fault*: it is never caught or
//! accumulated, and unwinds past the operation, cancelling in-flight
//! branches by dropping them.
//!
//! # Examples
//!
//! Validate several fields at once, keeping every complaint:
//!
//! ```rust
//! use futures_accumulate::prelude::*;
//! use futures_accumulate::Report;
//!
//! fn nonzero(n: u32, field: &'static str) -> Result<u32, Report<&'static str>> {
//!     if n == 0 {
//!         Err(Report::One(field))
//!     } else {
//!         Ok(n)
//!     }
//! }
//!
//! let err = (
//!     || nonzero(0, "width"),
//!     || nonzero(3, "height"),
//!     || nonzero(0, "depth"),
//! )
//!     .zip_or_accumulate();
//! assert_eq!(&err.unwrap_err()[..], ["width", "depth"]);
//! ```
//!
//! Fan out concurrently, bounding how many branches run at once:
//!
//! ```rust
//! use futures_accumulate::prelude::*;
//! use futures_accumulate::Report;
//! use std::num::NonZeroUsize;
//!
//! futures_lite::future::block_on(async {
//!     let futures: Vec<_> = (0..10u32)
//!         .map(|n| async move { Ok::<_, Report<String>>(n * 2) })
//!         .collect();
//!
//!     let values = futures
//!         .join_or_accumulate()
//!         .limit(NonZeroUsize::new(4))
//!         .await
//!         .unwrap();
//!     assert_eq!(values, (0..20).step_by(2).collect::<Vec<_>>());
//! })
//! ```

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]
#![allow(non_snake_case)]

mod accumulator;
mod executor;
mod report;

pub mod future;
pub mod map;
pub mod zip;

pub use accumulator::{Accumulator, Collect, Fold};
pub use executor::{Executor, Via};
pub use report::{AggregateError, Report};

/// The futures accumulate prelude.
pub mod prelude {
    pub use super::future::JoinOrAccumulate as _;
    pub use super::map::MapOrAccumulate as _;
    pub use super::zip::ZipOrAccumulate as _;
}

/// Helper types for tuples.
pub mod tuple {
    pub use crate::future::join_or_accumulate::tuple::{
        JoinOrAccumulate2, JoinOrAccumulate3, JoinOrAccumulate4, JoinOrAccumulate5,
        JoinOrAccumulate6, JoinOrAccumulate7, JoinOrAccumulate8, JoinOrAccumulate9,
    };
}

/// Helper types for contiguous growable array type with heap-allocated contents,
/// written `Vec<T>`.
pub mod vec {
    pub use crate::future::join_or_accumulate::vec::JoinOrAccumulate;
}
