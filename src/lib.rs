//! # coldrx: a small cold-observable engine
//!
//! Observables here are lazy descriptions of a push-based stream. Building a
//! pipeline runs nothing; every `subscribe` starts an independent run that
//! pushes values into an [`Observer`] until the stream completes, fails or is
//! cancelled.
//!
//! ## Quick Start
//!
//! ```rust
//! use coldrx::prelude::*;
//!
//! let words = ["the", "quick", "brown", "fox"];
//! let mut lines = vec![];
//! observable::from_iter(words)
//!   .zip_with(observable::range(1, i64::MAX)?, |word, i| format!("{i}. {word}"))
//!   .subscribe(|line| lines.push(line))?;
//!
//! assert_eq!(lines[3], "4. fox");
//! # Ok::<(), coldrx::Error>(())
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ObservableExt`] | Operators and `subscribe` helpers |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`SubscriptionHandle`] | Lifecycle state and cancellation of one subscription |
//! | [`Scheduler`] | Where a subscription runs: immediately or on a pool |
//! | [`BlockingObservable`] | Drains a pipeline from the calling thread |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): [`PooledScheduler`] and the shared
//!   computation pool, backed by the `futures` thread pool
//! - **`tokio-scheduler`**: [`TokioScheduler`], running tasks on a tokio runtime
//!   it owns
//!
//! [`ObservableExt`]: observable::ObservableExt
//! [`Observer`]: observer::Observer
//! [`SubscriptionHandle`]: subscription::SubscriptionHandle
//! [`Scheduler`]: scheduler::Scheduler
//! [`BlockingObservable`]: observable::BlockingObservable
//! [`PooledScheduler`]: scheduler::PooledScheduler
//! [`TokioScheduler`]: scheduler::TokioScheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
mod subscriber;
pub mod subscription;
pub mod test_observer;
mod type_hint;

pub use error::{Error, Result};
