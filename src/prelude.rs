//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::Error,
  observable::{
    self, BlockingObservable, CoreObservable, InlineObservable, ObservableExt, ObservableType,
    Subscribable,
  },
  observer::{FnMutObserver, Observer, ObserverAll},
  scheduler::{self, ImmediateScheduler, PoolConfig, Scheduler},
  subscription::{Subscription, SubscriptionHandle, SubscriptionState},
  test_observer::TestObserver,
};
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::PooledScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
