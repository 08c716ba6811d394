//! Schedulers decide on which thread a subscription runs.
//!
//! A [`Scheduler`] has a single operation: accept a task and run it exactly
//! once. [`ImmediateScheduler`] runs it before `schedule` returns;
//! [`PooledScheduler`] hands it to a worker pool and returns at once.
//!
//! A scheduler that cannot accept work reports it synchronously through the
//! returned `Result`, never through an observer.

#[cfg(feature = "futures-scheduler")]
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "futures-scheduler")]
use once_cell::sync::Lazy;
#[cfg(feature = "futures-scheduler")]
use tracing::debug;

use crate::error::Result;

mod config;
#[cfg(feature = "futures-scheduler")]
mod pooled;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use config::*;
#[cfg(feature = "futures-scheduler")]
pub use pooled::PooledScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

pub trait Scheduler {
  fn schedule<F>(&self, task: F) -> Result<()>
  where
    F: FnOnce() + Send + 'static;
}

/// Runs every task on the calling thread, before `schedule` returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  #[inline]
  fn schedule<F>(&self, task: F) -> Result<()>
  where
    F: FnOnce() + Send + 'static,
  {
    task();
    Ok(())
  }
}

pub fn immediate() -> ImmediateScheduler { ImmediateScheduler }

/// Creates a new worker pool sized by [`PoolConfig::default`].
#[cfg(feature = "futures-scheduler")]
pub fn pooled() -> Result<PooledScheduler> { PooledScheduler::new(PoolConfig::default()) }

// ==================== Process-wide computation pool ====================

#[cfg(feature = "futures-scheduler")]
static COMPUTATION_CONFIG: Lazy<PoolConfig> = Lazy::new(PoolConfig::computation);

#[cfg(feature = "futures-scheduler")]
static COMPUTATION: Mutex<Option<PooledScheduler>> = Mutex::new(None);

/// The shared computation pool.
///
/// Created on first use from [`PoolConfig::computation`]. After
/// [`shutdown_computation`] the next call creates a fresh pool.
#[cfg(feature = "futures-scheduler")]
pub fn computation() -> Result<PooledScheduler> {
  let mut slot = COMPUTATION.lock().unwrap_or_else(PoisonError::into_inner);
  if let Some(scheduler) = slot.as_ref() {
    return Ok(scheduler.clone());
  }
  let scheduler = PooledScheduler::new(COMPUTATION_CONFIG.clone())?;
  debug!(pool_size = COMPUTATION_CONFIG.pool_size, "computation pool initialized");
  *slot = Some(scheduler.clone());
  Ok(scheduler)
}

/// Shuts the shared computation pool down.
///
/// Clones obtained from [`computation`] before this call reject new work
/// with [`Error::SchedulerShutdown`](crate::error::Error::SchedulerShutdown);
/// tasks already handed to the pool still run.
#[cfg(feature = "futures-scheduler")]
pub fn shutdown_computation() {
  let taken = COMPUTATION.lock().unwrap_or_else(PoisonError::into_inner).take();
  if let Some(scheduler) = taken {
    scheduler.shutdown();
    debug!("computation pool shut down");
  }
}
