use std::{
  panic::AssertUnwindSafe,
  sync::{Arc, PoisonError, RwLock},
};

use futures::{FutureExt, executor::ThreadPool, future, task::SpawnExt};
use tracing::{debug, error, warn};

use crate::{
  error::{Error, Result},
  scheduler::{PoolConfig, Scheduler},
  subscriber::panic_message,
};

/// Runs tasks on a `futures` thread pool.
///
/// Clones share the same pool. `schedule` returns immediately; each task runs
/// exactly once on one of the workers. Once [`shutdown`](Self::shutdown) has
/// been called on any clone, every clone rejects new work with
/// [`Error::SchedulerShutdown`]. Tasks accepted before that still run.
///
/// A panicking task is logged and does not take its worker down with it.
#[derive(Clone)]
pub struct PooledScheduler {
  pool: Arc<RwLock<Option<ThreadPool>>>,
}

impl PooledScheduler {
  pub fn new(config: PoolConfig) -> Result<Self> {
    if config.pool_size == 0 {
      return Err(Error::InvalidArgument("pool_size must be at least 1".into()));
    }
    let pool = ThreadPool::builder()
      .pool_size(config.pool_size)
      .name_prefix(config.name_prefix.clone())
      .create()?;
    debug!(pool_size = config.pool_size, name_prefix = %config.name_prefix, "thread pool created");
    Ok(PooledScheduler { pool: Arc::new(RwLock::new(Some(pool))) })
  }

  /// Stops accepting work. Workers exit once their queued tasks are done.
  pub fn shutdown(&self) {
    let taken = self.pool.write().unwrap_or_else(PoisonError::into_inner).take();
    if taken.is_some() {
      debug!("thread pool shut down");
    }
  }

  pub fn is_shutdown(&self) -> bool {
    self.pool.read().unwrap_or_else(PoisonError::into_inner).is_none()
  }
}

impl Scheduler for PooledScheduler {
  fn schedule<F>(&self, task: F) -> Result<()>
  where
    F: FnOnce() + Send + 'static,
  {
    let guard = self.pool.read().unwrap_or_else(PoisonError::into_inner);
    let Some(pool) = guard.as_ref() else {
      warn!("task rejected: thread pool is shut down");
      return Err(Error::SchedulerShutdown);
    };
    let task = AssertUnwindSafe(future::lazy(move |_| task())).catch_unwind().map(|res| {
      if let Err(payload) = res {
        error!(panic = panic_message(&payload), "task panicked on a pool worker");
      }
    });
    pool.spawn(task).map_err(|e| {
      warn!(error = %e, "task rejected by thread pool");
      Error::Spawn(e.to_string())
    })
  }
}
