use std::{
  panic::{self, AssertUnwindSafe},
  sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicUsize, Ordering},
  },
};

use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error, trace, warn};

use crate::{
  error::{Error, Result},
  scheduler::{PoolConfig, Scheduler},
  subscriber::panic_message,
};

/// Runs tasks on the blocking pool of a tokio runtime it owns.
///
/// A subscription drives its source in a plain loop, so the tasks go to
/// `spawn_blocking` rather than to the async workers. `pool_size` bounds the
/// number of blocking threads.
///
/// Like [`PooledScheduler`](crate::scheduler::PooledScheduler), clones share
/// the runtime and [`shutdown`](Self::shutdown) on any clone makes every
/// clone reject new work with [`Error::SchedulerShutdown`].
#[derive(Clone)]
pub struct TokioScheduler {
  runtime: Arc<RwLock<Option<Runtime>>>,
}

impl TokioScheduler {
  pub fn new(config: PoolConfig) -> Result<Self> {
    if config.pool_size == 0 {
      return Err(Error::InvalidArgument("pool_size must be at least 1".into()));
    }
    let prefix = config.name_prefix.clone();
    let next_id = AtomicUsize::new(0);
    let runtime = Builder::new_multi_thread()
      .worker_threads(1)
      .max_blocking_threads(config.pool_size)
      .thread_name_fn(move || format!("{prefix}{}", next_id.fetch_add(1, Ordering::Relaxed)))
      .build()?;
    debug!(pool_size = config.pool_size, name_prefix = %config.name_prefix, "tokio runtime created");
    Ok(TokioScheduler { runtime: Arc::new(RwLock::new(Some(runtime))) })
  }

  /// Stops accepting work and shuts the runtime down without waiting for
  /// running tasks.
  pub fn shutdown(&self) {
    let taken = self.runtime.write().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(runtime) = taken {
      runtime.shutdown_background();
      debug!("tokio runtime shut down");
    }
  }

  pub fn is_shutdown(&self) -> bool {
    self.runtime.read().unwrap_or_else(PoisonError::into_inner).is_none()
  }
}

impl Scheduler for TokioScheduler {
  fn schedule<F>(&self, task: F) -> Result<()>
  where
    F: FnOnce() + Send + 'static,
  {
    let guard = self.runtime.read().unwrap_or_else(PoisonError::into_inner);
    let Some(runtime) = guard.as_ref() else {
      warn!("task rejected: tokio runtime is shut down");
      return Err(Error::SchedulerShutdown);
    };
    trace!("spawning blocking task");
    drop(runtime.spawn_blocking(move || {
      if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        error!(panic = panic_message(&payload), "task panicked on a blocking thread");
      }
    }));
    Ok(())
  }
}
