use std::{env, num::NonZeroUsize, thread};

use tracing::warn;

/// Environment variable overriding the size of the computation pool.
pub const COMPUTATION_THREADS_ENV: &str = "COLDRX_COMPUTATION_THREADS";

/// Worker pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
  /// Number of worker threads, at least one.
  pub pool_size: usize,
  /// Prefix of the worker thread names; the worker index is appended.
  pub name_prefix: String,
}

impl Default for PoolConfig {
  fn default() -> Self {
    PoolConfig { pool_size: available_threads(), name_prefix: "coldrx-pool-".to_owned() }
  }
}

impl PoolConfig {
  pub fn pool_size(mut self, pool_size: usize) -> Self {
    self.pool_size = pool_size;
    self
  }

  pub fn name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
    self.name_prefix = name_prefix.into();
    self
  }

  /// Settings of the process-wide computation pool: one worker per
  /// available core unless [`COMPUTATION_THREADS_ENV`] says otherwise.
  pub fn computation() -> Self {
    let pool_size =
      threads_override(env::var(COMPUTATION_THREADS_ENV).ok().as_deref()).unwrap_or_else(available_threads);
    PoolConfig { pool_size, name_prefix: "coldrx-computation-".to_owned() }
  }
}

fn available_threads() -> usize { thread::available_parallelism().map_or(1, NonZeroUsize::get) }

fn threads_override(value: Option<&str>) -> Option<usize> {
  let value = value?;
  match value.trim().parse::<usize>() {
    Ok(n) if n > 0 => Some(n),
    _ => {
      warn!(value, "ignoring invalid {COMPUTATION_THREADS_ENV}");
      None
    }
  }
}
