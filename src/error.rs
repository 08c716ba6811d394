//! Errors raised by the engine itself.
//!
//! Errors produced inside a running pipeline travel through
//! [`Observer::error`](crate::observer::Observer::error) with the pipeline's
//! own `Err` type. This module only covers failures that happen while a
//! pipeline is being built or subscribed, which are returned to the caller
//! synchronously.

use thiserror::Error;

/// Build-time and subscribe-time failures.
#[derive(Error, Debug)]
pub enum Error {
  /// Malformed construction parameters, e.g. a negative `range` count.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// The scheduler was shut down and no longer accepts work.
  #[error("scheduler has been shut down")]
  SchedulerShutdown,

  /// The underlying executor refused the task.
  #[error("failed to spawn task: {0}")]
  Spawn(String),

  /// Worker threads could not be created.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn display() {
    let e = Error::InvalidArgument("count >= 0 required but it was -1".into());
    assert_eq!(e.to_string(), "invalid argument: count >= 0 required but it was -1");
    assert_eq!(Error::SchedulerShutdown.to_string(), "scheduler has been shut down");
  }

  #[test]
  fn from_io() {
    let io = std::io::Error::other("no threads");
    let e: Error = io.into();
    assert!(matches!(e, Error::Io(_)));
  }
}
