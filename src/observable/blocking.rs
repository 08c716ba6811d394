use std::panic;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::trace;

use crate::{
  error,
  observable::{InlineObservable, ObservableType, Subscribable},
  observer::Observer,
  subscription::{SubscriptionHandle, SubscriptionState},
};

/// Pipelines that can be drained from the calling thread.
///
/// Inline pipelines are drained lazily: each `next` pulls exactly one
/// element through the pipeline on the calling thread, so unbounded sources
/// are fine. Scheduled pipelines produce on their scheduler and hand the
/// notifications over through a channel; see [`BlockingIter`].
///
/// Either way the iterator yields `Some(Ok(v))` for a value, `Some(Err(e))`
/// once when the stream fails, and `None` after completion or failure.
/// Dropping the iterator early cancels the subscription.
pub trait BlockingObservable: ObservableType {
  type Iter: Iterator<Item = Result<Self::Item, Self::Err>>;

  fn into_blocking_iter(self) -> error::Result<Self::Iter>;
}

impl<S: InlineObservable> BlockingObservable for S {
  type Iter = PullIter<S::Cursor>;

  fn into_blocking_iter(self) -> error::Result<Self::Iter> {
    Ok(PullIter { cursor: self.into_cursor(), handle: SubscriptionHandle::new() })
  }
}

/// Blocking view of an inline pipeline: pulls the cursor on demand.
pub struct PullIter<C> {
  cursor: C,
  handle: SubscriptionHandle,
}

impl<C> PullIter<C> {
  /// The subscription this iterator drains.
  pub fn subscription(&self) -> &SubscriptionHandle { &self.handle }
}

impl<C, Item, Err> Iterator for PullIter<C>
where
  C: Iterator<Item = Result<Item, Err>>,
{
  type Item = Result<Item, Err>;

  fn next(&mut self) -> Option<Self::Item> {
    // fails once the subscription is terminal
    if !self.handle.activate() {
      return None;
    }
    let pulled = self.cursor.next();
    if self.handle.is_cancelled() {
      return None;
    }
    match pulled {
      Some(Ok(v)) => Some(Ok(v)),
      Some(Err(err)) => self.handle.finish(SubscriptionState::Errored).then_some(Err(err)),
      None => {
        self.handle.finish(SubscriptionState::Completed);
        None
      }
    }
  }
}

impl<C> Drop for PullIter<C> {
  fn drop(&mut self) {
    if self.handle.cancel() {
      trace!("blocking iterator dropped before the stream ended");
    }
  }
}

enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// Observer end of a [`BlockingIter`]: forwards every notification into a
/// channel read by the blocked thread.
pub struct BlockingObserver<Item, Err> {
  tx: Sender<Notification<Item, Err>>,
  closed: bool,
}

impl<Item, Err> Observer<Item, Err> for BlockingObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.tx.send(Notification::Next(value)).is_err() {
      // the iterator is gone, stop the subscription at the next pull
      self.closed = true;
    }
  }

  fn error(self, err: Err) { let _ = self.tx.send(Notification::Error(err)); }

  fn complete(self) { let _ = self.tx.send(Notification::Complete); }

  fn is_closed(&self) -> bool { self.closed }
}

/// Blocking view of a scheduled subscription.
///
/// Each call to `next` blocks the calling thread until the worker delivered
/// a value, failed or completed. The hand-off channel is unbounded, so the
/// worker never waits for the caller.
///
/// If the loop on the worker panics, the panic is resumed on the thread
/// calling `next`. A task the scheduler dropped without running it is a
/// broken [`Scheduler`](crate::scheduler::Scheduler) and panics as well.
pub struct BlockingIter<Item, Err> {
  rx: Receiver<Notification<Item, Err>>,
  handle: SubscriptionHandle,
  done: bool,
}

impl<Item, Err> BlockingIter<Item, Err> {
  pub(crate) fn subscribe<S>(source: S) -> error::Result<Self>
  where
    S: Subscribable<BlockingObserver<Item, Err>>,
  {
    let (tx, rx) = unbounded();
    let handle = source.actual_subscribe(BlockingObserver { tx, closed: false })?;
    trace!("blocking iterator subscribed");
    Ok(BlockingIter { rx, handle, done: false })
  }

  /// The subscription feeding this iterator.
  pub fn subscription(&self) -> &SubscriptionHandle { &self.handle }
}

impl<Item, Err> Iterator for BlockingIter<Item, Err> {
  type Item = Result<Item, Err>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match self.rx.recv() {
      Ok(Notification::Next(v)) => Some(Ok(v)),
      Ok(Notification::Error(err)) => {
        self.done = true;
        Some(Err(err))
      }
      Ok(Notification::Complete) => {
        self.done = true;
        None
      }
      Err(_) => {
        // every sender is gone without a terminal notification
        self.done = true;
        if let Some(payload) = self.handle.take_panic() {
          panic::resume_unwind(payload);
        }
        if !self.handle.is_cancelled() {
          panic!("scheduled subscription ended without a terminal notification");
        }
        None
      }
    }
  }
}

impl<Item, Err> Drop for BlockingIter<Item, Err> {
  fn drop(&mut self) {
    if self.handle.cancel() {
      trace!("blocking iterator dropped before the stream ended");
    }
  }
}
