use std::panic::{self, AssertUnwindSafe};

use tracing::{error, trace};

use crate::{
  observer::Observer,
  subscription::{PanicPayload, SubscriptionHandle, SubscriptionState},
};

/// Drives one subscription: pulls from the source cursor and pushes every
/// result into the observer, honoring the handle's state machine.
///
/// All notifications of a subscription are issued from the single call to
/// [`Subscriber::run`], so an observer never sees two of them at once, even
/// when the run happens on a worker thread.
pub(crate) struct Subscriber<O> {
  observer: O,
  handle: SubscriptionHandle,
}

enum Outcome<Err> {
  Completed,
  Errored(Err),
  Stopped,
}

impl<O> Subscriber<O> {
  pub(crate) fn new(observer: O, handle: SubscriptionHandle) -> Self {
    Subscriber { observer, handle }
  }

  /// Runs the subscription on the calling thread. A panic in the pipeline
  /// unwinds into the caller.
  pub(crate) fn run<C, Item, Err>(self, cursor: C)
  where
    C: Iterator<Item = Result<Item, Err>>,
    O: Observer<Item, Err>,
  {
    let Subscriber { mut observer, handle } = self;
    let outcome = drive(&mut observer, &handle, cursor);
    deliver(observer, &handle, outcome);
  }

  /// Runs the subscription on a scheduler worker. A panic in the pipeline is
  /// recorded on the handle before the observer is dropped, so whoever is
  /// draining the subscription finds the payload once the observer is gone.
  pub(crate) fn run_catching<C, Item, Err>(self, cursor: C)
  where
    C: Iterator<Item = Result<Item, Err>>,
    O: Observer<Item, Err>,
  {
    let Subscriber { mut observer, handle } = self;
    match panic::catch_unwind(AssertUnwindSafe(|| drive(&mut observer, &handle, cursor))) {
      Ok(outcome) => deliver(observer, &handle, outcome),
      Err(payload) => {
        error!(panic = panic_message(&payload), "scheduled subscription panicked");
        handle.set_panic(payload);
        drop(observer);
      }
    }
  }
}

fn drive<C, O, Item, Err>(observer: &mut O, handle: &SubscriptionHandle, mut cursor: C) -> Outcome<Err>
where
  C: Iterator<Item = Result<Item, Err>>,
  O: Observer<Item, Err>,
{
  if !handle.activate() {
    trace!("subscription cancelled before start");
    return Outcome::Stopped;
  }
  trace!("subscription active");

  let mut emitted = 0usize;
  loop {
    if stopped(observer.is_closed(), handle) {
      trace!(emitted, "subscription cancelled");
      return Outcome::Stopped;
    }
    let pulled = cursor.next();
    // the pull may have raced with a cancel from another thread
    if stopped(observer.is_closed(), handle) {
      trace!(emitted, "subscription cancelled");
      return Outcome::Stopped;
    }
    match pulled {
      Some(Ok(value)) => {
        observer.next(value);
        emitted += 1;
      }
      Some(Err(err)) => {
        trace!(emitted, "subscription errored");
        return Outcome::Errored(err);
      }
      None => {
        trace!(emitted, "subscription completed");
        return Outcome::Completed;
      }
    }
  }
}

fn deliver<O, Item, Err>(observer: O, handle: &SubscriptionHandle, outcome: Outcome<Err>)
where
  O: Observer<Item, Err>,
{
  match outcome {
    Outcome::Completed => {
      if handle.finish(SubscriptionState::Completed) {
        observer.complete();
      }
    }
    Outcome::Errored(err) => {
      if handle.finish(SubscriptionState::Errored) {
        observer.error(err);
      }
    }
    Outcome::Stopped => {}
  }
}

fn stopped(observer_closed: bool, handle: &SubscriptionHandle) -> bool {
  if observer_closed {
    handle.cancel();
  }
  handle.is_cancelled()
}

/// Best-effort text of a panic payload, for logging.
pub(crate) fn panic_message(payload: &PanicPayload) -> &str {
  if let Some(msg) = payload.downcast_ref::<&str>() {
    msg
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg
  } else {
    "<non-string panic payload>"
  }
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, convert::Infallible};

  use super::*;
  use crate::observer::ObserverAll;

  #[test]
  fn error_stops_pulling() {
    let mut pulled = 0;
    let cursor = [Ok(1), Err("boom"), Ok(3)].into_iter().inspect(|_| pulled += 1);
    let mut values = vec![];
    let mut errors = 0;
    let mut completes = 0;
    let handle = SubscriptionHandle::new();
    Subscriber::new(
      ObserverAll::new(|v| values.push(v), |_| errors += 1, || completes += 1),
      handle.clone(),
    )
    .run(cursor);

    assert_eq!(values, vec![1]);
    assert_eq!(errors, 1);
    assert_eq!(completes, 0);
    assert_eq!(pulled, 2);
    assert_eq!(handle.state(), SubscriptionState::Errored);
  }

  #[test]
  fn closed_observer_cancels() {
    struct TakeTwo(Vec<i32>);
    impl Observer<i32, Infallible> for TakeTwo {
      fn next(&mut self, value: i32) { self.0.push(value); }
      fn error(self, _: Infallible) {}
      fn complete(self) { panic!("a cancelled subscription must not complete") }
      fn is_closed(&self) -> bool { self.0.len() >= 2 }
    }

    let handle = SubscriptionHandle::new();
    Subscriber::new(TakeTwo(vec![]), handle.clone()).run((0..10).map(Ok));
    assert_eq!(handle.state(), SubscriptionState::Cancelled);
  }

  #[test]
  fn caught_panic_lands_on_handle() {
    let handle = SubscriptionHandle::new();
    let completed = Cell::new(false);
    Subscriber::new(
      ObserverAll::new(|_: i32| {}, |_: Infallible| {}, || completed.set(true)),
      handle.clone(),
    )
    .run_catching((0..10).map(|v| if v == 3 { panic!("bad element") } else { Ok(v) }));

    assert!(!completed.get());
    assert!(handle.is_panicked());
    assert_eq!(handle.state(), SubscriptionState::Active);
    assert_eq!(panic_message(&handle.take_panic().unwrap()), "bad element");
  }

  #[test]
  fn cancelled_handle_never_starts() {
    let handle = SubscriptionHandle::new();
    handle.cancel();
    let hit = Cell::new(false);
    Subscriber::new(
      ObserverAll::new(|_: i32| hit.set(true), |_: Infallible| {}, || hit.set(true)),
      handle,
    )
    .run((0..10).map(Ok));
    assert!(!hit.get());
  }
}
