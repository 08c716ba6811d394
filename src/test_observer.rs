//! A recording observer for tests.
//!
//! [`TestObserver`] remembers every notification it receives and lets the
//! test thread wait for them. Clones share the same record, so keep one
//! clone and subscribe another:
//!
//! ```
//! use coldrx::prelude::*;
//!
//! let observer = TestObserver::new();
//! observable::from_iter(["the", "quick", "brown", "fox"])
//!   .zip_with(observable::range(1, i64::MAX).unwrap(), |w, i| format!("{i}. {w}"))
//!   .actual_subscribe(observer.clone())
//!   .unwrap();
//!
//! observer.assert_complete().assert_no_errors().assert_value_count(4);
//! assert!(observer.values().contains(&"4. fox".to_string()));
//! ```

use std::{
  fmt::Debug,
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
  time::Duration,
};

struct Record<Item, Err> {
  values: Vec<Item>,
  errors: Vec<Err>,
  completions: usize,
  disposed: bool,
}

impl<Item, Err> Record<Item, Err> {
  fn is_terminated(&self) -> bool { self.completions > 0 || !self.errors.is_empty() }
}

struct Shared<Item, Err> {
  record: Mutex<Record<Item, Err>>,
  changed: Condvar,
}

pub struct TestObserver<Item, Err> {
  shared: Arc<Shared<Item, Err>>,
}

impl<Item, Err> Clone for TestObserver<Item, Err> {
  fn clone(&self) -> Self { TestObserver { shared: self.shared.clone() } }
}

impl<Item, Err> Default for TestObserver<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> TestObserver<Item, Err> {
  pub fn new() -> Self {
    TestObserver {
      shared: Arc::new(Shared {
        record: Mutex::new(Record {
          values: vec![],
          errors: vec![],
          completions: 0,
          disposed: false,
        }),
        changed: Condvar::new(),
      }),
    }
  }

  fn record(&self) -> MutexGuard<'_, Record<Item, Err>> {
    self.shared.record.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn update(&self, f: impl FnOnce(&mut Record<Item, Err>)) {
    f(&mut self.record());
    self.shared.changed.notify_all();
  }

  /// Waits until `done` holds for the record or `timeout` elapses. Returns
  /// whether `done` held.
  fn wait_until(&self, timeout: Duration, done: impl Fn(&Record<Item, Err>) -> bool) -> bool {
    let guard = self.record();
    let (guard, _) = self
      .shared
      .changed
      .wait_timeout_while(guard, timeout, |r| !done(r))
      .unwrap_or_else(PoisonError::into_inner);
    done(&guard)
  }

  pub fn values(&self) -> Vec<Item>
  where
    Item: Clone,
  {
    self.record().values.clone()
  }

  pub fn value_count(&self) -> usize { self.record().values.len() }

  pub fn errors(&self) -> Vec<Err>
  where
    Err: Clone,
  {
    self.record().errors.clone()
  }

  pub fn completions(&self) -> usize { self.record().completions }

  pub fn is_completed(&self) -> bool { self.completions() > 0 }

  pub fn is_terminated(&self) -> bool { self.record().is_terminated() }

  /// Closes the observer; a subscription feeding it stops before its next
  /// pull, without a terminal notification.
  pub fn dispose(&self) { self.update(|r| r.disposed = true); }

  pub fn is_disposed(&self) -> bool { self.record().disposed }

  /// Blocks until a terminal notification arrived or `timeout` elapsed.
  pub fn await_terminal_event(&self, timeout: Duration) -> bool {
    self.wait_until(timeout, Record::is_terminated)
  }

  /// Blocks until at least `count` values arrived or `timeout` elapsed.
  pub fn await_count(&self, count: usize, timeout: Duration) -> bool {
    self.wait_until(timeout, |r| r.values.len() >= count)
  }

  // ==================== Assertions ====================

  #[track_caller]
  pub fn assert_complete(&self) -> &Self {
    let completions = self.completions();
    assert_eq!(completions, 1, "expected exactly one completion, got {completions}");
    self
  }

  #[track_caller]
  pub fn assert_not_complete(&self) -> &Self {
    assert_eq!(self.completions(), 0, "expected no completion");
    self
  }

  #[track_caller]
  pub fn assert_no_errors(&self) -> &Self {
    let errors = self.record().errors.len();
    assert_eq!(errors, 0, "expected no errors, got {errors}");
    self
  }

  #[track_caller]
  pub fn assert_value_count(&self, count: usize) -> &Self {
    assert_eq!(self.value_count(), count, "unexpected number of values");
    self
  }

  #[track_caller]
  pub fn assert_values(&self, expected: &[Item]) -> &Self
  where
    Item: PartialEq + Debug,
  {
    assert_eq!(self.record().values.as_slice(), expected);
    self
  }

  /// Asserts exactly one error, equal to `expected`.
  #[track_caller]
  pub fn assert_error(&self, expected: &Err) -> &Self
  where
    Err: PartialEq + Debug,
  {
    let record = self.record();
    assert_eq!(record.errors.len(), 1, "expected exactly one error, got {}", record.errors.len());
    assert_eq!(&record.errors[0], expected);
    drop(record);
    self
  }
}

impl<Item, Err> crate::observer::Observer<Item, Err> for TestObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.update(|r| r.values.push(value)); }

  fn error(self, err: Err) { self.update(|r| r.errors.push(err)); }

  fn complete(self) { self.update(|r| r.completions += 1); }

  fn is_closed(&self) -> bool { self.is_disposed() }
}

#[cfg(test)]
mod test {
  use std::{thread, time::Duration};

  use crate::prelude::*;

  #[test]
  fn records_everything() {
    let observer = TestObserver::new();
    observable::from_iter([1, 2, 3])
      .actual_subscribe(observer.clone())
      .unwrap();

    observer
      .assert_complete()
      .assert_no_errors()
      .assert_value_count(3)
      .assert_values(&[1, 2, 3]);
    assert!(observer.is_terminated());
  }

  #[test]
  fn records_error() {
    let observer = TestObserver::new();
    observable::from_iter([1])
      .with_err()
      .concat_with(observable::throw_err("boom"))
      .actual_subscribe(observer.clone())
      .unwrap();

    observer.assert_error(&"boom").assert_not_complete();
  }

  #[test]
  fn await_from_other_thread() {
    let observer = TestObserver::<i32, ()>::new();
    let mut feeder = observer.clone();
    let handle = thread::spawn(move || {
      thread::sleep(Duration::from_millis(20));
      for i in 0..3 {
        feeder.next(i);
      }
      feeder.complete();
    });

    assert!(observer.await_count(3, Duration::from_secs(2)));
    assert!(observer.await_terminal_event(Duration::from_secs(2)));
    handle.join().unwrap();
  }

  #[test]
  fn await_times_out() {
    let observer = TestObserver::<i32, ()>::new();
    assert!(!observer.await_terminal_event(Duration::from_millis(10)));
  }

  #[test]
  fn dispose_closes() {
    let observer = TestObserver::<i32, ()>::new();
    assert!(!observer.is_closed());
    observer.dispose();
    assert!(observer.is_closed());
  }
}
