//! Failures inside scheduled subscriptions: a panicking stage on a worker and
//! a scheduler that no longer accepts work. Neither may look like a shorter
//! or empty successful stream.

use std::{
  panic::{self, AssertUnwindSafe},
  time::Duration,
};

use coldrx::prelude::*;

const WORDS: [&str; 9] = ["the", "quick", "brown", "fox", "jumped", "over", "the", "lazy", "dog"];

fn numbered_words() -> impl CoreObservable<Item = String, Err = std::convert::Infallible> + Clone + Send + 'static {
  observable::from_iter(WORDS)
    .zip_with(observable::range(1, i64::MAX).unwrap(), |word, i| format!("{i}.{word}"))
}

#[cfg(feature = "futures-scheduler")]
#[test]
fn panic_on_worker_reaches_the_blocking_caller() {
  let pool = PooledScheduler::new(PoolConfig::default().pool_size(1)).unwrap();
  let iter = numbered_words()
    .map(|line| if line.ends_with("fox") { panic!("cannot number a fox") } else { line })
    .subscribe_on(pool.clone())
    .blocking_iter()
    .unwrap();

  let mut seen = vec![];
  let drained = panic::catch_unwind(AssertUnwindSafe(|| {
    for line in iter {
      seen.push(line.unwrap_or_else(|e| match e {}));
    }
  }));

  let payload = drained.unwrap_err();
  assert_eq!(payload.downcast_ref::<&str>(), Some(&"cannot number a fox"));
  assert_eq!(seen, vec!["1.the", "2.quick", "3.brown"]);

  // the single worker survived the panic
  let lines: Vec<_> = numbered_words()
    .subscribe_on(pool)
    .blocking_iter()
    .unwrap()
    .map(|line| line.unwrap_or_else(|e| match e {}))
    .collect();
  assert_eq!(lines.len(), 9);
  assert_eq!(lines[3], "4.fox");
}

#[cfg(feature = "futures-scheduler")]
#[test]
fn panicked_subscription_never_terminates_its_observer() {
  let pool = PooledScheduler::new(PoolConfig::default().pool_size(1)).unwrap();
  let observer = TestObserver::new();
  let handle = numbered_words()
    .map(|line| if line.starts_with('3') { panic!("third line") } else { line })
    .subscribe_on(pool.clone())
    .actual_subscribe(observer.clone())
    .unwrap();

  assert!(!observer.await_terminal_event(Duration::from_millis(300)));
  observer.assert_value_count(2).assert_not_complete().assert_no_errors();
  assert!(handle.is_panicked());
  assert!(handle.is_closed());

  let next = TestObserver::new();
  numbered_words().subscribe_on(pool).actual_subscribe(next.clone()).unwrap();
  assert!(next.await_terminal_event(Duration::from_secs(2)));
  next.assert_complete().assert_value_count(9);
}

#[test]
fn panic_with_immediate_scheduler_unwinds_into_subscribe() {
  let observer = TestObserver::new();
  let subscribed = panic::catch_unwind(AssertUnwindSafe(|| {
    numbered_words()
      .map(|line| if line.starts_with('2') { panic!("second line") } else { line })
      .subscribe_on(scheduler::immediate())
      .actual_subscribe(observer.clone())
  }));

  assert!(subscribed.is_err());
  observer.assert_value_count(1).assert_not_complete();
}

#[cfg(feature = "futures-scheduler")]
#[test]
fn shut_down_pool_refuses_blocking_drain() {
  let pool = PooledScheduler::new(PoolConfig::default().pool_size(1)).unwrap();
  pool.shutdown();
  assert!(matches!(
    numbered_words().subscribe_on(pool).blocking_iter(),
    Err(Error::SchedulerShutdown)
  ));
}

#[cfg(feature = "tokio-scheduler")]
#[test]
fn shut_down_tokio_runtime_refuses_work() {
  let scheduler = TokioScheduler::new(PoolConfig::default().pool_size(1)).unwrap();
  let lines: Vec<_> = numbered_words()
    .subscribe_on(scheduler.clone())
    .blocking_iter()
    .unwrap()
    .map(|line| line.unwrap_or_else(|e| match e {}))
    .collect();
  assert_eq!(lines.len(), 9);

  scheduler.shutdown();
  assert!(matches!(scheduler.schedule(|| {}), Err(Error::SchedulerShutdown)));
  let observer = TestObserver::<String, _>::new();
  let result = numbered_words().subscribe_on(scheduler.clone()).actual_subscribe(observer.clone());
  assert!(matches!(result, Err(Error::SchedulerShutdown)));
  assert!(!observer.is_terminated());
  assert!(matches!(
    numbered_words().subscribe_on(scheduler).blocking_iter(),
    Err(Error::SchedulerShutdown)
  ));
}

#[cfg(feature = "tokio-scheduler")]
#[test]
fn panic_on_tokio_thread_reaches_the_blocking_caller() {
  let scheduler = TokioScheduler::new(PoolConfig::default().pool_size(1)).unwrap();
  let mut iter = numbered_words()
    .map(|line| if line.starts_with('2') { panic!("second line") } else { line })
    .subscribe_on(scheduler.clone())
    .blocking_iter()
    .unwrap();

  assert_eq!(iter.next(), Some(Ok("1.the".to_string())));
  assert!(panic::catch_unwind(AssertUnwindSafe(|| iter.next())).is_err());
  scheduler.shutdown();
}
