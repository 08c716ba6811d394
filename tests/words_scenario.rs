//! The numbered-words scenario: nine words zipped with an unbounded index
//! sequence, consumed synchronously, through a worker pool, and through a
//! blocking iterator.
#![cfg(feature = "futures-scheduler")]

use std::time::Duration;

use coldrx::prelude::*;
use tracing_subscriber::EnvFilter;

const WORDS: [&str; 9] = ["the", "quick", "brown", "fox", "jumped", "over", "the", "lazy", "dog"];

fn init_logging() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_test_writer()
    .try_init();
}

fn numbered(
  format: fn(&str, i64) -> String,
) -> impl CoreObservable<Item = String, Err = std::convert::Infallible> + InlineObservable + Clone + Send + 'static {
  observable::from_iter(WORDS).zip_with(observable::range(1, i64::MAX).unwrap(), format)
}

#[test]
fn in_same_thread() {
  init_logging();
  let mut results = vec![];
  numbered(|word, i| format!("{i}.{word}"))
    .subscribe(|line| results.push(line))
    .unwrap();

  assert_eq!(results.len(), 9);
  assert!(results.contains(&"4.fox".to_string()));
}

#[test]
fn pairs_every_word_with_its_position() {
  init_logging();
  let mut results = vec![];
  numbered(|word, i| format!("{i}.{word}"))
    .subscribe(|line| results.push(line))
    .unwrap();

  let expected: Vec<_> = WORDS
    .iter()
    .enumerate()
    .map(|(i, word)| format!("{}.{word}", i + 1))
    .collect();
  assert_eq!(results, expected);
}

#[test]
fn using_test_observer() {
  init_logging();
  let observer = TestObserver::new();
  numbered(|word, i| format!("{i}. {word}"))
    .actual_subscribe(observer.clone())
    .unwrap();

  observer.assert_complete().assert_no_errors().assert_value_count(9);
  assert!(observer.values().contains(&"4. fox".to_string()));
}

#[test]
fn failure_after_values() {
  init_logging();
  let observer = TestObserver::new();
  numbered(|word, i| format!("{i}. {word}"))
    .with_err::<String>()
    .concat_with(observable::throw_err("boom!".to_string()))
    .actual_subscribe(observer.clone())
    .unwrap();

  observer
    .assert_value_count(9)
    .assert_error(&"boom!".to_string())
    .assert_not_complete();
}

#[test]
fn using_computation_scheduler() {
  init_logging();
  let observer = TestObserver::new();
  numbered(|word, i| format!("{i}. {word}"))
    .subscribe_on(scheduler::computation().unwrap())
    .actual_subscribe(observer.clone())
    .unwrap();

  assert!(observer.await_count(9, Duration::from_secs(1)));
  assert!(observer.await_terminal_event(Duration::from_secs(1)));
  observer.assert_complete().assert_no_errors();
  assert!(observer.values().contains(&"4. fox".to_string()));
}

#[test]
fn using_blocking_call() {
  init_logging();
  let results: Vec<String> = numbered(|word, i| format!("{i}. {word}"))
    .subscribe_on(scheduler::computation().unwrap())
    .blocking_iter()
    .unwrap()
    .collect::<Result<_, _>>()
    .unwrap();

  assert_eq!(results.len(), 9);
  assert!(results.contains(&"4. fox".to_string()));
}

#[test]
fn blocking_matches_push_order() {
  init_logging();
  let pipeline = numbered(|word, i| format!("{i}. {word}"));
  let mut pushed = vec![];
  pipeline.clone().subscribe(|line| pushed.push(line)).unwrap();

  let pulled: Vec<String> = pipeline
    .subscribe_on(scheduler::pooled().unwrap())
    .blocking_iter()
    .unwrap()
    .collect::<Result<_, _>>()
    .unwrap();

  assert_eq!(pulled, pushed);
}

#[test]
fn await_terminal_event() {
  init_logging();
  let observer = TestObserver::new();
  numbered(|word, i| format!("{i}. {word}"))
    .subscribe_on(scheduler::computation().unwrap())
    .actual_subscribe(observer.clone())
    .unwrap();

  assert!(observer.await_terminal_event(Duration::from_secs(2)));
  observer.assert_complete().assert_no_errors();
  assert!(observer.values().contains(&"4. fox".to_string()));
}

#[test]
fn padded_index() {
  init_logging();
  let observer = TestObserver::new();
  numbered(|word, i| format!("{i:2}. {word}"))
    .subscribe_on(scheduler::computation().unwrap())
    .actual_subscribe(observer.clone())
    .unwrap();

  assert!(observer.await_count(9, Duration::from_secs(2)));
  assert!(observer.await_terminal_event(Duration::from_secs(2)));
  observer.assert_complete().assert_no_errors();
  assert!(observer.values().contains(&" 4. fox".to_string()));
}

#[test]
fn immediate_completes_before_returning() {
  init_logging();
  let observer = TestObserver::new();
  let handle = numbered(|word, i| format!("{i}.{word}"))
    .subscribe_on(scheduler::immediate())
    .actual_subscribe(observer.clone())
    .unwrap();

  assert_eq!(handle.state(), SubscriptionState::Completed);
  observer.assert_complete().assert_value_count(9);
}
