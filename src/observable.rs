//! Observable core traits
//!
//! An observable here is a cold, inert description of a computation. Nothing
//! runs until it is subscribed; every subscription opens its own cursor on
//! the description, so a pipeline can be cloned and subscribed any number of
//! times without the subscriptions seeing each other's position.

use std::convert::Infallible;

use crate::{
  error,
  observer::{FnMutObserver, Observer, ObserverAll},
  ops::{
    concat::Concat,
    map::Map,
    map_err::{MapErr, WithErr, never_err},
    subscribe_on::SubscribeOn,
    take::Take,
    zip::{CombineFn, TryCombineFn, ZipWith},
  },
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::SubscriptionHandle,
};

mod blocking;
mod from_iter;
mod range;
mod trivial;

pub use blocking::*;
pub use from_iter::*;
pub use range::*;
pub use trivial::*;

// ============================================================================
// Core traits
// ============================================================================

/// The item and error types flowing out of an observable.
pub trait ObservableType {
  type Item;
  type Err;
}

/// A composable cold source.
///
/// `into_cursor` is called once per subscription and yields the sequence of
/// notifications: `Some(Ok(v))` is a value, `Some(Err(e))` a terminal error
/// and `None` completion. The driving subscription never pulls again after an
/// error.
pub trait CoreObservable: ObservableType {
  type Cursor: Iterator<Item = Result<Self::Item, Self::Err>>;

  fn into_cursor(self) -> Self::Cursor;
}

/// A [`CoreObservable`] whose subscriptions are driven on the subscribing
/// thread.
///
/// Every source and operator is one. [`SubscribeOn`] is not: subscribing it
/// hands the loop to its scheduler instead.
pub trait InlineObservable: CoreObservable {}

/// Something an observer of type `O` can be subscribed to.
///
/// Every [`InlineObservable`] is subscribable on the calling thread;
/// [`SubscribeOn`] subscribes through its scheduler.
///
/// Errors returned here are engine failures (for instance a scheduler that
/// refused the work). Errors of the pipeline itself reach the observer.
pub trait Subscribable<O>: ObservableType {
  fn actual_subscribe(self, observer: O) -> error::Result<SubscriptionHandle>;
}

impl<S, O> Subscribable<O> for S
where
  S: InlineObservable,
  O: Observer<S::Item, S::Err>,
{
  fn actual_subscribe(self, observer: O) -> error::Result<SubscriptionHandle> {
    let handle = SubscriptionHandle::new();
    Subscriber::new(observer, handle.clone()).run(self.into_cursor());
    Ok(handle)
  }
}

// ============================================================================
// Operators and subscribe helpers
// ============================================================================

pub trait ObservableExt: ObservableType + Sized {
  /// Applies `f` to every value.
  fn map<B, F>(self, f: F) -> Map<Self, F>
  where
    Self: CoreObservable,
    F: FnMut(<Self as ObservableType>::Item) -> B,
  {
    Map { source: self, func: f }
  }

  /// Converts the error, if one arrives.
  fn map_err<E, F>(self, f: F) -> MapErr<Self, F>
  where
    Self: CoreObservable,
    F: FnOnce(<Self as ObservableType>::Err) -> E,
  {
    MapErr { source: self, func: f }
  }

  /// Gives an observable that cannot fail the error type `E`, so it can be
  /// combined with fallible pipelines.
  ///
  /// ```
  /// use coldrx::prelude::*;
  ///
  /// let mut values = vec![];
  /// let mut error = None;
  /// observable::from_iter([1, 2])
  ///   .with_err::<&str>()
  ///   .concat_with(observable::throw_err("boom"))
  ///   .subscribe_all(|v| values.push(v), |e| error = Some(e), || {})
  ///   .unwrap();
  ///
  /// assert_eq!(values, vec![1, 2]);
  /// assert_eq!(error, Some("boom"));
  /// ```
  fn with_err<E>(self) -> WithErr<Self, E>
  where
    Self: CoreObservable<Err = Infallible>,
  {
    MapErr { source: self, func: never_err::<E> as fn(Infallible) -> E }
  }

  /// Emits at most the first `count` values, then completes.
  fn take(self, count: usize) -> Take<Self>
  where
    Self: CoreObservable,
  {
    Take { source: self, count }
  }

  /// Pairs values of `self` and `other` into tuples.
  #[allow(clippy::type_complexity)]
  fn zip<B>(self, other: B) -> ZipWith<Self, B, PairFn<Self, B>>
  where
    Self: CoreObservable,
    B: CoreObservable<Err = <Self as ObservableType>::Err>,
  {
    ZipWith { source_a: self, source_b: other, func: CombineFn(pair as fn(_, _) -> _) }
  }

  /// Combines values of `self` and `other` positionally with `f`.
  ///
  /// Completes as soon as either side completes; a value left without a
  /// partner is dropped.
  ///
  /// ```
  /// use coldrx::prelude::*;
  ///
  /// let mut lines = vec![];
  /// observable::from_iter(["the", "quick", "brown", "fox"])
  ///   .zip_with(observable::range(1, i64::MAX).unwrap(), |word, i| format!("{i}.{word}"))
  ///   .subscribe(|line| lines.push(line))
  ///   .unwrap();
  ///
  /// assert_eq!(lines[3], "4.fox");
  /// ```
  fn zip_with<B, F, C>(self, other: B, f: F) -> ZipWith<Self, B, CombineFn<F>>
  where
    Self: CoreObservable,
    B: CoreObservable<Err = <Self as ObservableType>::Err>,
    F: FnMut(<Self as ObservableType>::Item, B::Item) -> C,
  {
    ZipWith { source_a: self, source_b: other, func: CombineFn(f) }
  }

  /// Like [`zip_with`](ObservableExt::zip_with), but `f` may fail. A failure
  /// is delivered as the pipeline's error and nothing more is pulled from
  /// either side.
  fn try_zip_with<B, F, C>(self, other: B, f: F) -> ZipWith<Self, B, TryCombineFn<F>>
  where
    Self: CoreObservable,
    B: CoreObservable<Err = <Self as ObservableType>::Err>,
    F: FnMut(<Self as ObservableType>::Item, B::Item) -> Result<C, <Self as ObservableType>::Err>,
  {
    ZipWith { source_a: self, source_b: other, func: TryCombineFn(f) }
  }

  /// Emits everything from `self`, then everything from `other`. If `self`
  /// fails, `other` is never started.
  fn concat_with<B>(self, other: B) -> Concat<Self, B>
  where
    Self: CoreObservable,
    B: CoreObservable<Item = <Self as ObservableType>::Item, Err = <Self as ObservableType>::Err>,
  {
    Concat { first: self, second: other }
  }

  /// Runs subscriptions of this pipeline through `scheduler`.
  ///
  /// The result composes like any other pipeline; see [`SubscribeOn`] for
  /// where the operators chained after it run.
  fn subscribe_on<SD>(self, scheduler: SD) -> SubscribeOn<Self, SD>
  where
    Self: CoreObservable,
    SD: Scheduler,
  {
    SubscribeOn { source: self, scheduler }
  }

  /// Subscribes a `next` closure to a pipeline that cannot fail.
  fn subscribe<N>(self, next: N) -> error::Result<SubscriptionHandle>
  where
    Self: Subscribable<FnMutObserver<N>>,
    N: FnMut(<Self as ObservableType>::Item),
  {
    self.actual_subscribe(FnMutObserver(next))
  }

  /// Subscribes `next`, `error` and `complete` closures.
  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> error::Result<SubscriptionHandle>
  where
    Self: Subscribable<ObserverAll<N, E, C>>,
    N: FnMut(<Self as ObservableType>::Item),
    E: FnOnce(<Self as ObservableType>::Err),
    C: FnOnce(),
  {
    self.actual_subscribe(ObserverAll::new(next, error, complete))
  }

  /// Subscribes and hands the notifications to the calling thread as an
  /// iterator. See [`BlockingObservable`].
  fn blocking_iter(self) -> error::Result<<Self as BlockingObservable>::Iter>
  where
    Self: BlockingObservable,
  {
    self.into_blocking_iter()
  }
}

impl<T: ObservableType> ObservableExt for T {}

/// Combine function of [`ObservableExt::zip`].
pub type PairFn<A, B> = CombineFn<
  fn(
    <A as ObservableType>::Item,
    <B as ObservableType>::Item,
  ) -> (<A as ObservableType>::Item, <B as ObservableType>::Item),
>;

fn pair<A, B>(a: A, b: B) -> (A, B) { (a, b) }

/// Free-function form of [`ObservableExt::zip_with`].
pub fn zip<A, B, F, C>(a: A, b: B, f: F) -> ZipWith<A, B, CombineFn<F>>
where
  A: CoreObservable,
  B: CoreObservable<Err = A::Err>,
  F: FnMut(A::Item, B::Item) -> C,
{
  a.zip_with(b, f)
}
