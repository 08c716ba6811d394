use std::{convert::Infallible, thread};

use tracing::{debug, warn};

use crate::{
  error::{self, Error},
  observable::{
    BlockingIter, BlockingObservable, CoreObservable, ObservableExt, ObservableType, PairFn,
    Subscribable,
  },
  observer::Observer,
  ops::{
    concat::Concat,
    map::Map,
    map_err::{MapErr, WithErr},
    take::Take,
    zip::{CombineFn, TryCombineFn, ZipWith},
  },
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::SubscriptionHandle,
};

/// A pipeline whose subscriptions run through a [`Scheduler`].
///
/// Values and their order are exactly those of `source`; only the thread
/// doing the work changes. With an asynchronous scheduler `subscribe`
/// returns as soon as the work is handed over.
///
/// Operators chained after `subscribe_on` are moved inside it, so the whole
/// subscription, including the operators and the observer, runs on the
/// scheduler wherever `subscribe_on` sits in the chain. When a pipeline is
/// scheduled twice, the scheduler closest to the source wins.
///
/// Passed as the `other` side of `zip_with` or `concat_with`, a scheduled
/// pipeline produces on its own scheduler and hands values to the thread
/// driving the combined pipeline. That thread has no caller to report to,
/// so a scheduler refusing the work arrives as the pipeline error, which
/// must be convertible from [`Error`]. Do not nest a scheduled source inside
/// a pipeline running on the same single-worker pool: the outer loop would
/// wait for a task queued behind itself.
#[derive(Clone)]
pub struct SubscribeOn<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<S: ObservableType, SD> ObservableType for SubscribeOn<S, SD> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S: CoreObservable, SD> SubscribeOn<S, SD> {
  fn hoist<T>(self, f: impl FnOnce(S) -> T) -> SubscribeOn<T, SD> {
    SubscribeOn { source: f(self.source), scheduler: self.scheduler }
  }

  pub fn map<B, F>(self, f: F) -> SubscribeOn<Map<S, F>, SD>
  where
    F: FnMut(S::Item) -> B,
  {
    self.hoist(|s| s.map(f))
  }

  pub fn map_err<E, F>(self, f: F) -> SubscribeOn<MapErr<S, F>, SD>
  where
    F: FnOnce(S::Err) -> E,
  {
    self.hoist(|s| s.map_err(f))
  }

  pub fn with_err<E>(self) -> SubscribeOn<WithErr<S, E>, SD>
  where
    S: CoreObservable<Err = Infallible>,
  {
    self.hoist(|s| s.with_err())
  }

  pub fn take(self, count: usize) -> SubscribeOn<Take<S>, SD> { self.hoist(|s| s.take(count)) }

  pub fn zip<B>(self, other: B) -> SubscribeOn<ZipWith<S, B, PairFn<S, B>>, SD>
  where
    B: CoreObservable<Err = S::Err>,
  {
    self.hoist(|s| s.zip(other))
  }

  pub fn zip_with<B, F, C>(self, other: B, f: F) -> SubscribeOn<ZipWith<S, B, CombineFn<F>>, SD>
  where
    B: CoreObservable<Err = S::Err>,
    F: FnMut(S::Item, B::Item) -> C,
  {
    self.hoist(|s| s.zip_with(other, f))
  }

  pub fn try_zip_with<B, F, C>(
    self,
    other: B,
    f: F,
  ) -> SubscribeOn<ZipWith<S, B, TryCombineFn<F>>, SD>
  where
    B: CoreObservable<Err = S::Err>,
    F: FnMut(S::Item, B::Item) -> Result<C, S::Err>,
  {
    self.hoist(|s| s.try_zip_with(other, f))
  }

  pub fn concat_with<B>(self, other: B) -> SubscribeOn<Concat<S, B>, SD>
  where
    B: CoreObservable<Item = S::Item, Err = S::Err>,
  {
    self.hoist(|s| s.concat_with(other))
  }

  /// Keeps the current scheduler: the one closest to the source decides
  /// where the subscription runs.
  pub fn subscribe_on<SD2: Scheduler>(self, _scheduler: SD2) -> Self { self }
}

impl<S, SD, O> Subscribable<O> for SubscribeOn<S, SD>
where
  S: CoreObservable + Send + 'static,
  SD: Scheduler,
  O: Observer<S::Item, S::Err> + Send + 'static,
{
  fn actual_subscribe(self, observer: O) -> error::Result<SubscriptionHandle> {
    let SubscribeOn { source, scheduler } = self;
    let handle = SubscriptionHandle::new();
    let subscriber = Subscriber::new(observer, handle.clone());
    let caller = thread::current().id();
    scheduler.schedule(move || {
      // a scheduler running the task in place unwinds into the subscriber
      // like an inline subscription does
      if thread::current().id() == caller {
        subscriber.run(source.into_cursor());
      } else {
        subscriber.run_catching(source.into_cursor());
      }
    })?;
    debug!("subscription scheduled");
    Ok(handle)
  }
}

impl<S, SD> BlockingObservable for SubscribeOn<S, SD>
where
  S: CoreObservable + Send + 'static,
  S::Item: Send + 'static,
  S::Err: Send + 'static,
  SD: Scheduler,
{
  type Iter = BlockingIter<S::Item, S::Err>;

  fn into_blocking_iter(self) -> error::Result<Self::Iter> { BlockingIter::subscribe(self) }
}

impl<S, SD> CoreObservable for SubscribeOn<S, SD>
where
  S: CoreObservable + Send + 'static,
  S::Item: Send + 'static,
  S::Err: From<Error> + Send + 'static,
  SD: Scheduler,
{
  type Cursor = SubscribeOnCursor<S, SD>;

  fn into_cursor(self) -> Self::Cursor { SubscribeOnCursor { pending: Some(self), feed: None } }
}

/// Cursor over a scheduled source. The first pull schedules the source; the
/// values then come over from the worker.
pub struct SubscribeOnCursor<S: ObservableType, SD> {
  pending: Option<SubscribeOn<S, SD>>,
  feed: Option<BlockingIter<S::Item, S::Err>>,
}

impl<S, SD> Iterator for SubscribeOnCursor<S, SD>
where
  S: CoreObservable + Send + 'static,
  S::Item: Send + 'static,
  S::Err: From<Error> + Send + 'static,
  SD: Scheduler,
{
  type Item = Result<S::Item, S::Err>;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(scheduled) = self.pending.take() {
      match BlockingIter::<S::Item, S::Err>::subscribe(scheduled) {
        Ok(feed) => self.feed = Some(feed),
        Err(err) => {
          warn!(error = %err, "scheduled source could not be started");
          return Some(Err(err.into()));
        }
      }
    }
    self.feed.as_mut()?.next()
  }
}
