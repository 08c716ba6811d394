use crate::observable::{CoreObservable, InlineObservable, ObservableType};

/// Emits only the first `count` values emitted by the source Observable.
///
/// If the source emits fewer than `count` values then all of its values are
/// emitted. After that, it completes without pulling the source again, so
/// `take` bounds an unbounded source.
#[derive(Clone)]
pub struct Take<S> {
  pub source: S,
  pub count: usize,
}

impl<S: ObservableType> ObservableType for Take<S> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S: CoreObservable> CoreObservable for Take<S> {
  type Cursor = std::iter::Take<S::Cursor>;

  fn into_cursor(self) -> Self::Cursor { self.source.into_cursor().take(self.count) }
}

impl<S: CoreObservable> InlineObservable for Take<S> {}
