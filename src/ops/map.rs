use crate::observable::{CoreObservable, InlineObservable, ObservableType};

#[derive(Clone)]
pub struct Map<S, F> {
  pub source: S,
  pub func: F,
}

impl<S, F, B> ObservableType for Map<S, F>
where
  S: ObservableType,
  F: FnMut(S::Item) -> B,
{
  type Item = B;
  type Err = S::Err;
}

impl<S, F, B> CoreObservable for Map<S, F>
where
  S: CoreObservable,
  F: FnMut(S::Item) -> B,
{
  type Cursor = MapCursor<S::Cursor, F>;

  fn into_cursor(self) -> Self::Cursor { MapCursor { cursor: self.source.into_cursor(), func: self.func } }
}

impl<S, F, B> InlineObservable for Map<S, F>
where
  S: CoreObservable,
  F: FnMut(S::Item) -> B,
{
}

pub struct MapCursor<C, F> {
  cursor: C,
  func: F,
}

impl<C, F, Item, Err, B> Iterator for MapCursor<C, F>
where
  C: Iterator<Item = Result<Item, Err>>,
  F: FnMut(Item) -> B,
{
  type Item = Result<B, Err>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> { self.cursor.next().map(|r| r.map(&mut self.func)) }
}
