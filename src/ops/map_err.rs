use std::convert::Infallible;

use crate::observable::{CoreObservable, InlineObservable, ObservableType};

#[derive(Clone)]
pub struct MapErr<S, F> {
  pub source: S,
  pub func: F,
}

/// An infallible observable re-typed to error type `E`.
pub type WithErr<S, E> = MapErr<S, fn(Infallible) -> E>;

pub(crate) fn never_err<E>(err: Infallible) -> E { match err {} }

impl<S, F, OutErr> ObservableType for MapErr<S, F>
where
  S: ObservableType,
  F: FnOnce(S::Err) -> OutErr,
{
  type Item = S::Item;
  type Err = OutErr;
}

impl<S, F, OutErr> CoreObservable for MapErr<S, F>
where
  S: CoreObservable,
  F: FnOnce(S::Err) -> OutErr,
{
  type Cursor = MapErrCursor<S::Cursor, F>;

  fn into_cursor(self) -> Self::Cursor {
    MapErrCursor { cursor: self.source.into_cursor(), func: Some(self.func) }
  }
}

impl<S, F, OutErr> InlineObservable for MapErr<S, F>
where
  S: CoreObservable,
  F: FnOnce(S::Err) -> OutErr,
{
}

pub struct MapErrCursor<C, F> {
  cursor: C,
  func: Option<F>,
}

impl<C, F, Item, Err, OutErr> Iterator for MapErrCursor<C, F>
where
  C: Iterator<Item = Result<Item, Err>>,
  F: FnOnce(Err) -> OutErr,
{
  type Item = Result<Item, OutErr>;

  fn next(&mut self) -> Option<Self::Item> {
    match self.cursor.next()? {
      Ok(v) => Some(Ok(v)),
      // an error is terminal, so the function is only ever needed once
      Err(err) => self.func.take().map(|f| Err(f(err))),
    }
  }
}
