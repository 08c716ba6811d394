use std::{convert::Infallible, iter};

use crate::observable::{CoreObservable, InlineObservable, ObservableType};

type OkFn<Item> = fn(Item) -> Result<Item, Infallible>;

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Each subscription calls `into_iter` on its own copy of `iter`, so clone
/// the observable to subscribe it more than once.
///
/// # Examples
///
/// ```
/// use coldrx::prelude::*;
///
/// let mut sum = 0;
/// observable::from_iter(vec![0, 1, 2, 3])
///   .subscribe(|v| sum += v)
///   .unwrap();
/// assert_eq!(sum, 6);
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone, Debug)]
pub struct FromIter<Iter>(Iter);

impl<Iter: IntoIterator> ObservableType for FromIter<Iter> {
  type Item = Iter::Item;
  type Err = Infallible;
}

impl<Iter: IntoIterator> CoreObservable for FromIter<Iter> {
  type Cursor = iter::Map<Iter::IntoIter, OkFn<Iter::Item>>;

  fn into_cursor(self) -> Self::Cursor { self.0.into_iter().map(Ok as OkFn<Iter::Item>) }
}

impl<Iter: IntoIterator> InlineObservable for FromIter<Iter> {}

/// Creates an observable producing a single value, then completing.
pub fn of<Item>(v: Item) -> Of<Item> { Of(v) }

#[derive(Clone, Debug)]
pub struct Of<Item>(Item);

impl<Item> ObservableType for Of<Item> {
  type Item = Item;
  type Err = Infallible;
}

impl<Item> CoreObservable for Of<Item> {
  type Cursor = iter::Once<Result<Item, Infallible>>;

  fn into_cursor(self) -> Self::Cursor { iter::once(Ok(self.0)) }
}

impl<Item> InlineObservable for Of<Item> {}
