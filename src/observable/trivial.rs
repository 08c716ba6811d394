use std::{convert::Infallible, iter};

use crate::{
  observable::{CoreObservable, InlineObservable, ObservableType},
  type_hint::TypeHint,
};

/// Creates an observable that emits no items, just terminates with an error.
///
/// # Arguments
///
/// * `e` - An error to emit and terminate with
pub fn throw_err<Item, Err>(e: Err) -> ThrowErr<Item, Err> { ThrowErr(e, TypeHint::new()) }

#[derive(Clone, Debug)]
pub struct ThrowErr<Item, Err>(Err, TypeHint<Item>);

impl<Item, Err> ObservableType for ThrowErr<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> CoreObservable for ThrowErr<Item, Err> {
  type Cursor = iter::Once<Result<Item, Err>>;

  fn into_cursor(self) -> Self::Cursor { iter::once(Err(self.0)) }
}

impl<Item, Err> InlineObservable for ThrowErr<Item, Err> {}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
pub fn empty<Item>() -> Empty<Item> { Empty(TypeHint::new()) }

#[derive(Clone, Debug)]
pub struct Empty<Item>(TypeHint<Item>);

impl<Item> ObservableType for Empty<Item> {
  type Item = Item;
  type Err = Infallible;
}

impl<Item> CoreObservable for Empty<Item> {
  type Cursor = iter::Empty<Result<Item, Infallible>>;

  fn into_cursor(self) -> Self::Cursor { iter::empty() }
}

impl<Item> InlineObservable for Empty<Item> {}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn throw() {
    let mut value_emitted = false;
    let mut completed = false;
    let mut error_emitted = String::new();
    observable::throw_err::<i32, _>(String::from("error"))
      .subscribe_all(|_| value_emitted = true, |e| error_emitted = e, || completed = true)
      .unwrap();
    assert!(!value_emitted);
    assert!(!completed);
    assert_eq!(error_emitted, "error");
  }

  #[test]
  fn empty() {
    let mut hits = 0;
    let mut completed = false;
    observable::empty::<i32>()
      .subscribe_all(|_| hits += 1, |_| {}, || completed = true)
      .unwrap();

    assert_eq!(hits, 0);
    assert!(completed);
  }
}
