use crate::observable::{CoreObservable, InlineObservable, ObservableType};

/// Emits every value of `first`, then every value of `second`.
///
/// `second` is only opened once `first` has completed; if `first` fails the
/// error ends the stream and `second` is never started.
#[derive(Clone)]
pub struct Concat<A, B> {
  pub first: A,
  pub second: B,
}

impl<A, B> ObservableType for Concat<A, B>
where
  A: ObservableType,
  B: ObservableType<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;
}

impl<A, B> CoreObservable for Concat<A, B>
where
  A: CoreObservable,
  B: CoreObservable<Item = A::Item, Err = A::Err>,
{
  type Cursor = ConcatCursor<A::Cursor, B>;

  fn into_cursor(self) -> Self::Cursor {
    ConcatCursor { first: Some(self.first.into_cursor()), second: Some(self.second), current: None }
  }
}

impl<A, B> InlineObservable for Concat<A, B>
where
  A: CoreObservable,
  B: CoreObservable<Item = A::Item, Err = A::Err>,
{
}

pub struct ConcatCursor<CA, B: CoreObservable> {
  first: Option<CA>,
  second: Option<B>,
  current: Option<B::Cursor>,
}

impl<CA, B> Iterator for ConcatCursor<CA, B>
where
  B: CoreObservable,
  CA: Iterator<Item = Result<B::Item, B::Err>>,
{
  type Item = Result<B::Item, B::Err>;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(first) = self.first.as_mut() {
      match first.next() {
        Some(Ok(v)) => return Some(Ok(v)),
        Some(Err(err)) => {
          self.first = None;
          self.second = None;
          return Some(Err(err));
        }
        None => {
          self.first = None;
          self.current = self.second.take().map(CoreObservable::into_cursor);
        }
      }
    }
    self.current.as_mut()?.next()
  }
}

#[cfg(test)]
mod test {
  use std::cell::Cell;

  use crate::prelude::*;

  #[test]
  fn sequential() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter([1, 2])
      .concat_with(observable::from_iter([3, 4]))
      .subscribe_all(|v| values.push(v), |_| {}, || completed = true)
      .unwrap();

    assert_eq!(values, vec![1, 2, 3, 4]);
    assert!(completed);
  }

  #[test]
  fn first_error_skips_second() {
    let opened = Cell::new(false);
    let second = observable::from_iter(std::iter::from_fn(|| {
      opened.set(true);
      None::<i32>
    }))
    .with_err::<&str>();

    let mut values = vec![];
    let mut error = None;
    let mut completed = false;
    observable::from_iter([1])
      .with_err::<&str>()
      .concat_with(observable::throw_err("boom"))
      .concat_with(second)
      .subscribe_all(|v| values.push(v), |e| error = Some(e), || completed = true)
      .unwrap();

    assert_eq!(values, vec![1]);
    assert_eq!(error, Some("boom"));
    assert!(!completed);
    assert!(!opened.get());
  }

  #[test]
  fn second_error_after_all_values() {
    let mut values = vec![];
    let mut errors = 0;
    let mut completes = 0;
    observable::from_iter(["a", "b", "c"])
      .with_err::<String>()
      .concat_with(observable::throw_err("late".to_string()))
      .subscribe_all(|v| values.push(v), |_| errors += 1, || completes += 1)
      .unwrap();

    assert_eq!(values, vec!["a", "b", "c"]);
    assert_eq!(errors, 1);
    assert_eq!(completes, 0);
  }

  #[test]
  fn empty_first() {
    let mut values = vec![];
    observable::empty()
      .concat_with(observable::of(9))
      .subscribe(|v| values.push(v))
      .unwrap();
    assert_eq!(values, vec![9]);
  }
}
