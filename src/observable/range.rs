use std::convert::Infallible;

use crate::{
  error::{Error, Result},
  observable::{CoreObservable, InlineObservable, ObservableType},
};

/// Creates an observable emitting `count` ascending integers starting at
/// `start`, then completing.
///
/// `count` may be as large as `i64::MAX`, which makes the range effectively
/// unbounded; zipped against a finite source it stops at that source's
/// length.
///
/// Fails with [`Error::InvalidArgument`] when `count` is negative or when the
/// last value would not fit in an `i64`.
///
/// ```
/// use coldrx::prelude::*;
///
/// let mut values = vec![];
/// observable::range(3, 4).unwrap().subscribe(|v| values.push(v)).unwrap();
/// assert_eq!(values, vec![3, 4, 5, 6]);
///
/// assert!(observable::range(0, -1).is_err());
/// ```
pub fn range(start: i64, count: i64) -> Result<Range> {
  if count < 0 {
    return Err(Error::InvalidArgument(format!("count >= 0 required but it was {count}")));
  }
  if count > 0 && start.checked_add(count - 1).is_none() {
    return Err(Error::InvalidArgument(format!(
      "range({start}, {count}) overflows i64"
    )));
  }
  Ok(Range { start, count })
}

#[derive(Clone, Copy, Debug)]
pub struct Range {
  start: i64,
  count: i64,
}

impl ObservableType for Range {
  type Item = i64;
  type Err = Infallible;
}

impl CoreObservable for Range {
  type Cursor = RangeCursor;

  fn into_cursor(self) -> Self::Cursor { RangeCursor { next: self.start, remaining: self.count } }
}

impl InlineObservable for Range {}

pub struct RangeCursor {
  next: i64,
  remaining: i64,
}

impl Iterator for RangeCursor {
  type Item = std::result::Result<i64, Infallible>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }
    let value = self.next;
    self.remaining -= 1;
    // the last value may be i64::MAX, so only step when another one follows
    if self.remaining > 0 {
      self.next += 1;
    }
    Some(Ok(value))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = usize::try_from(self.remaining).ok();
    (remaining.unwrap_or(usize::MAX), remaining)
  }
}
