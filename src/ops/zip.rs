//! Zip operator implementation
//!
//! Zip combines items from two observables positionally. For each element it
//! pulls one value from source A, then one from source B, and hands both to
//! the combine function. It completes as soon as either side runs out, so
//! an unbounded source can be zipped against a finite one.

use crate::observable::{CoreObservable, InlineObservable, ObservableType};

// ==================== Combine functions ====================

/// A function merging one value of each side into one output value.
pub trait Combine<A, B, Err> {
  type Output;

  fn combine(&mut self, a: A, b: B) -> Result<Self::Output, Err>;
}

/// Infallible combine function, used by `zip_with`.
#[derive(Clone)]
pub struct CombineFn<F>(pub F);

/// Fallible combine function, used by `try_zip_with`.
#[derive(Clone)]
pub struct TryCombineFn<F>(pub F);

impl<A, B, Err, C, F> Combine<A, B, Err> for CombineFn<F>
where
  F: FnMut(A, B) -> C,
{
  type Output = C;

  #[inline]
  fn combine(&mut self, a: A, b: B) -> Result<C, Err> { Ok((self.0)(a, b)) }
}

impl<A, B, Err, C, F> Combine<A, B, Err> for TryCombineFn<F>
where
  F: FnMut(A, B) -> Result<C, Err>,
{
  type Output = C;

  #[inline]
  fn combine(&mut self, a: A, b: B) -> Result<C, Err> { (self.0)(a, b) }
}

// ==================== Zip Operator ====================

#[derive(Clone)]
pub struct ZipWith<A, B, F> {
  pub source_a: A,
  pub source_b: B,
  pub func: F,
}

impl<A, B, F> ObservableType for ZipWith<A, B, F>
where
  A: ObservableType,
  B: ObservableType<Err = A::Err>,
  F: Combine<A::Item, B::Item, A::Err>,
{
  type Item = F::Output;
  type Err = A::Err;
}

impl<A, B, F> CoreObservable for ZipWith<A, B, F>
where
  A: CoreObservable,
  B: CoreObservable<Err = A::Err>,
  F: Combine<A::Item, B::Item, A::Err>,
{
  type Cursor = ZipCursor<A::Cursor, B::Cursor, F>;

  fn into_cursor(self) -> Self::Cursor {
    let ZipWith { source_a, source_b, func } = self;
    ZipCursor { a: source_a.into_cursor(), b: source_b.into_cursor(), func, done: false }
  }
}

impl<A, B, F> InlineObservable for ZipWith<A, B, F>
where
  A: CoreObservable,
  B: CoreObservable<Err = A::Err>,
  F: Combine<A::Item, B::Item, A::Err>,
{
}

pub struct ZipCursor<CA, CB, F> {
  a: CA,
  b: CB,
  func: F,
  done: bool,
}

impl<CA, CB, F, ItemA, ItemB, Err> Iterator for ZipCursor<CA, CB, F>
where
  CA: Iterator<Item = Result<ItemA, Err>>,
  CB: Iterator<Item = Result<ItemB, Err>>,
  F: Combine<ItemA, ItemB, Err>,
{
  type Item = Result<F::Output, Err>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    let a = match self.a.next() {
      Some(Ok(a)) => a,
      Some(Err(err)) => return self.finish(Some(Err(err))),
      None => return self.finish(None),
    };
    // `a` is dropped without a partner if B has ended
    let b = match self.b.next() {
      Some(Ok(b)) => b,
      Some(Err(err)) => return self.finish(Some(Err(err))),
      None => return self.finish(None),
    };
    match self.func.combine(a, b) {
      Ok(v) => Some(Ok(v)),
      Err(err) => self.finish(Some(Err(err))),
    }
  }
}

impl<CA, CB, F> ZipCursor<CA, CB, F> {
  fn finish<T>(&mut self, last: Option<T>) -> Option<T> {
    self.done = true;
    last
  }
}

// ==================== Tests ====================
