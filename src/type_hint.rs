use std::{fmt, marker::PhantomData};

/// Zero-sized marker carrying a type parameter without owning a value.
///
/// Unlike a bare `PhantomData<T>` it is always `Clone`, `Copy`, `Send` and
/// `Sync`, so sources that only mention an item type in their signature do
/// not inherit bounds from it.
pub struct TypeHint<T>(PhantomData<fn() -> T>);

impl<T> TypeHint<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }
}

impl<T> Default for TypeHint<T> {
  fn default() -> Self { TypeHint(PhantomData) }
}

impl<T> Clone for TypeHint<T> {
  #[inline]
  fn clone(&self) -> Self { *self }
}

impl<T> Copy for TypeHint<T> {}

impl<T> fmt::Debug for TypeHint<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("TypeHint") }
}
