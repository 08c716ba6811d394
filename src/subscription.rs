//! Subscription handles and the per-subscription state machine.
//!
//! Every `subscribe` call creates one [`SubscriptionHandle`]. The handle is
//! shared between the caller and the loop driving the subscription, and
//! moves through
//!
//! ```text
//! Created -> Active -> { Completed | Errored | Cancelled }
//! ```
//!
//! A subscription that was never pulled can also go straight from `Created`
//! to `Cancelled`. Terminal states are absorbing.
//!
//! A subscription run by a scheduler whose loop panics stays `Active` but is
//! marked [panicked](SubscriptionHandle::is_panicked); the panic payload is
//! kept on the handle until the thread draining the subscription re-raises
//! it.

use std::{
  any::Any,
  fmt::{Debug, Formatter},
  sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU8, Ordering},
  },
};

pub(crate) type PanicPayload = Box<dyn Any + Send + 'static>;

/// Subscription returned from `subscribe` to allow unsubscribing.
pub trait Subscription {
  /// Stops delivery before the stream finished on its own. Calling it on a
  /// subscription that already reached a terminal state is a no-op.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;
}

/// Lifecycle state of a single subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SubscriptionState {
  Created = 0,
  Active = 1,
  Completed = 2,
  Errored = 3,
  Cancelled = 4,
}

impl SubscriptionState {
  fn from_u8(v: u8) -> Self {
    match v {
      0 => SubscriptionState::Created,
      1 => SubscriptionState::Active,
      2 => SubscriptionState::Completed,
      3 => SubscriptionState::Errored,
      _ => SubscriptionState::Cancelled,
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(
      self,
      SubscriptionState::Completed | SubscriptionState::Errored | SubscriptionState::Cancelled
    )
  }
}

#[derive(Default)]
struct Inner {
  state: AtomicU8,
  panicked: AtomicBool,
  payload: Mutex<Option<PanicPayload>>,
}

/// Cloneable handle onto a running (or finished) subscription.
#[derive(Clone, Default)]
pub struct SubscriptionHandle(Arc<Inner>);

impl SubscriptionHandle {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> SubscriptionState {
    SubscriptionState::from_u8(self.0.state.load(Ordering::Acquire))
  }

  /// Whether the scheduled loop driving this subscription panicked.
  pub fn is_panicked(&self) -> bool { self.0.panicked.load(Ordering::Acquire) }

  pub(crate) fn set_panic(&self, payload: PanicPayload) {
    *self.0.payload.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
    self.0.panicked.store(true, Ordering::Release);
  }

  /// Takes the payload of the panic that ended the driving loop, if any. Only
  /// the first caller gets it.
  pub(crate) fn take_panic(&self) -> Option<PanicPayload> {
    self.0.payload.lock().unwrap_or_else(PoisonError::into_inner).take()
  }

  pub fn is_cancelled(&self) -> bool { self.state() == SubscriptionState::Cancelled }

  /// Requests cancellation. Returns `true` if this call moved the
  /// subscription into `Cancelled`, `false` if it was already terminal.
  pub fn cancel(&self) -> bool {
    let mut current = self.0.state.load(Ordering::Acquire);
    loop {
      if SubscriptionState::from_u8(current).is_terminal() {
        return false;
      }
      match self.0.state.compare_exchange_weak(
        current,
        SubscriptionState::Cancelled as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
      ) {
        Ok(_) => return true,
        Err(actual) => current = actual,
      }
    }
  }

  /// `Created -> Active`. Returns `false` if the subscription was cancelled
  /// before it started.
  pub(crate) fn activate(&self) -> bool {
    match self.0.state.compare_exchange(
      SubscriptionState::Created as u8,
      SubscriptionState::Active as u8,
      Ordering::AcqRel,
      Ordering::Acquire,
    ) {
      Ok(_) => true,
      Err(actual) => actual == SubscriptionState::Active as u8,
    }
  }

  /// `Active -> to`. Only the caller that wins this transition may deliver
  /// the terminal notification.
  pub(crate) fn finish(&self, to: SubscriptionState) -> bool {
    debug_assert!(to.is_terminal());
    self
      .0
      .state
      .compare_exchange(
        SubscriptionState::Active as u8,
        to as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
      )
      .is_ok()
  }
}

impl Subscription for SubscriptionHandle {
  #[inline]
  fn unsubscribe(self) { self.cancel(); }

  #[inline]
  fn is_closed(&self) -> bool { self.state().is_terminal() || self.is_panicked() }
}

impl Debug for SubscriptionHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionHandle")
      .field("state", &self.state())
      .field("panicked", &self.is_panicked())
      .finish()
  }
}
