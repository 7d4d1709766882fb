//! Scheduler port — delayed delivery of timer expiries.

use std::sync::Arc;
use std::time::Duration;

use luxhub_domain::timer::{TimerFamily, TimerKey};

/// What a scheduler hands back when a timer elapses.
///
/// The generation is the one allocated when the timer was started; the
/// supervisor compares it with the live one to discard stale deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry<P> {
    pub key: TimerKey,
    pub family: TimerFamily,
    pub generation: u64,
    pub payload: P,
}

/// Why a scheduled delivery could not be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CancelError {
    #[error("scheduled delivery already fired")]
    AlreadyFired,

    #[error("unknown scheduled delivery")]
    UnknownHandle,
}

/// Delivers an [`Expiry`] after a delay.
pub trait Scheduler<P> {
    /// Opaque reference to a scheduled delivery.
    type Handle;

    /// Deliver `expiry` once `delay` has elapsed. A zero delay is valid.
    fn schedule_after(&self, delay: Duration, expiry: Expiry<P>) -> Self::Handle;

    /// Best-effort cancellation of a pending delivery.
    ///
    /// # Errors
    ///
    /// Returns [`CancelError`] when the delivery already happened or the
    /// handle is not known to this scheduler.
    fn cancel_scheduled(&self, handle: &Self::Handle) -> Result<(), CancelError>;
}

impl<P, T: Scheduler<P> + ?Sized> Scheduler<P> for Arc<T> {
    type Handle = T::Handle;

    fn schedule_after(&self, delay: Duration, expiry: Expiry<P>) -> Self::Handle {
        (**self).schedule_after(delay, expiry)
    }

    fn cancel_scheduled(&self, handle: &Self::Handle) -> Result<(), CancelError> {
        (**self).cancel_scheduled(handle)
    }
}
