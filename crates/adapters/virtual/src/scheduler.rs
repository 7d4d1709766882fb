//! Manual-clock scheduler.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use luxhub_app::ports::{CancelError, Expiry, Scheduler};

struct Pending<P> {
    due: Duration,
    handle: u64,
    expiry: Expiry<P>,
}

struct Clock<P> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Pending<P>>,
}

/// A scheduler whose time only moves when the caller moves it.
///
/// Nothing is delivered on its own: the caller pulls due expiries with
/// [`VirtualScheduler::next_due`] and feeds them to the engine, which makes
/// timer-heavy scenarios fully deterministic.
pub struct VirtualScheduler<P> {
    clock: Mutex<Clock<P>>,
}

impl<P> Default for VirtualScheduler<P> {
    fn default() -> Self {
        Self {
            clock: Mutex::new(Clock {
                now: Duration::ZERO,
                next_handle: 0,
                pending: Vec::new(),
            }),
        }
    }
}

impl<P> VirtualScheduler<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of deliveries still waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Remove and return the earliest delivery due no later than `until`,
    /// moving the clock to its due time.
    ///
    /// Deliveries due at the same instant come out in scheduling order.
    pub fn next_due(&self, until: Duration) -> Option<Expiry<P>> {
        let mut clock = self.lock();
        let index = clock
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= until)
            .min_by_key(|(_, pending)| (pending.due, pending.handle))
            .map(|(index, _)| index)?;
        let pending = clock.pending.remove(index);
        clock.now = clock.now.max(pending.due);
        Some(pending.expiry)
    }

    /// Move the clock forward by `delta` without delivering anything.
    ///
    /// Returns the new time.
    pub fn advance(&self, delta: Duration) -> Duration {
        let mut clock = self.lock();
        clock.now += delta;
        clock.now
    }

    fn lock(&self) -> MutexGuard<'_, Clock<P>> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P> Scheduler<P> for VirtualScheduler<P> {
    type Handle = u64;

    fn schedule_after(&self, delay: Duration, expiry: Expiry<P>) -> u64 {
        let mut clock = self.lock();
        clock.next_handle += 1;
        let handle = clock.next_handle;
        let due = clock.now + delay;
        clock.pending.push(Pending {
            due,
            handle,
            expiry,
        });
        handle
    }

    fn cancel_scheduled(&self, handle: &u64) -> Result<(), CancelError> {
        let mut clock = self.lock();
        if *handle == 0 || *handle > clock.next_handle {
            return Err(CancelError::UnknownHandle);
        }
        let index = clock
            .pending
            .iter()
            .position(|pending| pending.handle == *handle)
            .ok_or(CancelError::AlreadyFired)?;
        clock.pending.remove(index);
        Ok(())
    }
}
