//! Timer supervisor — generational, cancellable delayed actions.
//!
//! Each timer is addressed by `(family, key)`. Starting a timer allocates a
//! strictly increasing generation for that address and supersedes whatever
//! was scheduled there before. Cancelling bumps the generation as well, so a
//! delivery that was already in flight when the timer was cancelled or
//! restarted carries an outdated generation and is rejected by
//! [`TimerSupervisor::accept`].
//!
//! Firing protocol, driven by the caller:
//!
//! 1. [`accept`](TimerSupervisor::accept) the expiry; stop when it is stale.
//! 2. Run the callback.
//! 3. [`complete`](TimerSupervisor::complete) the expiry, which drops the
//!    entry unless the callback restarted the same key.

use std::collections::HashMap;
use std::time::Duration;

use luxhub_domain::time::{Timestamp, deadline_after, now};
use luxhub_domain::timer::{TimerFamily, TimerKey};

use crate::ports::{Expiry, Scheduler};

type Slot = (TimerFamily, TimerKey);

struct Entry<H> {
    handle: H,
    generation: u64,
    scheduled_at: Timestamp,
    deadline: Timestamp,
}

/// Snapshot of a live timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTimer {
    pub key: TimerKey,
    pub family: TimerFamily,
    pub generation: u64,
    pub scheduled_at: Timestamp,
    pub deadline: Timestamp,
}

/// Owns every live timer and its generation counter.
pub struct TimerSupervisor<S: Scheduler<P>, P> {
    scheduler: S,
    entries: HashMap<Slot, Entry<S::Handle>>,
    generations: HashMap<Slot, u64>,
}

impl<S: Scheduler<P>, P> TimerSupervisor<S, P> {
    /// Create a supervisor with no live timers.
    #[must_use]
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            entries: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    /// Start (or restart) the timer at `(family, key)`.
    ///
    /// Any live timer at the same address is cancelled first. Returns the
    /// generation the new timer was started with.
    pub fn start_timer(
        &mut self,
        key: TimerKey,
        delay: Duration,
        family: TimerFamily,
        payload: P,
    ) -> u64 {
        self.cancel_timer(&key, family);

        let counter = self.generations.entry((family, key.clone())).or_insert(0);
        *counter += 1;
        let generation = *counter;

        let expiry = Expiry {
            key: key.clone(),
            family,
            generation,
            payload,
        };
        let handle = self.scheduler.schedule_after(delay, expiry);
        let scheduled_at = now();
        tracing::debug!(%key, %family, generation, ?delay, "timer started");
        self.entries.insert(
            (family, key),
            Entry {
                handle,
                generation,
                scheduled_at,
                deadline: deadline_after(scheduled_at, delay),
            },
        );
        generation
    }

    /// Cancel the timer at `(family, key)`.
    ///
    /// Returns `false` when no timer was live there. Scheduler-side
    /// cancellation failures are logged and otherwise ignored: the bumped
    /// generation already neutralises a late delivery.
    pub fn cancel_timer(&mut self, key: &TimerKey, family: TimerFamily) -> bool {
        let slot = (family, key.clone());
        let Some(entry) = self.entries.remove(&slot) else {
            tracing::debug!(%key, %family, "no live timer to cancel");
            return false;
        };
        let counter = self.generations.entry(slot).or_insert(entry.generation);
        *counter += 1;
        if let Err(err) = self.scheduler.cancel_scheduled(&entry.handle) {
            tracing::debug!(%key, %family, %err, "scheduler could not cancel delivery");
        }
        tracing::debug!(%key, %family, generation = entry.generation, "timer cancelled");
        true
    }

    /// Whether a timer is live at `(family, key)`, whatever its generation.
    #[must_use]
    pub fn is_timer_active(&self, key: &TimerKey, family: TimerFamily) -> bool {
        self.entries.contains_key(&(family, key.clone()))
    }

    /// Whether the live timer at `(family, key)` has exactly `generation`.
    #[must_use]
    pub fn is_valid(&self, key: &TimerKey, generation: u64, family: TimerFamily) -> bool {
        self.entries
            .get(&(family, key.clone()))
            .is_some_and(|entry| entry.generation == generation)
    }

    /// Latest generation allocated at `(family, key)`; `0` if never used.
    #[must_use]
    pub fn current_generation(&self, key: &TimerKey, family: TimerFamily) -> u64 {
        self.generations
            .get(&(family, key.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Check an expiry before running its callback.
    ///
    /// Returns `false` for a stale delivery, which must be discarded. The
    /// live timer of a newer generation, if any, is left untouched.
    #[must_use]
    pub fn accept(&self, expiry: &Expiry<P>) -> bool {
        if self.is_valid(&expiry.key, expiry.generation, expiry.family) {
            return true;
        }
        tracing::debug!(
            key = %expiry.key,
            family = %expiry.family,
            generation = expiry.generation,
            current = self.current_generation(&expiry.key, expiry.family),
            "discarding stale timer expiry"
        );
        false
    }

    /// Drop the entry of a fired timer, unless it was restarted meanwhile.
    pub fn complete(&mut self, expiry: &Expiry<P>) {
        let slot = (expiry.family, expiry.key.clone());
        if self
            .entries
            .get(&slot)
            .is_some_and(|entry| entry.generation == expiry.generation)
        {
            self.entries.remove(&slot);
            tracing::debug!(key = %expiry.key, family = %expiry.family, generation = expiry.generation, "timer completed");
        }
    }

    /// Live timers, optionally restricted to one family, sorted by key.
    #[must_use]
    pub fn active_timers(&self, family: Option<TimerFamily>) -> Vec<ActiveTimer> {
        let mut timers: Vec<_> = self
            .entries
            .iter()
            .filter(|((fam, _), _)| family.is_none_or(|wanted| wanted == *fam))
            .map(|((fam, key), entry)| ActiveTimer {
                key: key.clone(),
                family: *fam,
                generation: entry.generation,
                scheduled_at: entry.scheduled_at,
                deadline: entry.deadline,
            })
            .collect();
        timers.sort_by(|a, b| (a.family, &a.key).cmp(&(b.family, &b.key)));
        timers
    }

    /// Cancel every live timer, optionally restricted to one family.
    ///
    /// Returns how many timers were cancelled.
    pub fn cancel_all(&mut self, family: Option<TimerFamily>) -> usize {
        let slots: Vec<Slot> = self
            .entries
            .keys()
            .filter(|(fam, _)| family.is_none_or(|wanted| wanted == *fam))
            .cloned()
            .collect();
        let count = slots.len();
        for (fam, key) in slots {
            self.cancel_timer(&key, fam);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CancelError;
    use std::sync::Mutex;

    // ── Recording scheduler ────────────────────────────────────────

    #[derive(Default)]
    struct RecordingScheduler {
        scheduled: Mutex<Vec<(Duration, Expiry<&'static str>)>>,
        fired: Mutex<Vec<usize>>,
        cancelled: Mutex<Vec<usize>>,
    }

    impl RecordingScheduler {
        fn expiry(&self, handle: usize) -> Expiry<&'static str> {
            self.scheduled.lock().unwrap()[handle].1.clone()
        }

        /// Simulate the delivery of `handle` leaving the scheduler.
        fn fire(&self, handle: usize) -> Expiry<&'static str> {
            self.fired.lock().unwrap().push(handle);
            self.expiry(handle)
        }
    }

    impl Scheduler<&'static str> for RecordingScheduler {
        type Handle = usize;

        fn schedule_after(&self, delay: Duration, expiry: Expiry<&'static str>) -> usize {
            let mut scheduled = self.scheduled.lock().unwrap();
            scheduled.push((delay, expiry));
            scheduled.len() - 1
        }

        fn cancel_scheduled(&self, handle: &usize) -> Result<(), CancelError> {
            if *handle >= self.scheduled.lock().unwrap().len() {
                return Err(CancelError::UnknownHandle);
            }
            if self.fired.lock().unwrap().contains(handle) {
                return Err(CancelError::AlreadyFired);
            }
            self.cancelled.lock().unwrap().push(*handle);
            Ok(())
        }
    }

    fn supervisor() -> TimerSupervisor<std::sync::Arc<RecordingScheduler>, &'static str> {
        TimerSupervisor::new(std::sync::Arc::new(RecordingScheduler::default()))
    }

    fn key(name: &str) -> TimerKey {
        TimerKey::new(name)
    }

    const SECS: Duration = Duration::from_secs(10);

    // ── Tests ──────────────────────────────────────────────────────

    #[test]
    fn should_start_timer_with_first_generation() {
        let mut timers = supervisor();
        let generation = timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");
        assert_eq!(generation, 1);
        assert!(timers.is_timer_active(&key("a"), TimerFamily::Normal));
        assert!(timers.is_valid(&key("a"), 1, TimerFamily::Normal));
    }

    #[test]
    fn should_supersede_previous_timer_on_restart() {
        let scheduler = std::sync::Arc::new(RecordingScheduler::default());
        let mut timers = TimerSupervisor::new(scheduler.clone());

        let first = timers.start_timer(key("a"), SECS, TimerFamily::Normal, "first");
        let second = timers.start_timer(key("a"), SECS, TimerFamily::Normal, "second");

        assert!(second > first);
        assert_eq!(scheduler.cancelled.lock().unwrap().as_slice(), &[0]);
        assert!(!timers.accept(&scheduler.expiry(0)));
        assert!(timers.accept(&scheduler.expiry(1)));
        assert_eq!(timers.active_timers(None).len(), 1);
    }

    #[test]
    fn should_reject_expiry_after_cancel() {
        let scheduler = std::sync::Arc::new(RecordingScheduler::default());
        let mut timers = TimerSupervisor::new(scheduler.clone());
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");

        // the delivery is already on its way when the cancel happens
        let in_flight = scheduler.fire(0);
        assert!(timers.cancel_timer(&key("a"), TimerFamily::Normal));

        assert!(!timers.accept(&in_flight));
        assert!(!timers.is_timer_active(&key("a"), TimerFamily::Normal));
    }

    #[test]
    fn should_treat_repeated_cancel_as_noop() {
        let mut timers = supervisor();
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");
        assert!(timers.cancel_timer(&key("a"), TimerFamily::Normal));
        let generation = timers.current_generation(&key("a"), TimerFamily::Normal);

        assert!(!timers.cancel_timer(&key("a"), TimerFamily::Normal));
        assert!(!timers.cancel_timer(&key("never"), TimerFamily::Normal));
        assert_eq!(
            timers.current_generation(&key("a"), TimerFamily::Normal),
            generation
        );
    }

    #[test]
    fn should_distinguish_active_from_valid() {
        let mut timers = supervisor();
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");

        assert!(timers.is_timer_active(&key("a"), TimerFamily::Normal));
        assert!(!timers.is_valid(&key("a"), 1, TimerFamily::Normal));
        assert!(timers.is_valid(&key("a"), 3, TimerFamily::Normal));
    }

    #[test]
    fn should_keep_families_independent() {
        let mut timers = supervisor();
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "normal");
        timers.start_timer(key("a"), SECS, TimerFamily::Filter, "filter");

        assert!(timers.cancel_timer(&key("a"), TimerFamily::Filter));
        assert!(timers.is_valid(&key("a"), 1, TimerFamily::Normal));
        assert_eq!(timers.current_generation(&key("a"), TimerFamily::Filter), 2);
        assert_eq!(timers.current_generation(&key("a"), TimerFamily::Normal), 1);
    }

    #[test]
    fn should_remove_entry_on_complete() {
        let scheduler = std::sync::Arc::new(RecordingScheduler::default());
        let mut timers = TimerSupervisor::new(scheduler.clone());
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");

        let expiry = scheduler.fire(0);
        assert!(timers.accept(&expiry));
        timers.complete(&expiry);

        assert!(!timers.is_timer_active(&key("a"), TimerFamily::Normal));
        assert!(!timers.accept(&expiry));
    }

    #[test]
    fn should_keep_restarted_entry_on_complete() {
        let scheduler = std::sync::Arc::new(RecordingScheduler::default());
        let mut timers = TimerSupervisor::new(scheduler.clone());
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");

        let expiry = scheduler.fire(0);
        assert!(timers.accept(&expiry));
        // callback restarts its own key
        let restarted = timers.start_timer(key("a"), SECS, TimerFamily::Normal, "again");
        timers.complete(&expiry);

        assert!(timers.is_valid(&key("a"), restarted, TimerFamily::Normal));
    }

    #[test]
    fn should_swallow_scheduler_cancel_errors() {
        let scheduler = std::sync::Arc::new(RecordingScheduler::default());
        let mut timers = TimerSupervisor::new(scheduler.clone());
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");
        scheduler.fire(0);

        assert!(timers.cancel_timer(&key("a"), TimerFamily::Normal));
        assert!(scheduler.cancelled.lock().unwrap().is_empty());
    }

    #[test]
    fn should_accept_zero_delay() {
        let scheduler = std::sync::Arc::new(RecordingScheduler::default());
        let mut timers = TimerSupervisor::new(scheduler.clone());
        timers.start_timer(key("now"), Duration::ZERO, TimerFamily::Filter, "now");
        assert_eq!(scheduler.scheduled.lock().unwrap()[0].0, Duration::ZERO);
        assert!(timers.accept(&scheduler.expiry(0)));
    }

    #[test]
    fn should_list_active_timers_by_family() {
        let mut timers = supervisor();
        timers.start_timer(key("b"), SECS, TimerFamily::Normal, "b");
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");
        timers.start_timer(key("c"), SECS, TimerFamily::Filter, "c");

        let normal = timers.active_timers(Some(TimerFamily::Normal));
        let keys: Vec<_> = normal.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(timers.active_timers(None).len(), 3);
        assert!(normal[0].deadline >= normal[0].scheduled_at);
    }

    #[test]
    fn should_cancel_all_timers_of_family() {
        let mut timers = supervisor();
        timers.start_timer(key("a"), SECS, TimerFamily::Normal, "a");
        timers.start_timer(key("b"), SECS, TimerFamily::Filter, "b");
        timers.start_timer(key("c"), SECS, TimerFamily::Filter, "c");

        assert_eq!(timers.cancel_all(Some(TimerFamily::Filter)), 2);
        assert_eq!(timers.active_timers(None).len(), 1);
        assert_eq!(timers.cancel_all(None), 1);
        assert!(timers.active_timers(None).is_empty());
    }
}
