//! Tokio-backed scheduler — one sleeping task per timer.

use std::time::Duration;

use luxhub_domain::timer::TimerPayload;
use tokio::task::JoinHandle;

use crate::event_bus::EventSender;
use crate::ports::{CancelError, EventPublisher, Expiry, HostEvent, Scheduler};

/// Schedules expiries on the current tokio runtime.
///
/// Each delivery is a spawned task that sleeps for the delay and then posts
/// [`HostEvent::TimerFired`] on the event bus. Cancelling aborts the task.
pub struct TokioScheduler {
    sender: EventSender,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }
}

impl Scheduler<TimerPayload> for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn schedule_after(&self, delay: Duration, expiry: Expiry<TimerPayload>) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !sender.publish(HostEvent::TimerFired(expiry)) {
                tracing::debug!("event bus closed, dropping timer expiry");
            }
        })
    }

    fn cancel_scheduled(&self, handle: &JoinHandle<()>) -> Result<(), CancelError> {
        if handle.is_finished() {
            return Err(CancelError::AlreadyFired);
        }
        handle.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::InProcessEventBus;
    use luxhub_domain::id::EntityId;
    use luxhub_domain::timer::{TimerKey, TimerKind};

    fn expiry() -> Expiry<TimerPayload> {
        let payload = TimerPayload::new(
            EntityId::new("light.kitchen").unwrap(),
            TimerKind::TurnOff,
        );
        Expiry {
            key: payload.key(),
            family: payload.family(),
            generation: 1,
            payload,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_expiry_after_delay() {
        let bus = InProcessEventBus::new();
        let scheduler = TokioScheduler::new(bus.sender());
        let mut rx = bus.into_receiver();

        let _handle = scheduler.schedule_after(Duration::from_secs(30), expiry());
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let Some(HostEvent::TimerFired(fired)) = rx.recv().await else {
            panic!("expected a timer expiry");
        };
        assert_eq!(fired.key, TimerKey::new("light.kitchen_turn_off_timer"));
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_publish_cancelled_expiry() {
        let bus = InProcessEventBus::new();
        let scheduler = TokioScheduler::new(bus.sender());
        let mut rx = bus.into_receiver();

        let handle = scheduler.schedule_after(Duration::from_secs(5), expiry());
        assert_eq!(scheduler.cancel_scheduled(&handle), Ok(()));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_already_fired() {
        let bus = InProcessEventBus::new();
        let scheduler = TokioScheduler::new(bus.sender());
        let mut rx = bus.into_receiver();

        let handle = scheduler.schedule_after(Duration::ZERO, expiry());
        assert!(rx.recv().await.is_some());
        // let the task observe its own completion
        tokio::task::yield_now().await;
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            scheduler.cancel_scheduled(&handle),
            Err(CancelError::AlreadyFired)
        );
    }
}
