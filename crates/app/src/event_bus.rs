//! In-process event bus backed by a tokio unbounded mpsc channel.
//!
//! Every producer (host adapter, scheduler tasks) holds an [`EventSender`];
//! the runtime owns the single receiver and drains it one event at a time.

use tokio::sync::mpsc;

use crate::ports::{EventPublisher, HostEvent};

/// In-process event bus using a tokio [`mpsc`] channel.
pub struct InProcessEventBus {
    sender: mpsc::UnboundedSender<HostEvent>,
    receiver: mpsc::UnboundedReceiver<HostEvent>,
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InProcessEventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// A cloneable handle producers publish through.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            inner: self.sender.clone(),
        }
    }

    /// Split off the receiving end.
    ///
    /// The bus' own sender is dropped here, so the receiver sees the channel
    /// closed once every [`EventSender`] is gone.
    #[must_use]
    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<HostEvent> {
        self.receiver
    }
}

/// Producer side of the [`InProcessEventBus`].
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::UnboundedSender<HostEvent>,
}

impl EventPublisher for EventSender {
    fn publish(&self, event: HostEvent) -> bool {
        self.inner.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxhub_domain::event::StateChange;
    use luxhub_domain::id::EntityId;
    use luxhub_domain::state::StateValue;

    fn change(old: StateValue, new: StateValue) -> HostEvent {
        HostEvent::StateChanged(StateChange::new(
            EntityId::new("binary_sensor.motion").unwrap(),
            old,
            new,
        ))
    }

    #[tokio::test]
    async fn should_deliver_events_in_order() {
        let bus = InProcessEventBus::new();
        let sender = bus.sender();
        let mut rx = bus.into_receiver();

        let first = change(StateValue::Off, StateValue::On);
        let second = change(StateValue::On, StateValue::Off);
        assert!(sender.publish(first.clone()));
        assert!(sender.publish(second.clone()));

        assert_eq!(rx.recv().await, Some(first));
        assert_eq!(rx.recv().await, Some(second));
    }

    #[tokio::test]
    async fn should_close_when_every_sender_is_dropped() {
        let bus = InProcessEventBus::new();
        let sender = bus.sender();
        let mut rx = bus.into_receiver();

        drop(sender);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn should_report_failure_when_receiver_is_gone() {
        let bus = InProcessEventBus::new();
        let sender = bus.sender();
        drop(bus);
        assert!(!sender.publish(change(StateValue::Off, StateValue::On)));
    }
}
