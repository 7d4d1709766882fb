//! Event bus port — everything the engine reacts to, as one queue.

use luxhub_domain::event::StateChange;
use luxhub_domain::timer::TimerPayload;

use super::scheduler::Expiry;

/// An input of the engine.
///
/// State changes and timer expiries travel through the same queue so the
/// engine handles them one at a time, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A subscribed entity changed value.
    StateChanged(StateChange),
    /// A scheduled timer elapsed.
    TimerFired(Expiry<TimerPayload>),
}

/// Publishes host events to the engine.
pub trait EventPublisher {
    /// Enqueue an event. Returns `false` when nobody listens anymore.
    fn publish(&self, event: HostEvent) -> bool;
}

impl<T: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: HostEvent) -> bool {
        (**self).publish(event)
    }
}
