//! Host bus port — the sensor/actuator system the engine automates.
//!
//! Reads are synchronous point-reads of the last known value; writes are
//! fire-and-forget. The resulting state changes come back later through the
//! event bus, never re-entrantly.

use std::sync::Arc;

use luxhub_domain::id::EntityId;
use luxhub_domain::service::ServiceCall;
use luxhub_domain::state::StateValue;

/// Access to the external sensor/actuator bus.
pub trait HostBus {
    /// Current value of an entity; unknown entities read as [`StateValue::Unknown`].
    fn read_value(&self, entity_id: &EntityId) -> StateValue;

    /// Ask the host to deliver state changes of `entity_id`.
    fn subscribe(&self, entity_id: &EntityId);

    /// Issue a service call without waiting for its effect.
    fn invoke_action(&self, call: ServiceCall);
}

impl<T: HostBus + ?Sized> HostBus for Arc<T> {
    fn read_value(&self, entity_id: &EntityId) -> StateValue {
        (**self).read_value(entity_id)
    }

    fn subscribe(&self, entity_id: &EntityId) {
        (**self).subscribe(entity_id);
    }

    fn invoke_action(&self, call: ServiceCall) {
        (**self).invoke_action(call);
    }
}
