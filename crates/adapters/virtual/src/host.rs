//! Virtual host — entity states kept in memory.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use luxhub_app::ports::{EventPublisher, HostBus, HostEvent};
use luxhub_domain::event::StateChange;
use luxhub_domain::id::EntityId;
use luxhub_domain::service::ServiceCall;
use luxhub_domain::state::StateValue;

/// A simulated host bus.
///
/// Service calls are recorded and applied to the stored states the way a
/// real host would: `turn_on`, `turn_off` and `toggle` flip on/off entities,
/// `input_number.set_value` stores the `value` field and
/// `input_select.select_option` stores the `option` field. Every resulting
/// change of a subscribed entity is published as
/// [`HostEvent::StateChanged`].
pub struct VirtualHost<P> {
    publisher: P,
    states: Mutex<HashMap<EntityId, StateValue>>,
    subscriptions: Mutex<HashSet<EntityId>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl<P: EventPublisher> VirtualHost<P> {
    #[must_use]
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            states: Mutex::new(HashMap::new()),
            subscriptions: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set initial states without publishing anything.
    #[must_use]
    pub fn with_states(self, states: impl IntoIterator<Item = (EntityId, StateValue)>) -> Self {
        lock(&self.states).extend(states);
        self
    }

    /// Change an entity as if a device reported it.
    ///
    /// Returns `true` when the value actually changed.
    pub fn set_state(&self, entity_id: &EntityId, value: StateValue) -> bool {
        let old = lock(&self.states)
            .insert(entity_id.clone(), value.clone())
            .unwrap_or_default();
        if old == value {
            return false;
        }
        tracing::debug!(%entity_id, %old, new = %value, "virtual state changed");
        if lock(&self.subscriptions).contains(entity_id) {
            let change = StateChange::new(entity_id.clone(), old, value);
            if !self.publisher.publish(HostEvent::StateChanged(change)) {
                tracing::warn!(%entity_id, "event bus closed, state change dropped");
            }
        }
        true
    }

    /// Current value of an entity; [`StateValue::Unknown`] when never set.
    #[must_use]
    pub fn state(&self, entity_id: &EntityId) -> StateValue {
        lock(&self.states)
            .get(entity_id)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_subscribed(&self, entity_id: &EntityId) -> bool {
        lock(&self.subscriptions).contains(entity_id)
    }

    /// Every service call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        lock(&self.calls).clone()
    }

    /// Drain the recorded service calls.
    pub fn take_calls(&self) -> Vec<ServiceCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    fn apply(&self, call: &ServiceCall) -> Option<StateValue> {
        match (call.domain.as_str(), call.service.as_str()) {
            (_, "turn_on") => Some(StateValue::On),
            (_, "turn_off") => Some(StateValue::Off),
            (_, "toggle") => Some(if self.state(&call.entity_id).is_on() {
                StateValue::Off
            } else {
                StateValue::On
            }),
            ("input_number", "set_value") => call.data.get("value").map(value_from_json),
            ("input_select", "select_option") => call.data.get("option").map(value_from_json),
            _ => None,
        }
    }
}

impl<P: EventPublisher> HostBus for VirtualHost<P> {
    fn read_value(&self, entity_id: &EntityId) -> StateValue {
        self.state(entity_id)
    }

    fn subscribe(&self, entity_id: &EntityId) {
        lock(&self.subscriptions).insert(entity_id.clone());
    }

    fn invoke_action(&self, call: ServiceCall) {
        tracing::info!(%call, "service call");
        match self.apply(&call) {
            Some(value) => {
                self.set_state(&call.entity_id, value);
            }
            None => tracing::debug!(%call, "service has no effect on the virtual host"),
        }
        lock(&self.calls).push(call);
    }
}

fn value_from_json(value: &serde_json::Value) -> StateValue {
    match value {
        serde_json::Value::Bool(flag) => StateValue::from(*flag),
        serde_json::Value::Number(n) => n.as_f64().map_or(StateValue::Unknown, StateValue::Number),
        serde_json::Value::String(text) => StateValue::parse(text),
        _ => StateValue::Unknown,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
