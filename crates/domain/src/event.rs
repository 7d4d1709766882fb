//! State change — the notification the host bus delivers for subscribed entities.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;
use crate::state::StateValue;
use crate::time::{Timestamp, now};

/// An entity moved from `old` to `new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub entity_id: EntityId,
    pub old: StateValue,
    pub new: StateValue,
    pub timestamp: Timestamp,
}

impl StateChange {
    /// Create a change notification stamped with the current time.
    #[must_use]
    pub fn new(entity_id: EntityId, old: StateValue, new: StateValue) -> Self {
        Self {
            entity_id,
            old,
            new,
            timestamp: now(),
        }
    }

    /// `off → on`, strictly.
    #[must_use]
    pub fn is_turning_on(&self) -> bool {
        self.old.is_off() && self.new.is_on()
    }

    /// Whether the entity entered `on` from any other value.
    #[must_use]
    pub fn entered_on(&self) -> bool {
        self.new.is_on() && !self.old.is_on()
    }

    /// Whether the entity entered `off` from any other value.
    #[must_use]
    pub fn entered_off(&self) -> bool {
        self.new.is_off() && !self.old.is_off()
    }

    /// Whether the value actually changed.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.old != self.new
    }
}

impl std::fmt::Display for StateChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.entity_id, self.old, self.new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(old: StateValue, new: StateValue) -> StateChange {
        StateChange::new(EntityId::new("binary_sensor.hall").unwrap(), old, new)
    }

    #[test]
    fn should_detect_strict_off_to_on() {
        assert!(change(StateValue::Off, StateValue::On).is_turning_on());
        assert!(!change(StateValue::Unavailable, StateValue::On).is_turning_on());
    }

    #[test]
    fn should_detect_entering_on_from_unknown() {
        assert!(change(StateValue::Unknown, StateValue::On).entered_on());
        assert!(!change(StateValue::On, StateValue::On).entered_on());
    }

    #[test]
    fn should_detect_entering_off() {
        assert!(change(StateValue::On, StateValue::Off).entered_off());
        assert!(!change(StateValue::Off, StateValue::Off).entered_off());
    }

    #[test]
    fn should_display_transition() {
        let c = change(StateValue::Off, StateValue::On);
        assert_eq!(c.to_string(), "binary_sensor.hall: off -> on");
    }
}
