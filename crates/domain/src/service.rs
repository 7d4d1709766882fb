//! Service — a fire-and-forget command sent to the host bus.
//!
//! Examples: `light.turn_on`, `input_boolean.turn_off`,
//! `input_number.set_value`.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// A service call targeting one entity.
///
/// The service domain is the entity's own domain, so `turn_on` on
/// `switch.relay` becomes `switch.turn_on`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub entity_id: EntityId,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl ServiceCall {
    /// Build a call whose domain is taken from the target entity.
    #[must_use]
    pub fn new(entity_id: EntityId, service: impl Into<String>) -> Self {
        Self {
            domain: entity_id.domain().to_string(),
            service: service.into(),
            entity_id,
            data: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn turn_on(entity_id: EntityId) -> Self {
        Self::new(entity_id, "turn_on")
    }

    #[must_use]
    pub fn turn_off(entity_id: EntityId) -> Self {
        Self::new(entity_id, "turn_off")
    }

    /// `turn_on` or `turn_off` depending on `on`.
    #[must_use]
    pub fn switch(entity_id: EntityId, on: bool) -> Self {
        if on {
            Self::turn_on(entity_id)
        } else {
            Self::turn_off(entity_id)
        }
    }

    /// Attach service data.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// `true` for a `turn_on` call.
    #[must_use]
    pub fn is_turn_on(&self) -> bool {
        self.service == "turn_on"
    }

    /// `true` for a `turn_off` call.
    #[must_use]
    pub fn is_turn_off(&self) -> bool {
        self.service == "turn_off"
    }
}

impl std::fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}({})", self.domain, self.service, self.entity_id)
    }
}
