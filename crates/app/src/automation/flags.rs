//! Per-light runtime flags.

use std::collections::HashMap;

use luxhub_domain::id::EntityId;

/// Transient state the engine keeps about one light. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightFlags {
    /// Set when the light turns on; keeps the brightness check from
    /// turning it straight back off until a confirmation clears it.
    pub illuminance_lock: bool,
    /// The last turn-off was caused by a bright room, not by a person.
    pub turned_off_by_illuminance: bool,
}

/// Flags of every light, keyed by light id.
#[derive(Debug, Default)]
pub struct FlagStore {
    flags: HashMap<EntityId, LightFlags>,
}

impl FlagStore {
    /// Flags of `light`; all clear when never touched.
    #[must_use]
    pub fn get(&self, light: &EntityId) -> LightFlags {
        self.flags.get(light).copied().unwrap_or_default()
    }

    pub fn get_mut(&mut self, light: &EntityId) -> &mut LightFlags {
        self.flags.entry(light.clone()).or_default()
    }
}
