//! Role — why a light automation listens to an entity.
//!
//! Replaces ad-hoc per-entity listener wiring with a declarative table:
//! every entity a light cares about is tagged with the role it plays, and
//! an incoming state change is dispatched by role.

use serde::{Deserialize, Serialize};

use super::settings::NumericSetting;

/// What an observed entity means to one light automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "setting", rename_all = "snake_case")]
pub enum EntityRole {
    /// Sensor whose off→on transition may turn the light on.
    PresenceOn,
    /// Sensor whose transition to off may turn the light off.
    PresenceOff,
    /// The controlled light itself.
    Light,
    /// Ambient light sensor.
    Illuminance,
    /// A live-tunable numeric helper.
    Numeric(NumericSetting),
    /// Helper toggling the automation on and off.
    AutomationEnabled,
    /// Helper selecting how a suspended automation is re-enabled.
    AutoEnableMode,
}

impl EntityRole {
    /// `true` for either presence role.
    #[must_use]
    pub fn is_presence(self) -> bool {
        matches!(self, Self::PresenceOn | Self::PresenceOff)
    }
}

impl std::fmt::Display for EntityRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PresenceOn => f.write_str("presence_on"),
            Self::PresenceOff => f.write_str("presence_off"),
            Self::Light => f.write_str("light"),
            Self::Illuminance => f.write_str("illuminance"),
            Self::Numeric(setting) => write!(f, "numeric({setting})"),
            Self::AutomationEnabled => f.write_str("automation_enabled"),
            Self::AutoEnableMode => f.write_str("auto_enable_mode"),
        }
    }
}
