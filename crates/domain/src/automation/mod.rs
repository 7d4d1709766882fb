//! Light automation — the per-light configuration of the presence engine.
//!
//! A [`LightAutomationConfig`] names the controlled light, the sensors that
//! drive it and where each tunable lives (see [`Setting`]). It is validated
//! once at load time and never mutated afterwards; values behind entity
//! settings are read fresh whenever a handler needs them.
//!
//! [`LightAutomationConfig::roles`] produces the routing table entries for
//! the light: every entity worth subscribing to, tagged with its
//! [`EntityRole`].

mod role;
mod settings;

pub use role::EntityRole;
pub use settings::{FlagSetting, LightSettings, NumericSetting};

use serde::Deserialize;

use crate::error::{LuxHubError, ValidationError};
use crate::id::EntityId;
use crate::setting::Setting;

/// Validated configuration of one automated light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightAutomationConfig {
    pub light: EntityId,
    pub presence_on: Option<EntityId>,
    /// Defaults to [`presence_on`](Self::presence_on) when not configured.
    pub presence_off: Option<EntityId>,
    pub illuminance_sensor: Option<EntityId>,
    pub settings: LightSettings,
}

impl LightAutomationConfig {
    /// Create a builder for constructing a [`LightAutomationConfig`].
    #[must_use]
    pub fn builder() -> LightAutomationBuilder {
        LightAutomationBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LuxHubError::Validation`] with
    /// [`ValidationError::NoSensors`] when the light has neither a presence
    /// nor an illuminance sensor.
    pub fn validate(&self) -> Result<(), LuxHubError> {
        if self.presence_on.is_none()
            && self.presence_off.is_none()
            && self.illuminance_sensor.is_none()
        {
            return Err(ValidationError::NoSensors(self.light.to_string()).into());
        }
        Ok(())
    }

    /// Both presence sensors, deduplicated.
    pub fn presence_sensors(&self) -> impl Iterator<Item = &EntityId> {
        let off = self
            .presence_off
            .as_ref()
            .filter(|off| self.presence_on.as_ref() != Some(*off));
        self.presence_on.iter().chain(off)
    }

    /// Every entity this light listens to, with the role it plays.
    ///
    /// A sensor used for both presence directions appears twice, once per
    /// role. Fixed settings are not listed since they never change.
    #[must_use]
    pub fn roles(&self) -> Vec<(EntityId, EntityRole)> {
        let mut roles = vec![(self.light.clone(), EntityRole::Light)];
        if let Some(id) = &self.presence_on {
            roles.push((id.clone(), EntityRole::PresenceOn));
        }
        if let Some(id) = &self.presence_off {
            roles.push((id.clone(), EntityRole::PresenceOff));
        }
        if let Some(id) = &self.illuminance_sensor {
            roles.push((id.clone(), EntityRole::Illuminance));
        }
        for kind in NumericSetting::ALL {
            if let Some(id) = self.settings.numeric(kind).entity() {
                roles.push((id.clone(), EntityRole::Numeric(kind)));
            }
        }
        if let Some(id) = self.settings.enable_automation.entity() {
            roles.push((id.clone(), EntityRole::AutomationEnabled));
        }
        if let Some(id) = self.settings.automatic_enable_mode.entity() {
            roles.push((id.clone(), EntityRole::AutoEnableMode));
        }
        roles
    }
}

/// Step-by-step builder for [`LightAutomationConfig`].
///
/// Also the on-disk shape of a light: every field is optional and missing
/// settings fall back to their documented defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightAutomationBuilder {
    light: Option<EntityId>,
    presence_on: Option<EntityId>,
    presence_off: Option<EntityId>,
    illuminance_sensor: Option<EntityId>,
    min_lux: Option<Setting>,
    max_lux: Option<Setting>,
    illuminance_offset: Option<Setting>,
    turn_on_offset: Option<Setting>,
    turn_off_offset: Option<Setting>,
    timer_on_push: Option<Setting>,
    timer_on_time: Option<Setting>,
    timer_filter_on_push: Option<Setting>,
    timer_filter_on_time: Option<Setting>,
    timer_seconds_max_lux: Option<Setting>,
    enable_automation: Option<Setting>,
    enable_sensor: Option<Setting>,
    enable_illuminance_filter: Option<Setting>,
    enable_illuminance_automation: Option<Setting>,
    automatic_enable_mode: Option<Setting>,
    sensor_direction: Option<Setting>,
}

impl LightAutomationBuilder {
    #[must_use]
    pub fn light(mut self, light: EntityId) -> Self {
        self.light = Some(light);
        self
    }

    #[must_use]
    pub fn presence_on(mut self, sensor: EntityId) -> Self {
        self.presence_on = Some(sensor);
        self
    }

    #[must_use]
    pub fn presence_off(mut self, sensor: EntityId) -> Self {
        self.presence_off = Some(sensor);
        self
    }

    #[must_use]
    pub fn illuminance_sensor(mut self, sensor: EntityId) -> Self {
        self.illuminance_sensor = Some(sensor);
        self
    }

    /// Set a numeric tunable.
    #[must_use]
    pub fn numeric(mut self, kind: NumericSetting, setting: impl Into<Setting>) -> Self {
        let slot = match kind {
            NumericSetting::MinLux => &mut self.min_lux,
            NumericSetting::MaxLux => &mut self.max_lux,
            NumericSetting::IlluminanceOffset => &mut self.illuminance_offset,
            NumericSetting::TurnOnOffset => &mut self.turn_on_offset,
            NumericSetting::TurnOffOffset => &mut self.turn_off_offset,
            NumericSetting::TimerOnPush => &mut self.timer_on_push,
            NumericSetting::TimerOnTime => &mut self.timer_on_time,
            NumericSetting::TimerFilterOnPush => &mut self.timer_filter_on_push,
            NumericSetting::TimerFilterOnTime => &mut self.timer_filter_on_time,
            NumericSetting::TimerSecondsMaxLux => &mut self.timer_seconds_max_lux,
        };
        *slot = Some(setting.into());
        self
    }

    /// Set an on/off tunable.
    #[must_use]
    pub fn flag(mut self, kind: FlagSetting, setting: impl Into<Setting>) -> Self {
        let slot = match kind {
            FlagSetting::AutomationEnabled => &mut self.enable_automation,
            FlagSetting::SensorEnabled => &mut self.enable_sensor,
            FlagSetting::IlluminanceFilterEnabled => &mut self.enable_illuminance_filter,
            FlagSetting::IlluminanceAutomationEnabled => &mut self.enable_illuminance_automation,
        };
        *slot = Some(setting.into());
        self
    }

    #[must_use]
    pub fn automatic_enable_mode(mut self, setting: impl Into<Setting>) -> Self {
        self.automatic_enable_mode = Some(setting.into());
        self
    }

    #[must_use]
    pub fn sensor_direction(mut self, setting: impl Into<Setting>) -> Self {
        self.sensor_direction = Some(setting.into());
        self
    }

    /// Consume the builder, validate, and return a [`LightAutomationConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`LuxHubError::Validation`] when the light is missing
    /// ([`ValidationError::MissingLight`]) or has no sensor at all
    /// ([`ValidationError::NoSensors`]).
    pub fn build(self) -> Result<LightAutomationConfig, LuxHubError> {
        let light = self.light.ok_or(ValidationError::MissingLight)?;
        let defaults = LightSettings::default();
        let settings = LightSettings {
            min_lux: self.min_lux.unwrap_or(defaults.min_lux),
            max_lux: self.max_lux.unwrap_or(defaults.max_lux),
            illuminance_offset: self
                .illuminance_offset
                .unwrap_or(defaults.illuminance_offset),
            turn_on_offset: self.turn_on_offset.unwrap_or(defaults.turn_on_offset),
            turn_off_offset: self.turn_off_offset.unwrap_or(defaults.turn_off_offset),
            timer_on_push: self.timer_on_push.unwrap_or(defaults.timer_on_push),
            timer_on_time: self.timer_on_time.unwrap_or(defaults.timer_on_time),
            timer_filter_on_push: self
                .timer_filter_on_push
                .unwrap_or(defaults.timer_filter_on_push),
            timer_filter_on_time: self
                .timer_filter_on_time
                .unwrap_or(defaults.timer_filter_on_time),
            timer_seconds_max_lux: self
                .timer_seconds_max_lux
                .unwrap_or(defaults.timer_seconds_max_lux),
            enable_automation: self.enable_automation.unwrap_or(defaults.enable_automation),
            enable_sensor: self.enable_sensor.unwrap_or(defaults.enable_sensor),
            enable_illuminance_filter: self
                .enable_illuminance_filter
                .unwrap_or(defaults.enable_illuminance_filter),
            enable_illuminance_automation: self
                .enable_illuminance_automation
                .unwrap_or(defaults.enable_illuminance_automation),
            automatic_enable_mode: self
                .automatic_enable_mode
                .unwrap_or(defaults.automatic_enable_mode),
            sensor_direction: self.sensor_direction.unwrap_or(defaults.sensor_direction),
        };
        let presence_off = self.presence_off.or_else(|| self.presence_on.clone());
        let config = LightAutomationConfig {
            light,
            presence_on: self.presence_on,
            presence_off,
            illuminance_sensor: self.illuminance_sensor,
            settings,
        };
        config.validate()?;
        Ok(config)
    }
}
