//! Fresh reads of settings and sensors, and writes back to helpers.
//!
//! Nothing here is cached: every handler reads the values it needs at the
//! moment it needs them.

use std::time::Duration;

use luxhub_domain::automation::{FlagSetting, LightAutomationConfig, NumericSetting};
use luxhub_domain::id::EntityId;
use luxhub_domain::mode::{AutoEnableMode, Direction, SensorDirection};
use luxhub_domain::service::ServiceCall;
use luxhub_domain::setting::Setting;
use luxhub_domain::state::StateValue;
use luxhub_domain::timer::{DurationUnit, TimerPayload};

use super::LightAutomationEngine;
use crate::ports::{HostBus, Scheduler};

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    pub(super) fn read(&self, setting: &Setting) -> StateValue {
        match setting {
            Setting::Entity(id) => self.host.read_value(id),
            Setting::Fixed(value) => value.clone(),
        }
    }

    pub(super) fn read_entity(&self, id: &EntityId) -> StateValue {
        self.host.read_value(id)
    }

    pub(super) fn is_enabled(&self, config: &LightAutomationConfig, flag: FlagSetting) -> bool {
        self.read(config.settings.flag(flag)).is_on()
    }

    /// Automation and sensor both enabled.
    pub(super) fn is_armed(&self, config: &LightAutomationConfig) -> bool {
        self.is_enabled(config, FlagSetting::AutomationEnabled)
            && self.is_enabled(config, FlagSetting::SensorEnabled)
    }

    /// Whether presence sensors may issue a command in `direction` right now.
    pub(super) fn gate(&self, config: &LightAutomationConfig, direction: Direction) -> bool {
        let sensor_direction = self.sensor_direction(config);
        if !sensor_direction.permits(direction) {
            tracing::debug!(light = %config.light, %sensor_direction, ?direction, "direction not allowed");
            return false;
        }
        if !self.is_armed(config) {
            tracing::debug!(light = %config.light, "automation or sensor disabled");
            return false;
        }
        true
    }

    /// A lux threshold or offset; `None` when it cannot be read.
    pub(super) fn threshold(
        &self,
        config: &LightAutomationConfig,
        setting: NumericSetting,
    ) -> Option<f64> {
        let value = self.read(config.settings.numeric(setting));
        let number = value.as_number();
        if number.is_none() {
            tracing::warn!(light = %config.light, %setting, %value, "unreadable threshold");
        }
        number
    }

    /// A timer duration, falling back to the documented default when the
    /// value is unreadable or negative.
    pub(super) fn duration(
        &self,
        config: &LightAutomationConfig,
        setting: NumericSetting,
    ) -> Duration {
        let unit = setting.unit().unwrap_or(DurationUnit::Seconds);
        let fallback = setting.default_value();
        let value = self.read(config.settings.numeric(setting));
        let amount = match value.as_number() {
            Some(amount) if amount >= 0.0 => amount,
            _ => {
                tracing::warn!(light = %config.light, %setting, %value, fallback, "unreadable duration, using default");
                fallback
            }
        };
        Duration::try_from_secs_f64(amount * unit.seconds()).unwrap_or_else(|err| {
            tracing::warn!(light = %config.light, %setting, amount, %err, fallback, "duration out of range, using default");
            Duration::from_secs_f64(fallback * unit.seconds())
        })
    }

    pub(super) fn auto_enable_mode(&self, config: &LightAutomationConfig) -> AutoEnableMode {
        let value = self.read(&config.settings.automatic_enable_mode);
        value.to_string().parse().unwrap_or_else(|err| {
            tracing::warn!(light = %config.light, %err, "using default automatic-enable mode");
            AutoEnableMode::default()
        })
    }

    pub(super) fn sensor_direction(&self, config: &LightAutomationConfig) -> SensorDirection {
        let value = self.read(&config.settings.sensor_direction);
        value.to_string().parse().unwrap_or_else(|err| {
            tracing::warn!(light = %config.light, %err, "using default sensor direction");
            SensorDirection::default()
        })
    }

    /// At least one presence sensor reads `on`.
    pub(super) fn presence_active(&self, config: &LightAutomationConfig) -> bool {
        config
            .presence_sensors()
            .any(|sensor| self.read_entity(sensor).is_on())
    }

    /// Every presence sensor reads `off`.
    pub(super) fn presence_cleared(&self, config: &LightAutomationConfig) -> bool {
        config
            .presence_sensors()
            .all(|sensor| self.read_entity(sensor).is_off())
    }

    pub(super) fn light_is_on(&self, config: &LightAutomationConfig) -> bool {
        self.read_entity(&config.light).is_on()
    }

    pub(super) fn light_is_off(&self, config: &LightAutomationConfig) -> bool {
        self.read_entity(&config.light).is_off()
    }

    /// Switch an on/off helper. Fixed settings cannot be written.
    pub(super) fn set_flag(&self, config: &LightAutomationConfig, flag: FlagSetting, on: bool) {
        match config.settings.flag(flag) {
            Setting::Entity(id) => {
                tracing::info!(light = %config.light, %flag, on, "updating helper");
                self.host.invoke_action(ServiceCall::switch(id.clone(), on));
            }
            Setting::Fixed(value) => {
                tracing::warn!(light = %config.light, %flag, %value, on, "fixed setting cannot be changed");
            }
        }
    }

    pub(super) fn switch_light(&self, config: &LightAutomationConfig, on: bool) {
        tracing::info!(light = %config.light, on, "switching light");
        self.host
            .invoke_action(ServiceCall::switch(config.light.clone(), on));
    }
}
