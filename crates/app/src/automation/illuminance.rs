//! Ambient light handling: turning on in dark rooms, off in bright ones,
//! and the lock that keeps a freshly lit room from being switched off at once.

use luxhub_domain::automation::{FlagSetting, LightAutomationConfig, NumericSetting};
use luxhub_domain::mode::Direction;
use luxhub_domain::state::StateValue;
use luxhub_domain::timer::{TimerKind, TimerPayload};

use super::LightAutomationEngine;
use crate::ports::{HostBus, Scheduler};

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    pub(super) fn on_illuminance(&mut self, config: &LightAutomationConfig, value: &StateValue) {
        let Some(lux) = value.as_number() else {
            tracing::warn!(light = %config.light, %value, "ignoring non-numeric illuminance");
            return;
        };
        self.on_illuminance_low(config, lux);
        self.on_illuminance_high(config, lux);
    }

    fn on_illuminance_low(&mut self, config: &LightAutomationConfig, lux: f64) {
        let light = &config.light;
        if !self.gate(config, Direction::On) {
            return;
        }
        if self.is_current(light, TimerKind::OnPush) {
            tracing::debug!(%light, "light was switched off by hand, ignoring darkness");
            return;
        }
        if !self.is_enabled(config, FlagSetting::IlluminanceAutomationEnabled) {
            return;
        }
        let Some(min) = self.threshold(config, NumericSetting::MinLux) else {
            tracing::error!(%light, "minimum illuminance unreadable");
            return;
        };
        if self.presence_active(config) && lux < min && self.light_is_off(config) {
            tracing::info!(%light, lux, min, "room too dark, turning on");
            self.switch_light(config, true);
            self.arm_illuminance_confirmation(config);
        }
    }

    fn on_illuminance_high(&mut self, config: &LightAutomationConfig, lux: f64) {
        let light = &config.light;
        if !self.gate(config, Direction::Off) {
            return;
        }
        if self.flags.get(light).illuminance_lock {
            tracing::debug!(%light, "illuminance lock held, not turning off");
            return;
        }
        if !self.presence_active(config) {
            return;
        }
        let Some(max) = self.threshold(config, NumericSetting::MaxLux) else {
            return;
        };
        if lux > max && self.light_is_on(config) {
            tracing::info!(%light, lux, max, "room bright enough, turning off");
            self.switch_light(config, false);
            let flags = self.flags.get_mut(light);
            flags.turned_off_by_illuminance = true;
            flags.illuminance_lock = false;
        }
    }

    /// Schedule the one-shot check that may release the illuminance lock.
    pub(super) fn arm_illuminance_confirmation(&mut self, config: &LightAutomationConfig) {
        if config.illuminance_sensor.is_none() {
            return;
        }
        let delay = self.duration(config, NumericSetting::TimerSecondsMaxLux);
        self.start(&config.light, TimerKind::Illuminance, delay);
    }

    /// Release the lock unless the light's own brightness would push the
    /// room over the maximum and trigger a turn-off.
    pub(super) fn confirm_illuminance(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        if !self.is_armed(config) {
            tracing::debug!(%light, "automation disabled, skipping illuminance check");
            return;
        }
        if !self.light_is_on(config) {
            tracing::debug!(%light, "light is off, skipping illuminance check");
            return;
        }
        if !self.flags.get(light).illuminance_lock {
            tracing::debug!(%light, "lock already released");
            return;
        }
        let Some(sensor) = &config.illuminance_sensor else {
            return;
        };
        let max = self.threshold(config, NumericSetting::MaxLux);
        let offset = self.threshold(config, NumericSetting::IlluminanceOffset);
        let lux = self.read_entity(sensor).as_number();
        let (Some(max), Some(offset), Some(lux)) = (max, offset, lux) else {
            tracing::warn!(%light, ?max, ?offset, ?lux, "cannot evaluate illuminance, keeping lock");
            return;
        };

        let adjusted = lux + offset;
        let flags = self.flags.get_mut(light);
        if adjusted < max {
            flags.illuminance_lock = false;
            tracing::info!(%light, adjusted, max, "illuminance lock released");
        } else if adjusted > max && flags.turned_off_by_illuminance {
            flags.illuminance_lock = false;
            tracing::info!(%light, adjusted, max, "illuminance lock released after bright turn off");
        } else {
            tracing::info!(%light, adjusted, max, "illuminance lock kept");
        }
    }
}
