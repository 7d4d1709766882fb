//! Presence handling: turning lights on and off as people come and go,
//! and the time-based re-enable of a suspended automation.

use luxhub_domain::automation::{FlagSetting, LightAutomationConfig, NumericSetting};
use luxhub_domain::event::StateChange;
use luxhub_domain::mode::Direction;
use luxhub_domain::timer::{TimerKind, TimerPayload};

use super::LightAutomationEngine;
use crate::ports::{HostBus, Scheduler};

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    /// Presence-on sensor went `off → on`.
    pub(super) fn on_presence_detected(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        if !self.gate(config, Direction::On) {
            return;
        }
        if self.is_active(light, TimerKind::OnPush) {
            tracing::info!(%light, "light was switched off by hand, ignoring presence");
            return;
        }
        if self.is_active(light, TimerKind::FilterOnPush) {
            tracing::debug!(%light, "push filter pending, ignoring presence");
            return;
        }
        if self.is_active(light, TimerKind::Illuminance) {
            tracing::debug!(%light, "illuminance confirmation pending, ignoring presence");
            return;
        }

        self.cancel(light, TimerKind::TurnOff);
        if self.is_active(light, TimerKind::FilterOnTime) {
            self.cancel(light, TimerKind::FilterOnTime);
        }
        if self.is_active(light, TimerKind::FilterOnPush) {
            self.cancel(light, TimerKind::FilterOnPush);
            self.set_flag(config, FlagSetting::AutomationEnabled, false);
        }

        let delay = self.duration(config, NumericSetting::TurnOnOffset);
        if delay.is_zero() {
            self.turn_on_sequence(config);
        } else {
            tracing::info!(%light, ?delay, "presence detected, delaying turn on");
            self.start(light, TimerKind::TurnOn, delay);
        }
    }

    /// Turn the light on unless the room is already bright enough.
    pub(super) fn turn_on_sequence(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        self.cancel(light, TimerKind::TurnOn);

        if self.is_enabled(config, FlagSetting::IlluminanceFilterEnabled) {
            let Some(sensor) = &config.illuminance_sensor else {
                tracing::error!(%light, "illuminance filter enabled without an illuminance sensor, disabling it");
                self.set_flag(config, FlagSetting::IlluminanceFilterEnabled, false);
                self.switch_light(config, true);
                self.arm_illuminance_confirmation(config);
                return;
            };
            let lux = self.read_entity(sensor).as_number();
            let min = self.threshold(config, NumericSetting::MinLux);
            match (lux, min) {
                (Some(lux), Some(min)) if lux >= min => {
                    tracing::debug!(%light, lux, min, "room bright enough, leaving light off");
                    return;
                }
                (Some(_), Some(_)) => {}
                _ => tracing::warn!(%light, ?lux, ?min, "cannot compare illuminance, turning on anyway"),
            }
        }

        self.switch_light(config, true);
        self.arm_illuminance_confirmation(config);
    }

    /// Presence-off sensor went `off`.
    pub(super) fn on_presence_lost(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        if !self.gate(config, Direction::Off) {
            return;
        }
        if self.presence_active(config) {
            if self.is_active(light, TimerKind::TurnOff) {
                tracing::debug!(%light, "presence still reported, keeping light on");
                self.cancel(light, TimerKind::TurnOff);
            }
            return;
        }

        self.cancel(light, TimerKind::TurnOn);
        if self.light_is_on(config) {
            let delay = self.duration(config, NumericSetting::TurnOffOffset);
            if delay.is_zero() {
                self.turn_off_sequence(config);
            } else {
                tracing::info!(%light, ?delay, "presence lost, delaying turn off");
                self.start(light, TimerKind::TurnOff, delay);
            }
        }
        if self.presence_cleared(config) {
            self.cancel(light, TimerKind::FilterOnTime);
        }
    }

    /// Turn the light off if the automation still allows it.
    pub(super) fn turn_off_sequence(&mut self, config: &LightAutomationConfig) {
        self.flags.get_mut(&config.light).turned_off_by_illuminance = false;
        if !self.is_armed(config) {
            tracing::info!(light = %config.light, "automation disabled, keeping light on");
            return;
        }
        if self.light_is_on(config) {
            self.switch_light(config, false);
        }
    }

    /// Presence-on sensor went `off`: a pending delayed turn-on is moot.
    pub(super) fn on_presence_on_cleared(&mut self, config: &LightAutomationConfig) {
        if self.is_current(&config.light, TimerKind::TurnOn) {
            tracing::info!(light = %config.light, "presence gone before turn on");
            self.cancel(&config.light, TimerKind::TurnOn);
        }
    }

    /// Start the countdown that re-enables a suspended automation once the
    /// room has stayed empty long enough.
    pub(super) fn arm_on_time_reenable(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        if self.is_enabled(config, FlagSetting::AutomationEnabled) {
            return;
        }
        if !self.auto_enable_mode(config).uses_time() || !self.presence_cleared(config) {
            return;
        }
        if self.is_active(light, TimerKind::OnTime) || self.is_active(light, TimerKind::FilterOnTime)
        {
            return;
        }
        let delay = self.duration(config, NumericSetting::TimerOnTime);
        tracing::info!(%light, ?delay, "room empty, automation re-enables after delay");
        self.start(light, TimerKind::OnTime, delay);
    }

    /// Any change of either presence sensor.
    pub(super) fn on_presence_changed(
        &mut self,
        config: &LightAutomationConfig,
        change: &StateChange,
    ) {
        let light = &config.light;
        if change.new.is_on() && !self.is_enabled(config, FlagSetting::AutomationEnabled) {
            // someone is back while the time re-enable waits: debounce, then abort it
            if self.is_active(light, TimerKind::OnTime)
                && !self.is_active(light, TimerKind::FilterOnTime)
            {
                let delay = self.duration(config, NumericSetting::TimerFilterOnTime);
                self.start(light, TimerKind::FilterOnTime, delay);
            }
        }

        let cleared = self.presence_cleared(config);
        if cleared
            && self.light_is_off(config)
            && !self.flags.get(light).turned_off_by_illuminance
            && self.is_enabled(config, FlagSetting::AutomationEnabled)
        {
            let delay = self.duration(config, NumericSetting::TimerFilterOnPush);
            if !delay.is_zero() {
                self.start(light, TimerKind::FilterOnPush, delay);
            }
        }
        if cleared && self.is_active(light, TimerKind::FilterOnTime) {
            tracing::debug!(%light, "presence gone again, dropping time filter");
            self.cancel(light, TimerKind::FilterOnTime);
        }
    }
}
