//! Manual overrides: reacting to the light itself being switched.

use luxhub_domain::automation::{FlagSetting, LightAutomationConfig, NumericSetting};
use luxhub_domain::timer::{TimerKind, TimerPayload};

use super::LightAutomationEngine;
use crate::ports::{HostBus, Scheduler};

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    pub(super) fn on_light_turned_on(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        if self.is_active(light, TimerKind::OnPush) {
            tracing::info!(%light, "light switched back on, suspend countdown dropped");
            self.cancel(light, TimerKind::OnPush);
        }
        if self.is_enabled(config, FlagSetting::SensorEnabled)
            && !self.is_enabled(config, FlagSetting::AutomationEnabled)
            && self.auto_enable_mode(config).uses_push()
        {
            self.set_flag(config, FlagSetting::AutomationEnabled, true);
        }
        self.flags.get_mut(light).illuminance_lock = true;
    }

    pub(super) fn on_light_turned_off(&mut self, config: &LightAutomationConfig) {
        let light = &config.light;
        let flags = self.flags.get_mut(light);
        flags.illuminance_lock = false;
        if flags.turned_off_by_illuminance {
            tracing::debug!(%light, "turned off by illuminance, not a manual override");
            return;
        }
        if !self.is_enabled(config, FlagSetting::AutomationEnabled) || !self.presence_active(config)
        {
            return;
        }

        // switched off by hand with people around: suspend the automation after a while
        self.cancel(light, TimerKind::OnPush);
        let delay = self.duration(config, NumericSetting::TimerOnPush);
        if !delay.is_zero() {
            tracing::info!(%light, ?delay, "manual turn off, automation suspends after delay");
            self.start(light, TimerKind::OnPush, delay);
        }
    }
}
