//! What each light timer does when it fires.

use luxhub_domain::automation::{FlagSetting, LightAutomationConfig};
use luxhub_domain::timer::{TimerKind, TimerPayload};

use super::LightAutomationEngine;
use crate::ports::{HostBus, Scheduler};

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    pub(super) fn on_timer_fired(&mut self, config: &LightAutomationConfig, kind: TimerKind) {
        let light = &config.light;
        tracing::debug!(%light, %kind, "timer fired");
        match kind {
            TimerKind::TurnOn => {
                if self.presence_active(config) && self.light_is_off(config) {
                    self.turn_on_sequence(config);
                }
            }
            TimerKind::TurnOff => self.turn_off_sequence(config),
            TimerKind::OnPush => {
                self.cancel(light, TimerKind::OnPush);
                self.cancel(light, TimerKind::FilterOnPush);
                tracing::info!(%light, "light kept off by hand, suspending automation");
                self.set_flag(config, FlagSetting::AutomationEnabled, false);
            }
            TimerKind::OnTime => {
                if !self.is_enabled(config, FlagSetting::AutomationEnabled) {
                    tracing::info!(%light, "room stayed empty, re-enabling automation");
                    self.set_flag(config, FlagSetting::AutomationEnabled, true);
                }
                self.cancel(light, TimerKind::OnTime);
            }
            TimerKind::FilterOnPush => {
                tracing::info!(%light, "presence gone after manual off, suspend countdown dropped");
                self.cancel(light, TimerKind::OnPush);
                self.cancel(light, TimerKind::FilterOnPush);
            }
            TimerKind::FilterOnTime => {
                tracing::info!(%light, "presence persisted, time re-enable aborted");
                self.cancel(light, TimerKind::OnTime);
                self.cancel(light, TimerKind::FilterOnTime);
            }
            TimerKind::Illuminance => self.confirm_illuminance(config),
        }
    }
}
