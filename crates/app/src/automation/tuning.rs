//! Live tuning: reacting to mode, enable and numeric helper changes.

use luxhub_domain::automation::{LightAutomationConfig, NumericSetting};
use luxhub_domain::event::StateChange;
use luxhub_domain::mode::AutoEnableMode;
use luxhub_domain::timer::{TimerKind, TimerPayload};

use super::LightAutomationEngine;
use crate::ports::{HostBus, Scheduler};

const REENABLE_TIMERS: [TimerKind; 4] = [
    TimerKind::OnPush,
    TimerKind::FilterOnPush,
    TimerKind::OnTime,
    TimerKind::FilterOnTime,
];

impl<H, S> LightAutomationEngine<H, S>
where
    H: HostBus,
    S: Scheduler<TimerPayload>,
{
    pub(super) fn on_mode_changed(&mut self, config: &LightAutomationConfig, change: &StateChange) {
        let Some(raw) = change.new.as_text() else {
            tracing::debug!(light = %config.light, state = %change.new, "automatic-enable mode unavailable");
            return;
        };
        let mode: AutoEnableMode = match raw.parse() {
            Ok(mode) => mode,
            Err(err) => {
                tracing::warn!(light = %config.light, %err, "ignoring automatic-enable mode change");
                return;
            }
        };
        let cancelled = self.cancel_left_mode_timers(config, mode);
        tracing::info!(light = %config.light, %mode, cancelled, "automatic-enable mode changed");
    }

    pub(super) fn on_automation_toggled(
        &mut self,
        config: &LightAutomationConfig,
        change: &StateChange,
    ) {
        let light = &config.light;
        let mode = self.auto_enable_mode(config);
        let mut cancelled = self.cancel_unused_reenable_timers(config, mode);

        if change.new.is_on() {
            if self.cancel(light, TimerKind::OnTime) {
                cancelled += 1;
            }
        } else if change.new.is_off() && mode.uses_time() && self.presence_cleared(config) {
            self.arm_on_time_reenable(config);
        }
        tracing::info!(%light, %mode, enabled = %change.new, cancelled, "automation toggled");
    }

    pub(super) fn on_numeric_changed(
        &mut self,
        config: &LightAutomationConfig,
        setting: NumericSetting,
        change: &StateChange,
    ) {
        let light = &config.light;
        let cancelled = setting
            .feeds()
            .is_some_and(|timer| self.cancel(light, timer));
        tracing::info!(%light, %setting, old = %change.old, new = %change.new, cancelled, "setting changed");
    }

    /// Cancel the re-enable timers of the mode being left: the push timers
    /// when switching to `Time`, the time timers for any other target.
    fn cancel_left_mode_timers(
        &mut self,
        config: &LightAutomationConfig,
        mode: AutoEnableMode,
    ) -> usize {
        let left = |kind: TimerKind| match mode {
            AutoEnableMode::Time => kind.is_push_strategy(),
            AutoEnableMode::Push | AutoEnableMode::All => kind.is_time_strategy(),
        };
        self.cancel_reenable_timers(config, left)
    }

    /// Cancel the re-enable timers of the strategies `mode` does not use.
    fn cancel_unused_reenable_timers(
        &mut self,
        config: &LightAutomationConfig,
        mode: AutoEnableMode,
    ) -> usize {
        let unused = |kind: TimerKind| {
            (kind.is_push_strategy() && !mode.uses_push())
                || (kind.is_time_strategy() && !mode.uses_time())
        };
        self.cancel_reenable_timers(config, unused)
    }

    fn cancel_reenable_timers(
        &mut self,
        config: &LightAutomationConfig,
        selected: impl Fn(TimerKind) -> bool,
    ) -> usize {
        let mut cancelled = 0;
        for kind in REENABLE_TIMERS {
            if selected(kind) && self.cancel(&config.light, kind) {
                cancelled += 1;
            }
        }
        cancelled
    }
}
