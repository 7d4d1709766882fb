//! Tunable parameters of a light automation.

use serde::{Deserialize, Serialize};

use crate::setting::Setting;
use crate::timer::{DurationUnit, TimerKind};

/// A numeric parameter of a light automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericSetting {
    MinLux,
    MaxLux,
    IlluminanceOffset,
    TurnOnOffset,
    TurnOffOffset,
    TimerOnPush,
    TimerOnTime,
    TimerFilterOnPush,
    TimerFilterOnTime,
    TimerSecondsMaxLux,
}

impl NumericSetting {
    pub const ALL: [Self; 10] = [
        Self::MinLux,
        Self::MaxLux,
        Self::IlluminanceOffset,
        Self::TurnOnOffset,
        Self::TurnOffOffset,
        Self::TimerOnPush,
        Self::TimerOnTime,
        Self::TimerFilterOnPush,
        Self::TimerFilterOnTime,
        Self::TimerSecondsMaxLux,
    ];

    /// Value used when the setting is not configured or cannot be read.
    #[must_use]
    pub fn default_value(self) -> f64 {
        match self {
            Self::MinLux | Self::IlluminanceOffset | Self::TurnOnOffset => 0.0,
            Self::MaxLux => 1000.0,
            Self::TurnOffOffset | Self::TimerOnTime | Self::TimerFilterOnPush => 30.0,
            Self::TimerOnPush | Self::TimerFilterOnTime | Self::TimerSecondsMaxLux => 5.0,
        }
    }

    /// Unit of a duration setting; `None` for thresholds.
    #[must_use]
    pub fn unit(self) -> Option<DurationUnit> {
        match self {
            Self::MinLux | Self::MaxLux | Self::IlluminanceOffset => None,
            Self::TimerOnPush | Self::TimerOnTime => Some(DurationUnit::Minutes),
            Self::TurnOnOffset
            | Self::TurnOffOffset
            | Self::TimerFilterOnPush
            | Self::TimerFilterOnTime
            | Self::TimerSecondsMaxLux => Some(DurationUnit::Seconds),
        }
    }

    /// The timer whose duration this setting feeds.
    #[must_use]
    pub fn feeds(self) -> Option<TimerKind> {
        match self {
            Self::MinLux | Self::MaxLux | Self::IlluminanceOffset => None,
            Self::TurnOnOffset => Some(TimerKind::TurnOn),
            Self::TurnOffOffset => Some(TimerKind::TurnOff),
            Self::TimerOnPush => Some(TimerKind::OnPush),
            Self::TimerOnTime => Some(TimerKind::OnTime),
            Self::TimerFilterOnPush => Some(TimerKind::FilterOnPush),
            Self::TimerFilterOnTime => Some(TimerKind::FilterOnTime),
            Self::TimerSecondsMaxLux => Some(TimerKind::Illuminance),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MinLux => "min_lux",
            Self::MaxLux => "max_lux",
            Self::IlluminanceOffset => "illuminance_offset",
            Self::TurnOnOffset => "turn_on_offset",
            Self::TurnOffOffset => "turn_off_offset",
            Self::TimerOnPush => "timer_on_push",
            Self::TimerOnTime => "timer_on_time",
            Self::TimerFilterOnPush => "timer_filter_on_push",
            Self::TimerFilterOnTime => "timer_filter_on_time",
            Self::TimerSecondsMaxLux => "timer_seconds_max_lux",
        }
    }
}

impl std::fmt::Display for NumericSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An on/off parameter of a light automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSetting {
    AutomationEnabled,
    SensorEnabled,
    IlluminanceFilterEnabled,
    IlluminanceAutomationEnabled,
}

impl FlagSetting {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AutomationEnabled => "enable_automation",
            Self::SensorEnabled => "enable_sensor",
            Self::IlluminanceFilterEnabled => "enable_illuminance_filter",
            Self::IlluminanceAutomationEnabled => "enable_illuminance_automation",
        }
    }
}

impl std::fmt::Display for FlagSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Every tunable of one light, resolved with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSettings {
    pub min_lux: Setting,
    pub max_lux: Setting,
    pub illuminance_offset: Setting,
    pub turn_on_offset: Setting,
    pub turn_off_offset: Setting,
    pub timer_on_push: Setting,
    pub timer_on_time: Setting,
    pub timer_filter_on_push: Setting,
    pub timer_filter_on_time: Setting,
    pub timer_seconds_max_lux: Setting,
    pub enable_automation: Setting,
    pub enable_sensor: Setting,
    pub enable_illuminance_filter: Setting,
    pub enable_illuminance_automation: Setting,
    pub automatic_enable_mode: Setting,
    pub sensor_direction: Setting,
}

impl Default for LightSettings {
    fn default() -> Self {
        let numeric = |kind: NumericSetting| Setting::fixed(kind.default_value());
        Self {
            min_lux: numeric(NumericSetting::MinLux),
            max_lux: numeric(NumericSetting::MaxLux),
            illuminance_offset: numeric(NumericSetting::IlluminanceOffset),
            turn_on_offset: numeric(NumericSetting::TurnOnOffset),
            turn_off_offset: numeric(NumericSetting::TurnOffOffset),
            timer_on_push: numeric(NumericSetting::TimerOnPush),
            timer_on_time: numeric(NumericSetting::TimerOnTime),
            timer_filter_on_push: numeric(NumericSetting::TimerFilterOnPush),
            timer_filter_on_time: numeric(NumericSetting::TimerFilterOnTime),
            timer_seconds_max_lux: numeric(NumericSetting::TimerSecondsMaxLux),
            enable_automation: Setting::fixed(false),
            enable_sensor: Setting::fixed(false),
            enable_illuminance_filter: Setting::fixed(false),
            enable_illuminance_automation: Setting::fixed(false),
            automatic_enable_mode: Setting::fixed("All"),
            sensor_direction: Setting::fixed("All"),
        }
    }
}

impl LightSettings {
    #[must_use]
    pub fn numeric(&self, kind: NumericSetting) -> &Setting {
        match kind {
            NumericSetting::MinLux => &self.min_lux,
            NumericSetting::MaxLux => &self.max_lux,
            NumericSetting::IlluminanceOffset => &self.illuminance_offset,
            NumericSetting::TurnOnOffset => &self.turn_on_offset,
            NumericSetting::TurnOffOffset => &self.turn_off_offset,
            NumericSetting::TimerOnPush => &self.timer_on_push,
            NumericSetting::TimerOnTime => &self.timer_on_time,
            NumericSetting::TimerFilterOnPush => &self.timer_filter_on_push,
            NumericSetting::TimerFilterOnTime => &self.timer_filter_on_time,
            NumericSetting::TimerSecondsMaxLux => &self.timer_seconds_max_lux,
        }
    }

    #[must_use]
    pub fn flag(&self, kind: FlagSetting) -> &Setting {
        match kind {
            FlagSetting::AutomationEnabled => &self.enable_automation,
            FlagSetting::SensorEnabled => &self.enable_sensor,
            FlagSetting::IlluminanceFilterEnabled => &self.enable_illuminance_filter,
            FlagSetting::IlluminanceAutomationEnabled => &self.enable_illuminance_automation,
        }
    }
}
