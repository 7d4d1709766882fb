//! Timer identities — which delayed action a timer stands for.
//!
//! Every light owns up to seven timers. Each one is addressed by a
//! [`TimerKey`] namespaced with the light id (`light.kitchen_turn_on_timer`)
//! and lives in one of two independent [`TimerFamily`] keyspaces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Independent timer keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerFamily {
    /// Main delayed actions (turn on/off, automation suspend/resume).
    Normal,
    /// Debounce/filter timers.
    Filter,
}

impl fmt::Display for TimerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Filter => f.write_str("filter"),
        }
    }
}

/// Unit a duration setting is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
}

impl DurationUnit {
    /// Seconds in one unit.
    #[must_use]
    pub fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
        }
    }
}

/// Purpose of a per-light timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Delayed turn-on after presence was detected.
    TurnOn,
    /// Delayed turn-off after presence was lost.
    TurnOff,
    /// Light switched off by hand while presence persists; suspends automation on expiry.
    OnPush,
    /// No presence while automation is suspended; re-enables automation on expiry.
    OnTime,
    /// Presence lost after a manual off; forgives the pending [`OnPush`](Self::OnPush).
    FilterOnPush,
    /// Presence seen while [`OnTime`](Self::OnTime) waits; aborts it on expiry.
    FilterOnTime,
    /// One-shot confirmation that a freshly lit room is not already bright.
    Illuminance,
}

impl TimerKind {
    pub const ALL: [Self; 7] = [
        Self::TurnOn,
        Self::TurnOff,
        Self::OnPush,
        Self::OnTime,
        Self::FilterOnPush,
        Self::FilterOnTime,
        Self::Illuminance,
    ];

    /// Key suffix appended to the light id.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on_timer",
            Self::TurnOff => "turn_off_timer",
            Self::OnPush => "timer_on_push",
            Self::OnTime => "timer_on_time",
            Self::FilterOnPush => "timer_filter_on_push",
            Self::FilterOnTime => "timer_filter_on_time",
            Self::Illuminance => "illuminance_timer",
        }
    }

    #[must_use]
    pub fn family(self) -> TimerFamily {
        match self {
            Self::TurnOn | Self::TurnOff | Self::OnPush | Self::OnTime => TimerFamily::Normal,
            Self::FilterOnPush | Self::FilterOnTime | Self::Illuminance => TimerFamily::Filter,
        }
    }

    /// Timers of the push re-enable strategy.
    #[must_use]
    pub fn is_push_strategy(self) -> bool {
        matches!(self, Self::OnPush | Self::FilterOnPush)
    }

    /// Timers of the time re-enable strategy.
    #[must_use]
    pub fn is_time_strategy(self) -> bool {
        matches!(self, Self::OnTime | Self::FilterOnTime)
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Key of a timer: `<light>_<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerKey(String);

impl TimerKey {
    /// Arbitrary key, for timers that do not belong to a light.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key of `kind` for `light`.
    #[must_use]
    pub fn for_light(light: &EntityId, kind: TimerKind) -> Self {
        Self(format!("{light}_{}", kind.suffix()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a light timer does when it fires.
///
/// The light id is all any callback needs; the configuration is looked up
/// from it at fire time and every setting is re-read then.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerPayload {
    pub light: EntityId,
    pub kind: TimerKind,
}

impl TimerPayload {
    #[must_use]
    pub fn new(light: EntityId, kind: TimerKind) -> Self {
        Self { light, kind }
    }

    #[must_use]
    pub fn key(&self) -> TimerKey {
        TimerKey::for_light(&self.light, self.kind)
    }

    #[must_use]
    pub fn family(&self) -> TimerFamily {
        self.kind.family()
    }
}
