//! Automation modes selected through host helpers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Direction of a command the automation wants to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    On,
    Off,
}

/// How a suspended automation gets re-enabled.
///
/// - `Push`: toggling the light on re-enables it.
/// - `Time`: an elapsed no-presence period re-enables it.
/// - `All`: both strategies are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutoEnableMode {
    Push,
    Time,
    #[default]
    All,
}

impl AutoEnableMode {
    #[must_use]
    pub fn uses_push(self) -> bool {
        matches!(self, Self::Push | Self::All)
    }

    #[must_use]
    pub fn uses_time(self) -> bool {
        matches!(self, Self::Time | Self::All)
    }
}

impl FromStr for AutoEnableMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" => Ok(Self::Push),
            "time" => Ok(Self::Time),
            "all" => Ok(Self::All),
            _ => Err(ValidationError::UnknownMode {
                kind: "automatic-enable mode",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AutoEnableMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => f.write_str("Push"),
            Self::Time => f.write_str("Time"),
            Self::All => f.write_str("All"),
        }
    }
}

/// Which directions presence sensors are allowed to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SensorDirection {
    On,
    Off,
    #[default]
    All,
}

impl SensorDirection {
    /// Whether a command in `direction` is allowed.
    #[must_use]
    pub fn permits(self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::On => direction == Direction::On,
            Self::Off => direction == Direction::Off,
        }
    }
}

impl FromStr for SensorDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "all" => Ok(Self::All),
            _ => Err(ValidationError::UnknownMode {
                kind: "sensor direction",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SensorDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("On"),
            Self::Off => f.write_str("Off"),
            Self::All => f.write_str("All"),
        }
    }
}
