//! State value — what a point-read of a host entity returns.

use serde::{Deserialize, Serialize};

/// Parsed state of a host entity.
///
/// The host bus speaks strings; [`StateValue::parse`] maps them to a typed
/// value. `unknown`, `unavailable`, `none` and the empty string all mean
/// "no data".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateValue {
    On,
    Off,
    Number(f64),
    Text(String),
    #[default]
    Unknown,
    Unavailable,
}

impl StateValue {
    /// Parse a raw host state string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            "" | "unknown" | "none" => Self::Unknown,
            "unavailable" => Self::Unavailable,
            _ => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map_or_else(|| Self::Text(trimmed.to_string()), Self::Number),
        }
    }

    /// Whether the value carries usable data.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !matches!(self, Self::Unknown | Self::Unavailable)
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    #[must_use]
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    /// Numeric view of the value, if it is a number.
    ///
    /// Text that looks like a number (e.g. `" 12.5 "`) is accepted too.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Textual view of the value (`on`, `off`, the number or the text).
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        self.has_data().then(|| self.to_string())
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl std::fmt::Display for StateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}
