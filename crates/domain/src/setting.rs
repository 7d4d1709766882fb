//! Settings — tunables that are either host helpers or fixed literals.
//!
//! A light automation reads most of its parameters (thresholds, timer
//! durations, enable flags, modes) from host helper entities so they can be
//! tuned live. Any of them may instead be pinned to a literal in the
//! configuration file.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::id::EntityId;
use crate::state::StateValue;

/// Where a setting's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    /// Read fresh from the host bus every time it is needed.
    Entity(EntityId),
    /// A literal from the configuration.
    Fixed(StateValue),
}

impl Setting {
    #[must_use]
    pub fn fixed(value: impl Into<StateValue>) -> Self {
        Self::Fixed(value.into())
    }

    /// The backing entity, when the setting lives on the host.
    #[must_use]
    pub fn entity(&self) -> Option<&EntityId> {
        match self {
            Self::Entity(id) => Some(id),
            Self::Fixed(_) => None,
        }
    }
}

impl From<EntityId> for Setting {
    fn from(value: EntityId) -> Self {
        Self::Entity(value)
    }
}

impl std::fmt::Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "{id}"),
            Self::Fixed(value) => write!(f, "{value} (fixed)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSetting {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawSetting::deserialize(deserializer)? {
            RawSetting::Flag(flag) => Self::fixed(flag),
            RawSetting::Number(n) => Self::fixed(n),
            RawSetting::Text(text) => match StateValue::parse(&text) {
                value @ StateValue::Text(_) if text.contains('.') => {
                    EntityId::new(text).map_or(Self::Fixed(value), Self::Entity)
                }
                value => Self::Fixed(value),
            },
        })
    }
}

impl Serialize for Setting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Entity(id) => serializer.serialize_str(id.as_str()),
            Self::Fixed(StateValue::On) => serializer.serialize_bool(true),
            Self::Fixed(StateValue::Off) => serializer.serialize_bool(false),
            Self::Fixed(StateValue::Number(n)) => serializer.serialize_f64(*n),
            Self::Fixed(other) => serializer.collect_str(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        value: Setting,
    }

    fn parse(json: &str) -> Setting {
        serde_json::from_str::<Holder>(json).unwrap().value
    }

    #[test]
    fn should_treat_dotted_string_as_entity() {
        assert_eq!(
            parse(r#"{"value": "input_number.kitchen_min_lux"}"#),
            Setting::Entity(EntityId::new("input_number.kitchen_min_lux").unwrap())
        );
    }

    #[test]
    fn should_treat_numbers_as_fixed() {
        assert_eq!(parse(r#"{"value": 30}"#), Setting::Fixed(StateValue::Number(30.0)));
        assert_eq!(parse(r#"{"value": 2.5}"#), Setting::Fixed(StateValue::Number(2.5)));
    }

    #[test]
    fn should_treat_booleans_as_fixed_flags() {
        assert_eq!(parse(r#"{"value": true}"#), Setting::Fixed(StateValue::On));
        assert_eq!(parse(r#"{"value": false}"#), Setting::Fixed(StateValue::Off));
    }

    #[test]
    fn should_treat_bare_words_as_fixed_text() {
        assert_eq!(
            parse(r#"{"value": "Push"}"#),
            Setting::Fixed(StateValue::Text("Push".to_string()))
        );
        assert_eq!(parse(r#"{"value": "on"}"#), Setting::Fixed(StateValue::On));
    }

    #[test]
    fn should_treat_decimal_string_as_fixed_number() {
        assert_eq!(parse(r#"{"value": "12.5"}"#), Setting::Fixed(StateValue::Number(12.5)));
    }

    #[test]
    fn should_expose_backing_entity() {
        let id = EntityId::new("input_boolean.auto").unwrap();
        assert_eq!(Setting::from(id.clone()).entity(), Some(&id));
        assert_eq!(Setting::fixed(true).entity(), None);
    }

    #[test]
    fn should_serialize_fixed_flag_as_bool() {
        let json = serde_json::to_string(&Setting::fixed(true)).unwrap();
        assert_eq!(json, "true");
    }
}
