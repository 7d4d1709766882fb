//! Host entity identifiers (`<domain>.<object_id>`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of an entity on the host bus, e.g. `light.kitchen` or
/// `input_number.kitchen_min_lux`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Parse and validate an entity id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEntityId`] when the value has no
    /// `.` separator or an empty domain/object id part.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match value.split_once('.') {
            Some((domain, object_id))
                if !domain.is_empty()
                    && !object_id.is_empty()
                    && !value.chars().any(char::is_whitespace) =>
            {
                Ok(Self(value))
            }
            _ => Err(ValidationError::InvalidEntityId(value)),
        }
    }

    /// The domain part (`light` in `light.kitchen`).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(domain, _)| domain)
    }

    /// The object id part (`kitchen` in `light.kitchen`).
    #[must_use]
    pub fn object_id(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, object_id)| object_id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_split_domain_and_object_id() {
        let id = EntityId::new("light.kitchen_ceiling").unwrap();
        assert_eq!(id.domain(), "light");
        assert_eq!(id.object_id(), "kitchen_ceiling");
    }

    #[test]
    fn should_keep_everything_after_first_dot_in_object_id() {
        let id: EntityId = "sensor.lux.raw".parse().unwrap();
        assert_eq!(id.domain(), "sensor");
        assert_eq!(id.object_id(), "lux.raw");
    }

    #[test]
    fn should_reject_value_without_dot() {
        assert_eq!(
            EntityId::new("kitchen"),
            Err(ValidationError::InvalidEntityId("kitchen".to_string()))
        );
    }

    #[test]
    fn should_reject_empty_parts() {
        assert!(EntityId::new(".kitchen").is_err());
        assert!(EntityId::new("light.").is_err());
        assert!(EntityId::new("").is_err());
    }

    #[test]
    fn should_reject_whitespace() {
        assert!(EntityId::new("light.kitchen light").is_err());
    }

    #[test]
    fn should_deserialize_from_plain_string() {
        let id: EntityId = serde_json::from_str("\"binary_sensor.hall_motion\"").unwrap();
        assert_eq!(id.as_str(), "binary_sensor.hall_motion");
    }

    #[test]
    fn should_fail_deserialization_of_invalid_id() {
        let result: Result<EntityId, _> = serde_json::from_str("\"nodot\"");
        assert!(result.is_err());
    }
}
