//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `luxhub.toml` in the working directory, or at the path in
//! `LUXHUB_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use luxhub_domain::automation::LightAutomationBuilder;
use luxhub_domain::id::EntityId;
use luxhub_domain::state::StateValue;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_PATH: &str = "luxhub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// One entry per automated light.
    pub lights: Vec<LightAutomationBuilder>,
    /// Initial state of the in-memory host.
    #[serde(rename = "virtual")]
    pub virtual_host: VirtualConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Seed values for the virtual host.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    pub entities: BTreeMap<EntityId, SeedValue>,
}

/// A literal entity value in the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<SeedValue> for StateValue {
    fn from(value: SeedValue) -> Self {
        match value {
            SeedValue::Flag(flag) => Self::from(flag),
            SeedValue::Number(n) => Self::Number(n),
            SeedValue::Text(text) => Self::parse(&text),
        }
    }
}

impl Config {
    /// Load configuration from `LUXHUB_CONFIG` or `luxhub.toml` (if present)
    /// then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed,
    /// or if the resulting log filter is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("LUXHUB_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LUXHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.env_filter()?;
        Ok(())
    }

    /// Build the tracing filter from `[logging] filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the directive does not parse.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.logging.filter)
            .map_err(|err| ConfigError::Validation(format!("invalid log filter: {err}")))
    }

    /// Initial states for the virtual host.
    pub fn seed_states(&self) -> impl Iterator<Item = (EntityId, StateValue)> + '_ {
        self.virtual_host
            .entities
            .iter()
            .map(|(id, value)| (id.clone(), value.clone().into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "luxhubd=info,luxhub_app=info,luxhub_adapter_virtual=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxhub_domain::automation::NumericSetting;
    use luxhub_domain::setting::Setting;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert!(config.lights.is_empty());
        assert!(config.virtual_host.entities.is_empty());
        assert!(config.logging.filter.contains("luxhubd=info"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.lights.is_empty());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [logging]
            filter = "debug"

            [[lights]]
            light = "light.kitchen"
            presence_on = "binary_sensor.kitchen_motion"
            illuminance_sensor = "sensor.kitchen_lux"
            enable_automation = "input_boolean.kitchen_automation"
            enable_sensor = true
            timer_on_push = 5

            [[lights]]
            light = "light.hall"
            presence_on = "binary_sensor.hall_motion"

            [virtual.entities]
            "light.kitchen" = "off"
            "sensor.kitchen_lux" = 12.5
            "input_boolean.kitchen_automation" = true
            "input_select.kitchen_mode" = "Push"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.lights.len(), 2);

        let kitchen = config.lights[0].clone().build().unwrap();
        assert_eq!(kitchen.light.as_str(), "light.kitchen");
        assert_eq!(
            kitchen.settings.numeric(NumericSetting::TimerOnPush),
            &Setting::fixed(5.0)
        );

        let seeds: BTreeMap<_, _> = config.seed_states().collect();
        let get = |entity: &str| seeds[&EntityId::new(entity).unwrap()].clone();
        assert_eq!(get("light.kitchen"), StateValue::Off);
        assert_eq!(get("sensor.kitchen_lux"), StateValue::Number(12.5));
        assert_eq!(get("input_boolean.kitchen_automation"), StateValue::On);
        assert_eq!(get("input_select.kitchen_mode"), StateValue::Text("Push".to_string()));
    }

    #[test]
    fn should_reject_unknown_light_fields() {
        let toml = r#"
            [[lights]]
            light = "light.kitchen"
            presense_on = "binary_sensor.kitchen_motion"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn should_reject_invalid_entity_key() {
        let toml = r#"
            [virtual.entities]
            "kitchen" = "off"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert!(config.lights.is_empty());
    }

    #[test]
    fn should_reject_invalid_log_filter() {
        let mut config = Config::default();
        config.logging.filter = "luxhubd=loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
