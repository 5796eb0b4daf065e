use serde::Deserialize;
use std::env;
use railseat_catalog::{ClassLayout, SeatPricing, TrainInfo};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub booking_service: BookingServiceConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default = "TrainInfo::standard")]
    pub trains: Vec<TrainInfo>,
    #[serde(default = "ClassLayout::standard")]
    pub layouts: Vec<ClassLayout>,
    #[serde(default)]
    pub pricing: SeatPricing,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingServiceConfig {
    /// Base URL of the booking service; without it every booking id is accepted
    pub url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_breaker_threshold")]
    pub breaker_threshold: u32,
    #[serde(default = "default_breaker_reset_seconds")]
    pub breaker_reset_seconds: u64,
}

impl Default for BookingServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_timeout_ms(),
            breaker_threshold: default_breaker_threshold(),
            breaker_reset_seconds: default_breaker_reset_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { queue_capacity: default_queue_capacity() }
    }
}

fn default_timeout_ms() -> u64 { 2000 }
fn default_breaker_threshold() -> u32 { 5 }
fn default_breaker_reset_seconds() -> u64 { 30 }
fn default_queue_capacity() -> usize { 1024 }

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `RAILSEAT_SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("RAILSEAT").separator("__"));

        Self::finish(builder)
    }

    /// Parse a TOML document with no file or environment layering
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.trains.is_empty() {
            return Err(ConfigError::Invalid("at least one train must be configured".to_string()));
        }
        if self.layouts.is_empty() {
            return Err(ConfigError::Invalid("at least one coach layout must be configured".to_string()));
        }
        if self.booking_service.timeout_ms == 0 {
            return Err(ConfigError::Invalid("booking_service.timeout_ms must be positive".to_string()));
        }
        if self.booking_service.breaker_threshold == 0 {
            return Err(ConfigError::Invalid("booking_service.breaker_threshold must be positive".to_string()));
        }
        if self.notifications.queue_capacity == 0 {
            return Err(ConfigError::Invalid("notifications.queue_capacity must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railseat_core::CoachClass;

    #[test]
    fn test_minimal_config_uses_standard_tables() {
        let config = Config::from_toml("[server]\nport = 8081\n").unwrap();
        assert_eq!(config.server.port, 8081);
        assert!(config.booking_service.url.is_none());
        assert_eq!(config.booking_service.timeout_ms, 2000);
        assert_eq!(config.notifications.queue_capacity, 1024);
        assert_eq!(config.trains.len(), 3);
        assert_eq!(config.layouts, ClassLayout::standard());
    }

    #[test]
    fn test_trains_and_layouts_from_toml() {
        let source = r#"
[server]
port = 8081

[booking_service]
url = "http://localhost:8080"
timeout_ms = 500

[[trains]]
train_number = "TRN900"
name = "Night Owl"
source = "Paris"
destination = "Berlin"
departure_time = "22:00"
arrival_time = "07:30"
available_classes = ["Economy"]
base_price = { "Economy" = 60.0 }

[[layouts]]
class = "Economy"
coach_prefix = "S"
coach_count = 2
rows = 12
seats_per_row = 4
pattern = "2-2"
"#;
        let config = Config::from_toml(source).unwrap();
        assert_eq!(config.booking_service.url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.booking_service.timeout_ms, 500);
        assert_eq!(config.trains[0].train_number, "TRN900");
        assert_eq!(config.trains[0].base_price[&CoachClass::Economy], 60.0);
        assert_eq!(config.layouts[0].coach_prefix, "S");
    }

    #[test]
    fn test_zero_queue_capacity_is_rejected() {
        let err = Config::from_toml("[server]\nport = 8081\n[notifications]\nqueue_capacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_server_section_fails() {
        assert!(matches!(Config::from_toml("").unwrap_err(), ConfigError::Source(_)));
    }
}
