//! Service configuration
//!
//! Connection settings for the map collaborator, event topic names, logging
//! and the seed for the loot remainder shuffle. Gameplay numbers are not here:
//! they are compile-time tables in `robot::upgrades` and `robot::item`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{GameError, Result};

/// Configuration for the robot service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the map service (planet adjacency and deposits)
    pub map_service_url: String,

    /// Request timeout towards the map service, in milliseconds
    pub map_timeout_ms: u64,

    /// Seed for the remainder shuffle in loot distribution
    ///
    /// `None` seeds from OS entropy. Tests and replays set a fixed value.
    pub rng_seed: Option<u64>,

    /// `tracing_subscriber` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,

    /// Topic names per event kind
    pub topics: TopicConfig,
}

/// Topic name for each kind of event the service emits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub movement: String,
    pub planet_blocked: String,
    pub regeneration: String,
    pub fighting: String,
    pub mining: String,
    pub item_fighting: String,
    pub item_repair: String,
    pub item_movement: String,
    pub resource_distribution: String,
    pub robot_destroyed: String,
    pub robot_spawned: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            movement: "movement".into(),
            planet_blocked: "planet-blocked".into(),
            regeneration: "regeneration".into(),
            fighting: "fighting".into(),
            mining: "mining".into(),
            item_fighting: "item-fighting".into(),
            item_repair: "item-repair".into(),
            item_movement: "item-movement".into(),
            resource_distribution: "resource-distribution".into(),
            robot_destroyed: "robot-destroyed".into(),
            robot_spawned: "robot-spawned".into(),
        }
    }
}

impl TopicConfig {
    fn all(&self) -> [&str; 11] {
        [
            &self.movement,
            &self.planet_blocked,
            &self.regeneration,
            &self.fighting,
            &self.mining,
            &self.item_fighting,
            &self.item_repair,
            &self.item_movement,
            &self.resource_distribution,
            &self.robot_destroyed,
            &self.robot_spawned,
        ]
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            map_service_url: "http://localhost:8080".into(),
            map_timeout_ms: 2000,
            rng_seed: None,
            log_filter: "robot_service=info".into(),
            topics: TopicConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string; missing keys keep their defaults
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GameError::Config(e.to_string()))
    }

    /// Apply `ROBOT_*` environment overrides
    ///
    /// Recognized: `ROBOT_MAP_SERVICE_URL`, `ROBOT_RNG_SEED`, `ROBOT_LOG_FILTER`
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var("ROBOT_MAP_SERVICE_URL") {
            self.map_service_url = url;
        }
        if let Ok(seed) = std::env::var("ROBOT_RNG_SEED") {
            let seed = seed
                .parse::<u64>()
                .map_err(|e| GameError::Config(format!("ROBOT_RNG_SEED: {}", e)))?;
            self.rng_seed = Some(seed);
        }
        if let Ok(filter) = std::env::var("ROBOT_LOG_FILTER") {
            self.log_filter = filter;
        }
        Ok(self)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map_service_url.trim().is_empty() {
            return Err(GameError::Config("map_service_url must not be empty".into()));
        }
        if self.map_timeout_ms == 0 {
            return Err(GameError::Config("map_timeout_ms must be positive".into()));
        }
        if self.topics.all().iter().any(|t| t.trim().is_empty()) {
            return Err(GameError::Config("topic names must not be empty".into()));
        }
        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<ServiceConfig> = OnceLock::new();

/// Get the global service config (initializes with defaults if not set)
pub fn config() -> &'static ServiceConfig {
    CONFIG.get_or_init(ServiceConfig::default)
}

/// Set the global service config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: ServiceConfig) -> std::result::Result<(), ServiceConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let config = ServiceConfig::parse_toml(
            r#"
            map_service_url = "http://map:9000"
            rng_seed = 7

            [topics]
            fighting = "robot-fights"
            "#,
        )
        .unwrap();

        assert_eq!(config.map_service_url, "http://map:9000");
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.topics.fighting, "robot-fights");
        assert_eq!(config.topics.movement, "movement");
        assert_eq!(config.map_timeout_ms, 2000);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = ServiceConfig::parse_toml("map_timeout_ms = \"soon\"");
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_topic() {
        let mut config = ServiceConfig::default();
        config.topics.mining = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ServiceConfig {
            map_timeout_ms: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
