//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Inventory behavior configuration.
    #[serde(default)]
    pub inventory: InventorySettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Inventory behavior configuration.
///
/// Product-scoped stock operations (recording a plain IN/OUT movement,
/// manual adjustment, level validation) act against a single configured
/// store rather than requiring a store id on every call.
#[derive(Debug, Clone, Deserialize)]
pub struct InventorySettings {
    /// Store id used for product-scoped stock operations.
    #[serde(default = "default_store_id")]
    pub default_store_id: String,
    /// Whether manual stock adjustments also append a compensating
    /// ledger movement. Off by default: adjustments are corrections,
    /// not tracked events.
    #[serde(default)]
    pub log_adjustments: bool,
}

fn default_store_id() -> String {
    "main".to_string()
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            default_store_id: default_store_id(),
            log_adjustments: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STOCKROOM").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_settings_defaults() {
        let settings = InventorySettings::default();
        assert_eq!(settings.default_store_id, "main");
        assert!(!settings.log_adjustments);
    }

    #[test]
    fn test_server_defaults() {
        let server: ServerConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }
}
