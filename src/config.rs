//! Configuration for applications embedding the mapping layer.
//!
//! Exposes [`DatabaseConfig`] so applications can load the database file
//! location and schema version from `config/config.toml` or environment
//! variables using `DatabaseConfig::load()`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_path(),
            schema_version: default_schema_version(),
        }
    }
}

fn default_path() -> String {
    "dockhand.db".to_string()
}

fn default_schema_version() -> u32 {
    1
}

impl DatabaseConfig {
    /// Load the database configuration from `config/config.toml`, falling
    /// back to `DOCKHAND_`-prefixed environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("DOCKHAND").separator("__"))
            .build()?;

        settings.get::<DatabaseConfig>("database").map_err(|e| {
            ConfigError::Message(format!(
                "Database configuration could not be loaded from file or environment: {}",
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DatabaseConfig::default();
        assert_eq!(cfg.path, "dockhand.db");
        assert_eq!(cfg.schema_version, 1);
    }
}
