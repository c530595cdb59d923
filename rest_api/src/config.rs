// rest_api/src/config.rs

use anyhow::{Context, Result};
use config::{Config, Environment};
use lib::storage_engine::{StorageConfig, DEFAULT_DATABASE_URL};
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Process settings, read once at startup from the environment (`HOST`,
/// `PORT`, `DATABASE_URL`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl ServerConfig {
    /// Loads from the process environment. Call `dotenv::dotenv()` first to
    /// pick up a `.env` file.
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::default().try_parsing(true))
    }

    fn from_environment(environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .add_source(environment)
            .build()
            .context("Failed to build server configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse server configuration")
    }

    pub fn storage_config(&self) -> Result<StorageConfig> {
        StorageConfig::from_url(&self.database_url)
            .with_context(|| format!("Invalid DATABASE_URL {}", self.database_url))
    }
}
