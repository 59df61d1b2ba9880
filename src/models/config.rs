use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::price::RecordSchema;

/// Configuration options specific to the prices service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// SQLite database path.
    pub database_url: String,
    /// Column layout used for both upload parsing and export rendering.
    pub record_schema: RecordSchema,
}

impl ServerConfig {
    /// Load settings from `config/default.yaml` (optional) overlaid with
    /// `APP_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("database_url", "app.db")?
            .set_default("record_schema", "full")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
