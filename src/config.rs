use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://literature.db`
    pub url: String,
    /// Seconds to wait for the (single) pooled connection
    pub connect_timeout: u64,
}

impl AppConfig {
    /// Build configuration from defaults plus `LITDB_`-prefixed environment
    /// variables, e.g. `LITDB_DATABASE__URL=sqlite://catalog.db`.
    pub fn build() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("database.url", "sqlite://literature.db")?
            .set_default("database.connect_timeout", 30)?
            .add_source(Environment::default().separator("__").prefix("LITDB"));

        builder.build()?.try_deserialize()
    }
}

impl DatabaseConfig {
    /// In-memory database, used by the test suites.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            connect_timeout: 5,
        }
    }
}
