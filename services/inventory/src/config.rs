//! Service configuration
//!
//! Settings are layered from built-in defaults and `INVENTORY_*`
//! environment variables. Database connectivity is configured separately
//! through [`common::database::DatabaseConfig`].

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::service::DEFAULT_MAX_PAGE_SIZE;

/// Backing store selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Inventory service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Interface to bind (`INVENTORY_BIND_ADDRESS`, default `0.0.0.0`)
    pub bind_address: String,
    /// Listening port (`INVENTORY_PORT`, default 3002)
    pub port: u16,
    /// Store backend (`INVENTORY_STORE`, default `postgres`)
    pub store: StoreBackend,
    /// Upper bound for `pageSize` (`INVENTORY_MAX_PAGE_SIZE`, default 100)
    pub max_page_size: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 3002_i64)?
            .set_default("store", "postgres")?
            .set_default("max_page_size", DEFAULT_MAX_PAGE_SIZE)?
            .add_source(Environment::with_prefix("INVENTORY").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
