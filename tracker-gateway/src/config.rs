//! Runtime configuration read from the environment.

use std::{net::SocketAddr, sync::Arc};

use tracker_store::{MemoryStore, SqliteStore, StoreError, UserStore};

/// Port used when neither `PORT` nor `TRACKER_LISTEN_ADDR` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Database file used when `TRACKER_DB_PATH` is unset.
pub const DEFAULT_DB_PATH: &str = "exercise-track.db";

/// `TRACKER_DB_PATH` value selecting the in-memory store.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Errors in the environment configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid PORT '{value}': expected an integer in 0..=65535")]
    InvalidPort { value: String },

    #[error("invalid TRACKER_LISTEN_ADDR '{value}': expected host:port")]
    InvalidListenAddr { value: String },
}

/// Where the gateway keeps its user documents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreConfig {
    /// Documents live in process memory only.
    Memory,
    /// Documents live in the SQLite file at this path.
    Sqlite(String),
}

/// Gateway settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// Socket address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Backing store selection.
    pub store: StoreConfig,
}

impl GatewayConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `PORT` or `TRACKER_LISTEN_ADDR` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    /// Same as [`GatewayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr = match lookup("TRACKER_LISTEN_ADDR") {
            Some(value) => value
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidListenAddr { value })?,
            None => {
                let port = match lookup("PORT") {
                    Some(value) => value
                        .trim()
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort { value })?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let store = match lookup("TRACKER_DB_PATH") {
            Some(path) if path == MEMORY_DB_PATH => StoreConfig::Memory,
            Some(path) if !path.trim().is_empty() => StoreConfig::Sqlite(path),
            _ => StoreConfig::Sqlite(DEFAULT_DB_PATH.to_owned()),
        };

        Ok(Self { listen_addr, store })
    }

    /// Open the configured store.
    ///
    /// # Errors
    /// Propagates [`StoreError`] if the SQLite database cannot be opened.
    pub fn open_store(&self) -> Result<Arc<dyn UserStore>, StoreError> {
        match &self.store {
            StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreConfig::Sqlite(path) => Ok(Arc::new(SqliteStore::open(path)?)),
        }
    }
}
