//! API configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults (port 8080, any CORS origin, no database),
//! 2. a JSON file named by `BILLING_CONFIG`,
//! 3. env vars `BILLING_SERVER_PORT`, `BILLING_CORS_ORIGINS`, `DATABASE_URL`.
//!
//! The JSON file uses camelCase keys:
//!
//! ```json
//! {
//!   "serverPort": "8080",
//!   "corsOrigins": "http://localhost:3000",
//!   "postgresql": {
//!     "host": "localhost", "port": "5432",
//!     "username": "postgres", "password": "postgres", "database": "invoices"
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "BILLING_CONFIG";
pub const SERVER_PORT_VAR: &str = "BILLING_SERVER_PORT";
pub const CORS_ORIGINS_VAR: &str = "BILLING_CORS_ORIGINS";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Connection settings for the PostgreSQL invoice store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl PostgresConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    #[serde(deserialize_with = "number_or_string")]
    pub server_port: u16,
    /// `*` or a comma-separated list of origins.
    pub cors_origins: String,
    pub postgresql: Option<PostgresConfig>,
    /// Full connection URL; takes precedence over `postgresql`.
    pub database_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cors_origins: "*".to_string(),
            postgresql: None,
            database_url: None,
        }
    }
}

impl ApiConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        if let Some(port) = lookup(SERVER_PORT_VAR) {
            config.server_port = port.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: SERVER_PORT_VAR,
                value: port.clone(),
            })?;
        }
        if let Some(origins) = lookup(CORS_ORIGINS_VAR) {
            config.cors_origins = origins;
        }
        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|u| !u.trim().is_empty()) {
            config.database_url = Some(url);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Connection URL of the configured database, if any.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| self.postgresql.as_ref().map(PostgresConfig::url))
    }
}

/// Ports appear as strings in existing config files and as numbers in new ones.
fn number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(n) => Ok(n),
        Port::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
