//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default          |
//! |-------------------------------|------------------|
//! | `MEDSTOCK_HOST`               | `0.0.0.0`        |
//! | `MEDSTOCK_PORT`               | `3000`           |
//! | `MEDSTOCK_DB_PATH`            | `./medstock.db`  |
//! | `MEDSTOCK_DB_MAX_CONNECTIONS` | `5`              |
//! | `MEDSTOCK_CORS_ORIGIN`        | unset: any origin|

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size handed to `DbConfig`
    pub db_max_connections: u32,

    /// Allowed CORS origin; `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            host: lookup("MEDSTOCK_HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MEDSTOCK_HOST".to_string()))?,

            port: lookup("MEDSTOCK_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MEDSTOCK_PORT".to_string()))?,

            database_path: lookup("MEDSTOCK_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./medstock.db")),

            db_max_connections: lookup("MEDSTOCK_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MEDSTOCK_DB_MAX_CONNECTIONS".to_string()))?,

            cors_origin: lookup("MEDSTOCK_CORS_ORIGIN")
                .filter(|origin| !origin.is_empty())
                .map(|origin| HeaderValue::from_str(&origin))
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("MEDSTOCK_CORS_ORIGIN".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MEDSTOCK_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
