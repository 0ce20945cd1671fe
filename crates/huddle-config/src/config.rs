//! Configuration types
//!
//! ```toml
//! [database]
//! url = "https://db.example.com/sql"
//! namespace = "huddle"
//! database = "production"
//! timeout_secs = 15
//!
//! [database.service]
//! username = "backend"
//! password = "..."
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HuddleConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HuddleConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.database.validate()
    }
}

/// Database endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full URL of the SQL endpoint, e.g. `http://localhost:8000/sql`
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Request timeout applied by the HTTP client
    pub timeout_secs: u64,
    /// Service account, only needed for server-side execution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceCredentials>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/sql".to_string(),
            namespace: "huddle".to_string(),
            database: "huddle".to_string(),
            timeout_secs: 30,
            service: None,
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "database.url".to_string(),
                value: self.url.clone(),
            });
        }
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.namespace".to_string(),
                value: self.namespace.clone(),
            });
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.database".to_string(),
                value: self.database.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Username/password for trusted server-to-database authentication
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub username: String,
    pub password: String,
}

impl ServiceCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves present
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when no `--log-level` or `RUST_LOG` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
