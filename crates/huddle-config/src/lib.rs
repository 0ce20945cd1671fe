//! # Huddle Configuration
//!
//! Endpoint, namespace, database and service credentials for the query
//! transport, plus logging defaults for the CLI.
//!
//! ```rust,no_run
//! use huddle_config::ConfigLoader;
//!
//! let config = ConfigLoader::load(None)?;
//! println!("querying {}", config.database.url);
//! # Ok::<(), huddle_config::ConfigError>(())
//! ```

mod config;
mod error;
mod loader;

pub use config::{DatabaseConfig, HuddleConfig, LoggingConfig, ServiceCredentials};
pub use error::{ConfigError, Result};
pub use loader::{
    ConfigLoader, ENV_DB_NAME, ENV_DB_NAMESPACE, ENV_DB_PASS, ENV_DB_TIMEOUT, ENV_DB_URL,
    ENV_DB_USER, ENV_LOG,
};
