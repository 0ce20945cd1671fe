//! Configuration loading
//!
//! Sources are applied in order, later ones winning:
//! 1. Built-in defaults
//! 2. TOML file (explicit path, or `~/.config/huddle/config.toml` if present)
//! 3. Environment variables (`HUDDLE_DB_URL`, `HUDDLE_DB_USER`, ...)

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{HuddleConfig, ServiceCredentials};
use crate::error::{ConfigError, Result};

pub const ENV_DB_URL: &str = "HUDDLE_DB_URL";
pub const ENV_DB_NAMESPACE: &str = "HUDDLE_DB_NS";
pub const ENV_DB_NAME: &str = "HUDDLE_DB_NAME";
pub const ENV_DB_USER: &str = "HUDDLE_DB_USER";
pub const ENV_DB_PASS: &str = "HUDDLE_DB_PASS";
pub const ENV_DB_TIMEOUT: &str = "HUDDLE_DB_TIMEOUT";
pub const ENV_LOG: &str = "HUDDLE_LOG";

/// Loads [`HuddleConfig`] from file and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default config path: `$XDG_CONFIG_HOME/huddle/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            })
            .join("huddle")
            .join("config.toml")
    }

    /// Load using the process environment
    pub fn load(path: Option<&Path>) -> Result<HuddleConfig> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load with an injectable environment lookup
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<HuddleConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_file(path)?
            }
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::load_from_file(&default)?
                } else {
                    debug!("No config file at {}, using defaults", default.display());
                    HuddleConfig::default()
                }
            }
        };

        Self::apply_env(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn load_from_file(path: &Path) -> Result<HuddleConfig> {
        debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<HuddleConfig> {
        if contents.trim().is_empty() {
            return Ok(HuddleConfig::default());
        }
        Ok(toml::from_str(contents)?)
    }

    fn apply_env<F>(config: &mut HuddleConfig, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_DB_URL) {
            config.database.url = url;
        }
        if let Some(ns) = get(ENV_DB_NAMESPACE) {
            config.database.namespace = ns;
        }
        if let Some(db) = get(ENV_DB_NAME) {
            config.database.database = db;
        }
        if let Some(timeout) = get(ENV_DB_TIMEOUT) {
            config.database.timeout_secs = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_DB_TIMEOUT.to_string(),
                value: timeout.clone(),
            })?;
        }
        if let Some(level) = get(ENV_LOG) {
            config.logging.level = level;
        }

        let user = get(ENV_DB_USER);
        let pass = get(ENV_DB_PASS);
        if user.is_some() || pass.is_some() {
            let service = config
                .database
                .service
                .get_or_insert_with(ServiceCredentials::default);
            if let Some(user) = user {
                service.username = user;
            }
            if let Some(pass) = pass {
                service.password = pass;
            }
            if !service.is_complete() {
                warn!(
                    "Service credentials are incomplete; set both {} and {}",
                    ENV_DB_USER, ENV_DB_PASS
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut config = HuddleConfig::default();
        let env = env_of(&[
            (ENV_DB_URL, "https://db.example.com/sql"),
            (ENV_DB_NAMESPACE, "acme"),
            (ENV_DB_USER, "backend"),
            (ENV_DB_PASS, "secret"),
            (ENV_DB_TIMEOUT, "5"),
        ]);
        ConfigLoader::apply_env(&mut config, env).unwrap();

        assert_eq!(config.database.url, "https://db.example.com/sql");
        assert_eq!(config.database.namespace, "acme");
        assert_eq!(config.database.database, "huddle");
        assert_eq!(config.database.timeout_secs, 5);
        assert_eq!(
            config.database.service,
            Some(ServiceCredentials::new("backend", "secret"))
        );
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = HuddleConfig::default();
        ConfigLoader::apply_env(&mut config, env_of(&[(ENV_DB_URL, "")])).unwrap();
        assert_eq!(config.database.url, "http://localhost:8000/sql");
        assert!(config.database.service.is_none());
    }

    #[test]
    fn test_env_password_merges_into_file_credentials() {
        let mut config = ConfigLoader::from_toml_str(
            r#"
            [database.service]
            username = "from-file"
            password = ""
            "#,
        )
        .unwrap();
        ConfigLoader::apply_env(&mut config, env_of(&[(ENV_DB_PASS, "from-env")])).unwrap();
        assert_eq!(
            config.database.service,
            Some(ServiceCredentials::new("from-file", "from-env"))
        );
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut config = HuddleConfig::default();
        let result = ConfigLoader::apply_env(&mut config, env_of(&[(ENV_DB_TIMEOUT, "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            ConfigLoader::from_toml_str("  \n").unwrap(),
            HuddleConfig::default()
        );
    }
}
