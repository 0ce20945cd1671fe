//! Loading configuration from files and the process environment

use huddle_config::{
    ConfigError, ConfigLoader, ServiceCredentials, ENV_DB_NAME, ENV_DB_PASS, ENV_DB_URL,
    ENV_DB_USER,
};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ============================================================================
// File loading
// ============================================================================

#[test]
fn test_load_full_file() {
    let file = write_config(
        r#"
        [database]
        url = "https://db.example.com/sql"
        namespace = "acme"
        database = "production"
        timeout_secs = 10

        [database.service]
        username = "backend"
        password = "secret"

        [logging]
        level = "debug"
        "#,
    );

    let config = ConfigLoader::load_with_env(Some(file.path()), no_env).unwrap();
    assert_eq!(config.database.url, "https://db.example.com/sql");
    assert_eq!(config.database.namespace, "acme");
    assert_eq!(config.database.database, "production");
    assert_eq!(config.database.timeout_secs, 10);
    assert_eq!(
        config.database.service,
        Some(ServiceCredentials::new("backend", "secret"))
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
        [database]
        database = "staging"
        "#,
    );

    let config = ConfigLoader::load_with_env(Some(file.path()), no_env).unwrap();
    assert_eq!(config.database.url, "http://localhost:8000/sql");
    assert_eq!(config.database.namespace, "huddle");
    assert_eq!(config.database.database, "staging");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let result = ConfigLoader::load_with_env(Some(&path), no_env);
    assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == path));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let file = write_config("[database\nurl = ");
    let result = ConfigLoader::load_with_env(Some(file.path()), no_env);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_url_fails_validation() {
    let file = write_config(
        r#"
        [database]
        url = "localhost:8000"
        "#,
    );
    let result = ConfigLoader::load_with_env(Some(file.path()), no_env);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_env_wins_over_file() {
    let file = write_config(
        r#"
        [database]
        url = "https://file.example.com/sql"
        database = "from-file"
        "#,
    );

    let config = ConfigLoader::load_with_env(Some(file.path()), |key| match key {
        ENV_DB_URL => Some("https://env.example.com/sql".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.database.url, "https://env.example.com/sql");
    assert_eq!(config.database.database, "from-file");
}

// ============================================================================
// Process environment
// ============================================================================

#[test]
#[serial]
fn test_load_reads_process_env() {
    let file = write_config("");
    std::env::set_var(ENV_DB_NAME, "from-process");
    std::env::set_var(ENV_DB_USER, "svc");
    std::env::set_var(ENV_DB_PASS, "pw");

    let config = ConfigLoader::load(Some(file.path()));

    std::env::remove_var(ENV_DB_NAME);
    std::env::remove_var(ENV_DB_USER);
    std::env::remove_var(ENV_DB_PASS);

    let config = config.unwrap();
    assert_eq!(config.database.database, "from-process");
    assert_eq!(
        config.database.service,
        Some(ServiceCredentials::new("svc", "pw"))
    );
}

#[test]
#[serial]
fn test_load_without_env_has_no_service_account() {
    std::env::remove_var(ENV_DB_USER);
    std::env::remove_var(ENV_DB_PASS);
    let file = write_config("");

    let config = ConfigLoader::load(Some(file.path())).unwrap();
    assert!(config.database.service.is_none());
}
