//! Configuration loading and connection-string resolution
//!
//! Tests that touch PCCAT_DATABASE_URL are marked #[serial] so they never
//! race each other on the process environment.

use pccat_common::config::{default_database_url, TomlConfig, DATABASE_URL_ENV};
use pccat_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_file() {
    let file = write_config(
        r#"
[database]
url = "sqlite:///srv/pccat/catalog.db"
max_connections = 8
busy_timeout_ms = 250

[logging]
level = "debug"
"#,
    );

    let config = TomlConfig::load(Some(file.path())).unwrap();
    assert_eq!(
        config.database.url.as_deref(),
        Some("sqlite:///srv/pccat/catalog.db")
    );
    assert_eq!(config.database.max_connections, 8);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_empty_config_file_uses_defaults() {
    let file = write_config("");

    let config = TomlConfig::load(Some(file.path())).unwrap();
    assert!(config.database.url.is_none());
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.database.busy_timeout_ms, 5000);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_config_is_an_error() {
    let file = write_config("[database\nurl = ");

    let err = TomlConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{:?}", err);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TomlConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
#[serial]
fn test_env_overrides_file_and_cli_overrides_env() {
    let file = write_config("[database]\nurl = \"sqlite://file.db\"\nbusy_timeout_ms = 100\n");
    let config = TomlConfig::load(Some(file.path())).unwrap();

    env::set_var(DATABASE_URL_ENV, "sqlite://env.db");
    let resolved = config.database_config(None);
    assert_eq!(resolved.url, "sqlite://env.db");
    assert_eq!(resolved.busy_timeout, Duration::from_millis(100));

    let resolved = config.database_config(Some("sqlite://cli.db"));
    assert_eq!(resolved.url, "sqlite://cli.db");

    env::remove_var(DATABASE_URL_ENV);
    assert_eq!(config.database_config(None).url, "sqlite://file.db");
}

#[test]
#[serial]
fn test_no_sources_falls_back_to_default() {
    env::remove_var(DATABASE_URL_ENV);

    let resolved = TomlConfig::default().database_config(None);
    assert_eq!(resolved.url, default_database_url());
    assert_eq!(resolved.max_connections, 5);
}

#[test]
#[serial]
fn test_zero_max_connections_is_raised_to_one() {
    env::remove_var(DATABASE_URL_ENV);
    let file = write_config("[database]\nmax_connections = 0\n");

    let config = TomlConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.database_config(None).max_connections, 1);
}
