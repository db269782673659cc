//! Configuration loading and connection-string resolution
//!
//! The connection string is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `PCCAT_DATABASE_URL`
//! 3. TOML config file `[database] url`
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing config file is not an error; a malformed one is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the connection string
pub const DATABASE_URL_ENV: &str = "PCCAT_DATABASE_URL";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[database]` table of the config file
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    /// sqlx SQLite URL, e.g. `sqlite:///var/lib/pccat/catalog.db`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fully resolved settings for opening the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = DatabaseSection::default();
        Self {
            url: url.into(),
            max_connections: defaults.max_connections,
            busy_timeout: Duration::from_millis(defaults.busy_timeout_ms),
        }
    }

    /// Private in-memory store on a single connection
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            ..Self::new("sqlite::memory:")
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load an explicit config file, or the platform file if one exists
    ///
    /// An explicit path must exist; the platform locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Resolve connection settings, applying CLI and environment overrides
    pub fn database_config(&self, cli_url: Option<&str>) -> DatabaseConfig {
        let env_url = std::env::var(DATABASE_URL_ENV).ok();
        let url = resolve_database_url(cli_url, env_url.as_deref(), self.database.url.as_deref());

        DatabaseConfig {
            url,
            max_connections: self.database.max_connections.max(1),
            busy_timeout: Duration::from_millis(self.database.busy_timeout_ms),
        }
    }
}

/// Pick the first non-empty source, falling back to the compiled default
pub fn resolve_database_url(
    cli_arg: Option<&str>,
    env_value: Option<&str>,
    config_value: Option<&str>,
) -> String {
    [cli_arg, env_value, config_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(default_database_url)
}

/// Platform config file, if present
///
/// Linux: `~/.config/pccat/config.toml`, then `/etc/pccat/config.toml`.
/// Elsewhere: the platform config directory only.
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("pccat").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/pccat/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default database file
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("pccat"))
        .unwrap_or_else(|| PathBuf::from("./pccat_data"))
        .join("catalog.db")
}

pub fn default_database_url() -> String {
    format!("sqlite://{}", default_database_path().display())
}
