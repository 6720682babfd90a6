//! Application configuration shared by the command-line and web front ends.
//!
//! Configuration is a small YAML document. Every key is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! database: ./workorders.db
//! web:
//!   bind: 127.0.0.1:8501
//! ```
//!
//! # Database path precedence
//!
//! 1. An explicit path (the `--db` flag of either binary).
//! 2. The `WORKORDERS_DB` environment variable.
//! 3. The `database` key of the loaded configuration.
//! 4. `./workorders.db`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default database filename, relative to the working directory.
pub const DEFAULT_DB_FILENAME: &str = "workorders.db";

/// Default configuration filename looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "workorders.yml";

/// Default listen address for the web UI.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "WORKORDERS_CONFIG";

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "WORKORDERS_DB";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error in config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for the web UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Socket address the server listens on.
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use workorders_core::AppConfig;
///
/// let config: AppConfig = serde_yaml::from_str("database: /var/lib/wo.db").unwrap();
/// assert_eq!(config.database.unwrap().to_str(), Some("/var/lib/wo.db"));
/// assert_eq!(config.web.bind, "127.0.0.1:8501");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database file path.
    pub database: Option<PathBuf>,
    /// Web UI settings.
    pub web: WebConfig,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Locates and loads configuration.
    ///
    /// An explicit path must exist. Otherwise the path in `WORKORDERS_CONFIG`
    /// is used, then `./workorders.yml` if present; with neither, defaults
    /// are returned.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::discover_with(explicit, from_env, Path::new(DEFAULT_CONFIG_FILENAME))
    }

    fn discover_with(
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
        fallback: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = from_env {
            return Self::load(path);
        }
        if fallback.is_file() {
            return Self::load(fallback);
        }
        Ok(Self::default())
    }

    /// Resolves the database path, honoring the precedence described in the
    /// module documentation.
    pub fn resolve_database(&self, explicit: Option<&Path>) -> PathBuf {
        let from_env = std::env::var_os(DB_ENV).map(PathBuf::from);
        self.resolve_database_with(explicit, from_env)
    }

    fn resolve_database_with(&self, explicit: Option<&Path>, from_env: Option<PathBuf>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or(from_env.filter(|p| !p.as_os_str().is_empty()))
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
database: /srv/workorders/plant.db
web:
  bind: 0.0.0.0:9000
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: AppConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(
            config.database,
            Some(PathBuf::from("/srv/workorders/plant.db"))
        );
        assert_eq!(config.web.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("web: {}").unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.web.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_load_empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_yaml_is_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "database: [unclosed").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_discover_prefers_explicit_then_env_then_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.yml");
        let env = dir.path().join("env.yml");
        let fallback = dir.path().join("workorders.yml");
        std::fs::write(&explicit, "database: explicit.db").unwrap();
        std::fs::write(&env, "database: env.db").unwrap();
        std::fs::write(&fallback, "database: fallback.db").unwrap();

        let config =
            AppConfig::discover_with(Some(&explicit), Some(env.clone()), &fallback).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("explicit.db")));

        let config = AppConfig::discover_with(None, Some(env), &fallback).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("env.db")));

        let config = AppConfig::discover_with(None, None, &fallback).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("fallback.db")));
    }

    #[test]
    fn test_discover_without_any_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            AppConfig::discover_with(None, None, &dir.path().join("workorders.yml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_resolve_database_precedence() {
        let config = AppConfig {
            database: Some(PathBuf::from("from-config.db")),
            ..AppConfig::default()
        };

        assert_eq!(
            config.resolve_database_with(
                Some(Path::new("flag.db")),
                Some(PathBuf::from("env.db"))
            ),
            PathBuf::from("flag.db")
        );
        assert_eq!(
            config.resolve_database_with(None, Some(PathBuf::from("env.db"))),
            PathBuf::from("env.db")
        );
        assert_eq!(
            config.resolve_database_with(None, Some(PathBuf::new())),
            PathBuf::from("from-config.db")
        );
        assert_eq!(
            AppConfig::default().resolve_database_with(None, None),
            PathBuf::from(DEFAULT_DB_FILENAME)
        );
    }
}
