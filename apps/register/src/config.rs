//! Register configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default                              |
//! |---------------------------------|--------------------------------------|
//! | `PAPELERIA_DB_PATH`             | `<data dir>/papeleria.db`            |
//! | `PAPELERIA_DB_MAX_CONNECTIONS`  | `5`                                  |
//! | `PAPELERIA_DB_BUSY_TIMEOUT_MS`  | `5000`                               |
//!
//! The data dir is platform specific:
//! - **macOS**: `~/Library/Application Support/com.papeleria.pos/`
//! - **Windows**: `%APPDATA%\papeleria\pos\data\`
//! - **Linux**: `~/.local/share/pos/`

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use papeleria_db::DbConfig;

const DB_PATH: &str = "PAPELERIA_DB_PATH";
const DB_MAX_CONNECTIONS: &str = "PAPELERIA_DB_MAX_CONNECTIONS";
const DB_BUSY_TIMEOUT_MS: &str = "PAPELERIA_DB_BUSY_TIMEOUT_MS";

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long a sale waits on a locked database
    pub busy_timeout: Duration,
}

impl RegisterConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(DB_PATH) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let max_connections: u32 = lookup(DB_MAX_CONNECTIONS)
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue(DB_MAX_CONNECTIONS.to_string()))?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(DB_MAX_CONNECTIONS.to_string()));
        }

        let busy_timeout_ms: u64 = lookup(DB_BUSY_TIMEOUT_MS)
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue(DB_BUSY_TIMEOUT_MS.to_string()))?;

        Ok(RegisterConfig {
            database_path,
            max_connections,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        })
    }

    /// Creates the directory holding the database file.
    pub fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .busy_timeout(self.busy_timeout)
    }
}

/// Platform data directory for the database file.
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("com", "papeleria", "pos").ok_or(ConfigError::NoDataDir)?;
    Ok(proj_dirs.data_dir().join("papeleria.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Could not create data directory: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let config = RegisterConfig::from_lookup(lookup(&[
            (DB_PATH, "/tmp/caja.db"),
            (DB_MAX_CONNECTIONS, "2"),
            (DB_BUSY_TIMEOUT_MS, "750"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/caja.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_millis(750));

        let db = config.db_config();
        assert_eq!(db.max_connections, 2);
        assert_eq!(db.busy_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_defaults() {
        let config = RegisterConfig::from_lookup(lookup(&[(DB_PATH, "caja.db")])).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = RegisterConfig::from_lookup(lookup(&[
            (DB_PATH, "caja.db"),
            (DB_MAX_CONNECTIONS, "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == DB_MAX_CONNECTIONS));

        let err = RegisterConfig::from_lookup(lookup(&[
            (DB_PATH, "caja.db"),
            (DB_MAX_CONNECTIONS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = RegisterConfig::from_lookup(lookup(&[
            (DB_PATH, "caja.db"),
            (DB_BUSY_TIMEOUT_MS, "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == DB_BUSY_TIMEOUT_MS));
    }
}
