//! Configuration management for the Taskly server

use crate::error::{Result, TasklyError};
use std::path::{Path, PathBuf};
use taskly_common::{get_default_database_path, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// Configuration for database access and the HTTP server
#[derive(Debug, Clone)]
pub struct TasklyConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Bind address for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
}

impl TasklyConfig {
    /// Create a configuration with a custom database path
    #[must_use]
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads `TASKLY_DATABASE_PATH`, `TASKLY_HOST`, and `TASKLY_PORT`,
    /// falling back to defaults for any variable that is unset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `TASKLY_PORT` is set but not a
    /// valid port number
    pub fn from_env() -> Result<Self> {
        let database_path = std::env::var("TASKLY_DATABASE_PATH")
            .map_or_else(|_| get_default_database_path(), PathBuf::from);

        let host =
            std::env::var("TASKLY_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());

        let port = match std::env::var("TASKLY_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                TasklyError::configuration(format!("TASKLY_PORT is not a valid port: {raw}"))
            })?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            database_path,
            host,
            port,
        })
    }

    /// Create configuration for testing with a temporary database
    ///
    /// # Errors
    ///
    /// Returns an IO error when the temporary file cannot be created
    pub fn for_testing() -> Result<Self> {
        use tempfile::NamedTempFile;
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file.path().to_path_buf();
        Ok(Self::new(db_path))
    }
}

impl Default for TasklyConfig {
    fn default() -> Self {
        Self::new(get_default_database_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_custom_path() {
        let config = TasklyConfig::new("/tmp/taskly-test.sqlite");
        assert_eq!(
            config.database_path,
            PathBuf::from("/tmp/taskly-test.sqlite")
        );
        assert_eq!(config.host, DEFAULT_SERVER_HOST);
        assert_eq!(config.port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_default_uses_default_path() {
        let config = TasklyConfig::default();
        assert!(config
            .database_path
            .to_string_lossy()
            .ends_with("taskly.sqlite"));
    }

    #[test]
    fn test_for_testing_creates_temp_path() {
        let config = TasklyConfig::for_testing().unwrap();
        assert!(!config.database_path.as_os_str().is_empty());
    }
}
