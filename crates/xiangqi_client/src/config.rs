//! Client configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable that overrides [`ClientConfig::server_url`].
pub const SERVER_URL_ENV: &str = "XIANGQI_SERVER_URL";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "xiangqi_client.toml";

/// Settings for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game API (e.g. `http://localhost:8080/api/game`).
    #[serde(default = "default_server_url")]
    server_url: String,

    /// File the interactive client logs to.
    #[serde(default = "default_log_file")]
    log_file: String,

    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_server_url() -> String {
    "http://localhost:8080/api/game".to_string()
}

fn default_log_file() -> String {
    "xiangqi_client.log".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            log_file: default_log_file(),
            log_filter: default_log_filter(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise starts from defaults, then
    /// applies the [`SERVER_URL_ENV`] override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };
        Ok(config.with_env_override(std::env::var(SERVER_URL_ENV).ok()))
    }

    /// Replaces the server URL when `server_url` is present and non-empty.
    pub fn with_env_override(self, server_url: Option<String>) -> Self {
        match server_url {
            Some(url) if !url.trim().is_empty() => {
                debug!(server_url = %url, "Server URL overridden");
                Self {
                    server_url: url,
                    ..self
                }
            }
            _ => self,
        }
    }

    /// Returns a copy pointed at `server_url`.
    pub fn with_server_url(self, server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..self
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url(), "http://localhost:8080/api/game");
        assert_eq!(config.log_file(), "xiangqi_client.log");
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = \"http://example.test/api/game\"").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server_url(), "http://example.test/api/game");
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_missing_file_is_error_for_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = [").unwrap();
        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_env_override() {
        let config = ClientConfig::default().with_env_override(Some("http://other/api".into()));
        assert_eq!(config.server_url(), "http://other/api");

        let config = ClientConfig::default().with_env_override(Some("  ".into()));
        assert_eq!(config.server_url(), "http://localhost:8080/api/game");

        let config = ClientConfig::default().with_env_override(None);
        assert_eq!(config, ClientConfig::default());
    }
}
