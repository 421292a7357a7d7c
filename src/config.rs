use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API, including the version prefix.
    pub api_base_url: String,

    /// Fixed timeout applied to every request; calls that exceed it fail
    /// with the network-failure message.
    pub request_timeout: Duration,

    /// Directory the credential entries are persisted under.
    pub credentials_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: env_or_default("FORUM_API_BASE_URL", "http://localhost:8000/api/v1"),
            request_timeout: Duration::from_secs(parse_env_u64("FORUM_REQUEST_TIMEOUT_SECS", 10)?),
            credentials_dir: PathBuf::from(env_or_default(
                "FORUM_CREDENTIALS_DIR",
                "./data/credentials",
            )),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "FORUM_API_BASE_URL".to_string(),
                message: format!("not a valid URL: '{}'", self.api_base_url),
            });
        }
        if self.api_base_url.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                name: "FORUM_API_BASE_URL".to_string(),
                message: "must not end with a trailing slash".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "FORUM_REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration for tests: short timeout, throwaway credential dir.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            request_timeout: Duration::from_secs(5),
            credentials_dir: std::env::temp_dir().join("motoforum-client-test"),
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("FORUM_API_BASE_URL");
        std::env::remove_var("FORUM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("FORUM_CREDENTIALS_DIR");

        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("FORUM_API_BASE_URL", "https://forum.example.com/api/v2");
        std::env::set_var("FORUM_REQUEST_TIMEOUT_SECS", "30");

        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "https://forum.example.com/api/v2");
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        std::env::remove_var("FORUM_API_BASE_URL");
        std::env::remove_var("FORUM_REQUEST_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_timeout() {
        std::env::set_var("FORUM_REQUEST_TIMEOUT_SECS", "soon");
        assert!(Config::from_env().is_err());
        std::env::remove_var("FORUM_REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_trailing_slash() {
        let config = Config {
            api_base_url: "http://localhost:8000/api/v1/".to_string(),
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::for_testing().validate().is_ok());
    }
}
