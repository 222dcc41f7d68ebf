//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `KEEBCRAFT_CATALOG_URL` - Base URL of the remote catalog store
//!   (default: `http://localhost:8080/keyboards`)
//! - `KEEBCRAFT_USER_URL` - Base URL of the remote user store
//!   (default: `http://localhost:8080/user`)
//! - `KEEBCRAFT_SESSION_FILE` - Path for the persistent session store;
//!   when unset the session lives in memory only
//! - `KEEBCRAFT_SEARCH_DEBOUNCE_MS` - Search debounce window (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "http://localhost:8080/keyboards";
const DEFAULT_USER_URL: &str = "http://localhost:8080/user";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote catalog store.
    pub catalog_url: Url,
    /// Base URL of the remote user store.
    pub user_url: Url,
    /// Session persistence path; `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,
    /// Input-silence window before a search fragment is considered.
    pub search_debounce: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url = get_url("KEEBCRAFT_CATALOG_URL", DEFAULT_CATALOG_URL)?;
        let user_url = get_url("KEEBCRAFT_USER_URL", DEFAULT_USER_URL)?;
        let session_file = std::env::var("KEEBCRAFT_SESSION_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let debounce_ms = match std::env::var("KEEBCRAFT_SEARCH_DEBOUNCE_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("KEEBCRAFT_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_SEARCH_DEBOUNCE_MS,
        };

        Ok(Self {
            catalog_url,
            user_url,
            session_file,
            search_debounce: Duration::from_millis(debounce_ms),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // The defaults are compile-time constants and always parse.
            #[allow(clippy::unwrap_used)]
            catalog_url: Url::parse(DEFAULT_CATALOG_URL).unwrap(),
            #[allow(clippy::unwrap_used)]
            user_url: Url::parse(DEFAULT_USER_URL).unwrap(),
            session_file: None,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

fn get_url(name: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(unsafe_code)] // env::set_var is unsafe in edition 2024
mod tests {
    use super::*;

    // Environment variables are process-global, so the env-dependent cases
    // run inside one test to avoid races with parallel tests.
    #[test]
    fn test_from_env_defaults_and_overrides() {
        unsafe {
            std::env::remove_var("KEEBCRAFT_CATALOG_URL");
            std::env::remove_var("KEEBCRAFT_USER_URL");
            std::env::remove_var("KEEBCRAFT_SESSION_FILE");
            std::env::remove_var("KEEBCRAFT_SEARCH_DEBOUNCE_MS");
        }
        let config = Config::from_env().expect("defaults load");
        assert_eq!(config.catalog_url.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(config.user_url.as_str(), DEFAULT_USER_URL);
        assert!(config.session_file.is_none());
        assert_eq!(config.search_debounce, Duration::from_millis(300));

        unsafe {
            std::env::set_var("KEEBCRAFT_SEARCH_DEBOUNCE_MS", "150");
        }
        let config = Config::from_env().expect("override loads");
        assert_eq!(config.search_debounce, Duration::from_millis(150));

        unsafe {
            std::env::set_var("KEEBCRAFT_CATALOG_URL", "not a url");
        }
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "KEEBCRAFT_CATALOG_URL"
        ));

        unsafe {
            std::env::remove_var("KEEBCRAFT_CATALOG_URL");
            std::env::remove_var("KEEBCRAFT_SEARCH_DEBOUNCE_MS");
        }
    }

    #[test]
    fn test_default_matches_env_defaults() {
        let config = Config::default();
        assert_eq!(config.catalog_url.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(config.user_url.as_str(), DEFAULT_USER_URL);
    }
}
