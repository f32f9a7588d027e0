//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the backend URL, request timeout, whether the offline cache is enabled,
//! and the "remember me" login preferences.
//!
//! Configuration is stored at `~/.config/tourbook/config.json`. The
//! `TOURBOOK_API_URL` and `TOURBOOK_DATA_DIR` environment variables
//! override the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::store::StoreLocation;

/// Application name used for config/data directory paths
const APP_NAME: &str = "tourbook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_URL: &str = "TOURBOOK_API_URL";
const ENV_DATA_DIR: &str = "TOURBOOK_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Keep an on-device copy of the tour catalog.
    pub offline_cache: bool,
    pub remember_me: bool,
    pub last_email: Option<String>,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            offline_cache: true,
            remember_me: false,
            last_email: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load from disk (defaults if absent), then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Directory for the tour database and session file, if the platform has one
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_NAME)))
    }

    /// Where the offline tour cache lives; unavailable when disabled.
    pub fn store_location(&self) -> StoreLocation {
        if !self.offline_cache {
            return StoreLocation::Unavailable;
        }
        StoreLocation::in_dir(self.data_dir())
    }

    /// Remember (or forget) the email used for the last login
    pub fn remember_login(&mut self, email: &str, remember: bool) {
        self.remember_me = remember;
        self.last_email = if remember { Some(email.to_string()) } else { None };
    }

    pub fn forget_login(&mut self) {
        self.remember_me = false;
        self.last_email = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DB_FILE;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "remember_me": true }"#).unwrap();
        assert!(config.remember_me);
        assert!(config.offline_cache);
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_store_location() {
        let mut config = Config {
            data_dir: Some(PathBuf::from("/tmp/tourbook-test")),
            ..Config::default()
        };
        assert_eq!(
            config.store_location(),
            StoreLocation::File(PathBuf::from("/tmp/tourbook-test").join(DB_FILE))
        );

        config.offline_cache = false;
        assert_eq!(config.store_location(), StoreLocation::Unavailable);
    }

    #[test]
    fn test_remember_login() {
        let mut config = Config::default();
        config.remember_login("a@example.com", true);
        assert_eq!(config.last_email.as_deref(), Some("a@example.com"));

        config.remember_login("a@example.com", false);
        assert!(!config.remember_me);
        assert!(config.last_email.is_none());
    }
}
