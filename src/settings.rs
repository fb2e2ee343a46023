//! User settings.
//!
//! Settings live in `<config dir>/countryboard/settings.json`. Every field is
//! optional in the file; missing fields and a missing file fall back to the
//! defaults. Environment variables override the file.

use crate::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, MIRROR_ENDPOINT,
};
use crate::data::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_ENDPOINT: &str = "COUNTRYBOARD_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "COUNTRYBOARD_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "COUNTRYBOARD_MAX_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "COUNTRYBOARD_RETRY_DELAY_MS";

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL returning the JSON array of countries
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Total attempts for transient failures
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: MIRROR_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match default_settings_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Load from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let settings = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<Settings>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "settings: no file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_override(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_ATTEMPTS) {
            self.max_attempts = parse_override(ENV_MAX_ATTEMPTS, &value)?;
        }
        if let Some(value) = lookup(ENV_RETRY_DELAY_MS) {
            self.retry_delay_ms = parse_override(ENV_RETRY_DELAY_MS, &value)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.timeout_secs == 0 {
            return Err(SettingsError::InvalidValue {
                key: "timeout_secs",
                value: self.timeout_secs.to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(SettingsError::InvalidValue {
                key: "max_attempts",
                value: self.max_attempts.to_string(),
            });
        }
        if self.endpoint.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "endpoint",
                value: self.endpoint.clone(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

fn parse_override<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Default settings file location
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("countryboard").join("settings.json"))
}
