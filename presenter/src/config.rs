//! Presenter configuration.
//!
//! Values come from the application; `from_env` is a convenience for the
//! demo binary and for deployments that configure through the environment.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable read by [`PresenterConfig::from_env`]
pub const STATUS_SYNC_ENV: &str = "TODOBOARD_STATUS_SYNC";

/// What the presenter does to its own state once a status update succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSync {
    /// Leave state untouched; it stays stale until the section is refreshed
    None,
    /// Re-fetch the section that holds the todo
    #[default]
    Refetch,
    /// Flip the todo locally as soon as the change is requested
    Optimistic,
}

impl FromStr for StatusSync {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "refetch" => Ok(Self::Refetch),
            "optimistic" => Ok(Self::Optimistic),
            other => Err(ConfigError::InvalidStatusSync(other.to_string())),
        }
    }
}

impl std::fmt::Display for StatusSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Refetch => "refetch",
            Self::Optimistic => "optimistic",
        };
        f.write_str(name)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unrecognized status sync policy
    #[error("invalid status sync policy {0:?} (expected none, refetch or optimistic)")]
    InvalidStatusSync(String),
}

/// Presenter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenterConfig {
    /// Policy applied after a successful status update.
    ///
    /// Default: [`StatusSync::Refetch`]
    pub status_sync: StatusSync,
}

impl PresenterConfig {
    /// Create a configuration with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status_sync: StatusSync::Refetch,
        }
    }

    /// Set the status sync policy.
    #[must_use]
    pub const fn with_status_sync(mut self, status_sync: StatusSync) -> Self {
        self.status_sync = status_sync;
        self
    }

    /// Build a configuration from `TODOBOARD_STATUS_SYNC`, falling back to
    /// defaults when it is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStatusSync`] if the variable is set to
    /// an unknown policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        if let Some(raw) = lookup(STATUS_SYNC_ENV) {
            config.status_sync = raw.parse()?;
        }
        Ok(config)
    }
}
