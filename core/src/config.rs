//! Client configuration.
//!
//! Resolution order (highest first):
//! 1. `TASKIE_TIMEOUT_SECS`, `TASKIE_HTTP_LOG`
//! 2. TOML file, when the caller loads one
//! 3. Compiled defaults
//!
//! The backend origin is always [`BASE_URL`]. Only code constructing a
//! `ClientConfig` directly, such as tests against a local server, can
//! point it elsewhere.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::interceptor::HttpLogLevel;

/// Origin of the hosted Taskie backend.
pub const BASE_URL: &str = "https://taskie-rw.herokuapp.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when loading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// Settings for building a `RemoteApi`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(skip)]
    pub base_url: String,
    pub timeout_secs: u64,
    pub http_log: HttpLogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            http_log: HttpLogLevel::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply `TASKIE_*` overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `TASKIE_*` overrides from `lookup`. Values that do not parse
    /// are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(secs) = lookup("TASKIE_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(level) = lookup("TASKIE_HTTP_LOG").and_then(|s| s.parse().ok()) {
            self.http_log = level;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
