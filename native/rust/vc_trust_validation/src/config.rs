// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config_io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config_parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config_invalid: {0}")]
    Invalid(String),
}

/// Timeouts and cache lifetimes of the trust validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrustValidationConfig {
    #[serde(default = "default_trust_list_fetch_timeout_ms")]
    pub trust_list_fetch_timeout_ms: u64,

    #[serde(default = "default_trust_list_cache_ttl_secs")]
    pub trust_list_cache_ttl_secs: u64,

    /// Refuse trust stores whose `NextUpdate` has passed.
    #[serde(default = "default_reject_stale_trust_lists")]
    pub reject_stale_trust_lists: bool,

    #[serde(default = "default_status_list_fetch_timeout_ms")]
    pub status_list_fetch_timeout_ms: u64,

    /// Cache lifetime of a status list that carries neither `exp` nor `ttl`.
    #[serde(default = "default_status_list_default_ttl_secs")]
    pub status_list_default_ttl_secs: u64,
}

fn default_trust_list_fetch_timeout_ms() -> u64 {
    4_000
}

fn default_trust_list_cache_ttl_secs() -> u64 {
    300
}

fn default_reject_stale_trust_lists() -> bool {
    true
}

fn default_status_list_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_status_list_default_ttl_secs() -> u64 {
    300
}

impl Default for TrustValidationConfig {
    fn default() -> Self {
        Self {
            trust_list_fetch_timeout_ms: default_trust_list_fetch_timeout_ms(),
            trust_list_cache_ttl_secs: default_trust_list_cache_ttl_secs(),
            reject_stale_trust_lists: default_reject_stale_trust_lists(),
            status_list_fetch_timeout_ms: default_status_list_fetch_timeout_ms(),
            status_list_default_ttl_secs: default_status_list_default_ttl_secs(),
        }
    }
}

impl TrustValidationConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TrustValidationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trust_list_fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid("trust_list_fetch_timeout_ms must be > 0".into()));
        }
        if self.status_list_fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid("status_list_fetch_timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn trust_list_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.trust_list_fetch_timeout_ms)
    }

    pub fn trust_list_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.trust_list_cache_ttl_secs)
    }

    pub fn status_list_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.status_list_fetch_timeout_ms)
    }

    pub fn status_list_default_ttl(&self) -> Duration {
        Duration::from_secs(self.status_list_default_ttl_secs)
    }
}
