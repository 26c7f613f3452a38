use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no targets configured")]
    NoTargets,
    #[error("target name must not be empty")]
    EmptyName,
    #[error("duplicate target name: {0}")]
    DuplicateTarget(String),
    #[error("invalid url for target '{name}': {reason}")]
    InvalidUrl { name: String, reason: String },
    #[error("invalid monitoring option: {0}")]
    InvalidOption(&'static str),
}

/// A single monitored endpoint, as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub url: String,
}

/// Timing options for the monitoring engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringOptions {
    /// Seconds between scheduler ticks for each target.
    pub check_interval_seconds: u64,
    /// Upper bound for a single probe.
    pub timeout_seconds: u64,
    /// Age after which history entries become eligible for eviction.
    pub history_retention_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub targets: Vec<TargetConfig>,
    pub monitoring: MonitoringOptions,
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// Any failure here is fatal: the process must not start monitoring with
    /// an invalid target set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let mut seen = std::collections::HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if !seen.insert(target.name.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.name.clone()));
            }
            validate_url(&target.name, &target.url)?;
        }

        if self.monitoring.check_interval_seconds == 0 {
            return Err(ConfigError::InvalidOption("check_interval_seconds must be positive"));
        }
        if self.monitoring.timeout_seconds == 0 {
            return Err(ConfigError::InvalidOption("timeout_seconds must be positive"));
        }
        if self.monitoring.history_retention_hours == 0 {
            return Err(ConfigError::InvalidOption("history_retention_hours must be positive"));
        }

        Ok(())
    }
}

/// Validate URL format and scheme
fn validate_url(name: &str, url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            name: name.to_string(),
            reason: format!("unsupported scheme: {other}"),
        }),
    }
}
