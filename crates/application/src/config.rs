//! Token lifecycle configuration, read from a `config.yaml` file.

use std::fs::File;
use std::path::Path;

use domain::validator::{DEFAULT_REQUIRED_CLAIMS, PayloadValidator};
use serde::Deserialize;

use crate::error::{ApplicationError, Result};

/// Represents the configuration structure expected from the
/// 'config.yaml' file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Issuer set on minted tokens.
    pub issuer: String,
    /// Access token time-to-live, in minutes.
    #[serde(default = "default_ttl")]
    pub ttl: u64,
    /// Window during which an issued token may still be refreshed,
    /// in minutes.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl: u64,
    /// Whether decoded tokens are checked against the blacklist.
    #[serde(default = "default_blacklist_enabled")]
    pub blacklist_enabled: bool,
    /// Claims that must be present on every payload.
    #[serde(default = "default_required_claims")]
    pub required_claims: Vec<String>,
    /// Tolerance applied to temporal checks, in seconds.
    #[serde(default)]
    pub leeway: u64,
}

fn default_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    20_160 // 2 weeks.
}

fn default_blacklist_enabled() -> bool {
    true
}

fn default_required_claims() -> Vec<String> {
    DEFAULT_REQUIRED_CLAIMS
        .iter()
        .map(|name| (*name).to_owned())
        .collect()
}

impl Config {
    /// Create a configuration with default values for the issuer.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ttl: default_ttl(),
            refresh_ttl: default_refresh_ttl(),
            blacklist_enabled: default_blacklist_enabled(),
            required_claims: default_required_claims(),
            leeway: 0,
        }
    }

    /// Reads the configuration file and returns the parsed
    /// configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path).map_err(|err| {
            ApplicationError::configuration(format!(
                "failed to open configuration file: {err}"
            ))
        })?;

        serde_yaml::from_reader(file).map_err(|err| {
            ApplicationError::configuration(format!(
                "failed to deserialize configuration: {err}"
            ))
        })
    }

    /// Build the payload validator described by this configuration.
    pub fn validator(&self) -> PayloadValidator {
        PayloadValidator::new(self.refresh_ttl * 60)
            .with_required_claims(self.required_claims.clone())
            .with_leeway(self.leeway)
    }
}
