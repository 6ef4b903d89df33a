//! Configuration module for sdpos-server.
//!
//! Handles loading configuration from an optional TOML file, CLI arguments,
//! and the `SAME_DAY_SOLUTIONS_*` environment variables.

pub mod file;

use crate::config::file::FileConfig;
use sdpos_sdk::config::{
    API_KEY_ENV, API_SECRET_ENV, API_URL_ENV, CredentialsError, PartnerCredentials,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid partner configuration: {0}")]
    Credentials(#[from] CredentialsError),
}

/// Loaded configuration result containing all parts.
#[derive(Debug)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub credentials: PartnerCredentials,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load the configuration using the process environment.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Load the configuration, resolving environment variables through `env`.
    ///
    /// This will:
    /// 1. Read the TOML file if it exists
    /// 2. Apply CLI overrides
    /// 3. Let non-empty environment variables override the partner section
    /// 4. Build the partner credentials
    pub fn load_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let file_config = if self.config_path.exists() {
            let content = std::fs::read_to_string(&self.config_path)?;
            toml::from_str::<FileConfig>(&content)?
        } else {
            tracing::warn!(
                path = ?self.config_path,
                "Config file not found, using defaults and environment"
            );
            FileConfig::default()
        };

        let listen = self.listen_override.unwrap_or(file_config.server.listen);

        let pick = |name: &str, file_value: Option<String>| {
            env(name).filter(|v| !v.is_empty()).or(file_value)
        };
        let partner = file_config.partner;
        let credentials = PartnerCredentials::from_values(
            pick(API_URL_ENV, partner.api_base_url),
            pick(API_KEY_ENV, partner.api_key),
            pick(API_SECRET_ENV, partner.api_secret),
        )?;

        if !credentials.is_configured() {
            tracing::warn!(
                "Partner API credentials not configured; only the health check will work"
            );
        }

        Ok(LoadedConfig {
            listen,
            credentials,
        })
    }
}
