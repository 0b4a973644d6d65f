//! Application configuration
//!
//! YAML file with CLI/environment overrides. Credentials are
//! configuration, never source literals: the API key comes from the
//! `SITEWARDEN_API_KEY` environment variable or the config file, in
//! that order.

use serde::{Deserialize, Serialize};
use sitewarden_gateway::gemini::DEFAULT_ENDPOINT;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable consulted for the cloud API key
pub const API_KEY_ENV: &str = "SITEWARDEN_API_KEY";

/// CLI application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cloud API key (prefer the environment variable)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Cloud generation endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Host channel round-trip timeout in seconds
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_secs: u64,

    /// Settings file location (defaults to the user config directory)
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from file, or use defaults when the file
    /// does not exist.
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        let config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            debug!(path = config_path, "no config file, using defaults");
            Self::default()
        };

        Ok(config)
    }

    /// Resolve the API key: environment first, then config file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Where the settings store lives
    pub fn settings_path(&self) -> PathBuf {
        if let Some(path) = &self.settings_path {
            return path.clone();
        }

        dirs::config_dir()
            .map(|dir| dir.join("sitewarden").join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("sitewarden-settings.json"))
    }

    /// HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Host channel timeout
    pub fn channel_timeout(&self) -> Duration {
        Duration::from_secs(self.channel_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            channel_timeout_secs: default_channel_timeout(),
            settings_path: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_channel_timeout() -> u64 {
    60
}
