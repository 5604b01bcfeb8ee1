use crate::error::{ApiError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};

pub const API_URL_ENV: &str = "TASKDECK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the tracking API, including the `/api` suffix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Resolve configuration: explicit value → `TASKDECK_API_URL` env →
    /// config file → compiled default. A malformed config file is an
    /// error, not a silent fallback.
    pub fn load(explicit_api_url: Option<&str>) -> Result<Self> {
        let mut config = Self::from_file()?.unwrap_or_default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Some(url) = explicit_api_url {
            config.api_url = url.to_string();
        }

        config.api_url = config.api_url.trim_end_matches('/').to_string();
        if config.api_url.is_empty() {
            return Err(ApiError::Config("api_url is empty".to_string()));
        }
        Ok(config)
    }

    fn from_file() -> Result<Option<Self>> {
        let Some(path) = paths::config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(Some(serde_yaml::from_str(&data)?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
