//! Geolocation provider configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Geolocation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Provider identifier, matched case-insensitively (e.g. "ipstack")
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API key passed to the provider's lookup endpoint
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the lookup endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound on a single lookup, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "ipstack".to_string()
}

fn default_base_url() -> String {
    "http://api.ipstack.com".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
