//! Configuration structures for the tradeprice system.

use crate::country::MAJOR_COUNTRIES;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API service key.
pub const API_KEY_ENV: &str = "TRADEPRICE_API_KEY";

/// Default trade statistics endpoint (Korea Customs Service, per-item trade).
pub const DEFAULT_ENDPOINT: &str = "http://apis.data.go.kr/1220000/nitemtrade/getNitemtradeList";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External API configuration.
    pub api: ApiConfig,
    /// Fetch and retry configuration.
    pub fetch: FetchConfig,
    /// Recommendation configuration.
    pub recommend: RecommendConfig,
}

impl Config {
    /// Parse a configuration from TOML text. Missing sections take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply secrets from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = key.trim().to_string();
            }
        }
    }

    /// Check that the configuration can be used for fetching.
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            return Err(Error::config("api.endpoint is empty"));
        }
        if self.api.api_key.trim().is_empty() {
            return Err(Error::config(format!(
                "api.api_key is empty (set it in the config file or {API_KEY_ENV})"
            )));
        }
        if self.fetch.max_attempts == 0 {
            return Err(Error::config("fetch.max_attempts must be at least 1"));
        }
        if self.recommend.countries.is_empty() {
            return Err(Error::config("recommend.countries is empty"));
        }
        Ok(())
    }
}

/// External API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint URL.
    pub endpoint: String,
    /// Static service key.
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

/// Fetch and retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per monthly request, including the first.
    pub max_attempts: u32,
    /// Pause between attempts (ms).
    pub retry_delay_ms: u64,
    /// Pause between consecutive monthly requests (ms).
    pub month_delay_ms: u64,
}

impl FetchConfig {
    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pause between attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Pause between months.
    pub fn month_delay(&self) -> Duration {
        Duration::from_millis(self.month_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 1000,
            month_delay_ms: 500,
        }
    }
}

/// Recommendation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Country codes to scan, in order.
    pub countries: Vec<String>,
    /// Minimum price advantage over the base country (percent).
    pub min_price_gap_pct: f64,
    /// Minimum total import weight for an alternative (kg, exclusive).
    pub min_total_quantity_kg: f64,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            countries: MAJOR_COUNTRIES.iter().map(|c| c.code.to_string()).collect(),
            min_price_gap_pct: 10.0,
            min_total_quantity_kg: 1000.0,
        }
    }
}
