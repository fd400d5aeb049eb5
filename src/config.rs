//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section has defaults, so an empty file (or none at all) is a working
//! setup that falls back to the bundled catalog.
//! Provider credentials are referenced by env-var name in the config and
//! resolved at runtime.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::wheel::resolver::SpinTier;
use crate::wheel::DEFAULT_HISTORY_LEN;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub wheel: WheelConfig,
    pub providers: ProvidersConfig,
    pub session: SessionConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WheelConfig {
    pub cuisine_tier: SpinTier,
    pub restaurant_tier: SpinTier,
    pub dish_tier: SpinTier,
    /// Past winners kept per wheel.
    pub history_len: usize,
    /// Multiplier on real-time animation waits. 0 resolves spins at once.
    pub animation_pace: f64,
    /// Fixed RNG seed for reproducible sessions. OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            cuisine_tier: SpinTier::Standard,
            restaurant_tier: SpinTier::Standard,
            dish_tier: SpinTier::Grand,
            history_len: DEFAULT_HISTORY_LEN,
            animation_pace: 1.0,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Env var holding the Google Places key.
    pub google_api_key_env: Option<String>,
    /// Env var holding the Yelp Fusion key.
    pub yelp_api_key_env: Option<String>,
    /// Override for the Google host (tests, proxies).
    pub google_base_url: Option<String>,
    pub yelp_base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            google_api_key_env: Some("GOOGLE_MAPS_API_KEY".to_string()),
            yelp_api_key_env: Some("YELP_API_KEY".to_string()),
            google_base_url: None,
            yelp_base_url: None,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// City searched when the user has not shared a location.
    pub default_city: String,
    pub dish_count: usize,
    /// Snapshot file. Persistence is off when unset.
    pub state_file: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_city: "New York".to_string(),
            dish_count: crate::cuisine::DEFAULT_DISH_COUNT,
            state_file: Some(crate::storage::DEFAULT_STATE_FILE.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.wheel.animation_pace.is_finite() || self.wheel.animation_pace < 0.0 {
            anyhow::bail!(
                "wheel.animation_pace must be a non-negative number, got {}",
                self.wheel.animation_pace
            );
        }
        if self.wheel.history_len == 0 {
            anyhow::bail!("wheel.history_len must be at least 1");
        }
        if self.session.default_city.trim().is_empty() {
            anyhow::bail!("session.default_city must not be empty");
        }
        Ok(())
    }

}
