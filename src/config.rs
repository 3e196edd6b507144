//! Configuration loading and persistence.
//!
//! Handles reading and writing the citywatch configuration file, with
//! environment variable overrides for scripted and CI use. Credentials do
//! not live here -- see [`crate::session`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::constants;

/// Configuration for the citywatch CLI.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// Base URL of the civic backend (REST under `/api`, push under `/ws`).
    pub server_url: String,
    /// Base URL of the public postal-code lookup API.
    pub postal_api_url: String,
    /// Base URL of the public map-data (Overpass) API.
    pub overpass_api_url: String,
    /// Seconds between push-channel reconnection attempts.
    pub reconnect_delay_secs: u64,
    /// Search radius for the local-services finder, in meters.
    pub services_radius_m: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            postal_api_url: "https://api.postalpincode.in".to_string(),
            overpass_api_url: "https://overpass-api.de".to_string(),
            reconnect_delay_secs: constants::RECONNECT_DELAY.as_secs(),
            services_radius_m: constants::SERVICES_RADIUS_M,
        }
    }
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `CITYWATCH_CONFIG_DIR` env var: explicit override (tests, CI)
    /// 2. Default: platform config dir (e.g. `~/.config/citywatch`)
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(explicit) = std::env::var("CITYWATCH_CONFIG_DIR") {
            PathBuf::from(explicit)
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("citywatch")
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    ///
    /// A missing or unreadable config file falls back to defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file().unwrap_or_else(|_| Self::default());
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            anyhow::bail!("Config file not found")
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(server_url) = std::env::var("CITYWATCH_SERVER_URL") {
            self.server_url = server_url;
        }

        if let Ok(postal) = std::env::var("CITYWATCH_POSTAL_API_URL") {
            self.postal_api_url = postal;
        }

        if let Ok(overpass) = std::env::var("CITYWATCH_OVERPASS_API_URL") {
            self.overpass_api_url = overpass;
        }

        if let Ok(delay) = std::env::var("CITYWATCH_RECONNECT_DELAY") {
            if let Ok(secs) = delay.parse::<u64>() {
                self.reconnect_delay_secs = secs;
            }
        }

        if let Ok(radius) = std::env::var("CITYWATCH_SERVICES_RADIUS") {
            if let Ok(meters) = radius.parse::<u32>() {
                self.services_radius_m = meters;
            }
        }
    }

    /// Persists the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_dir()?.join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// WebSocket URL for the push channel, derived from the server URL.
    #[must_use]
    pub fn ws_url(&self) -> String {
        let base = self
            .server_url
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        format!("{}{}", base, constants::WS_PATH)
    }
}
