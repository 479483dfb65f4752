//! Configuration module for environment variable parsing.
//!
//! Process-level knobs (port, store paths, timeouts) come from the
//! environment. Domain settings (API key, list IDs, sender identity) live in
//! the persisted settings store and are managed through the admin endpoint.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Timeout for outbound Sendy API calls
    pub sendy_timeout: Duration,

    /// Path of the persisted settings blob
    pub settings_path: PathBuf,

    /// Path of the persisted post → campaign ID map
    pub campaigns_path: PathBuf,

    /// Token required on admin routes; admin routes stay off without one
    pub admin_token: Option<String>,

    /// Cooldown between tip submissions from one address
    pub tip_rate_limit: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            sendy_timeout: Duration::from_millis(
                env::var("SENDY_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30_000),
            ),

            settings_path: env::var("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/settings.json")),

            campaigns_path: env::var("CAMPAIGNS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/campaigns.json")),

            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),

            tip_rate_limit: Duration::from_secs(
                env::var("TIP_RATE_LIMIT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}
