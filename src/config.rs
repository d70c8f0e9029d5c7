// src/config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::time::Duration;

use crate::services::yahoo::{DEFAULT_COOKIE_URL, DEFAULT_QUERY_URL};

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// `None` when `PROVIDER_TIMEOUT_SECS=0`.
    pub provider_timeout: Option<Duration>,
    pub yahoo_query_url: String,
    pub yahoo_cookie_url: String,
}

impl Config {
    /// Read `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let timeout_secs = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("PROVIDER_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
            })?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };
        let provider_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let config = Config {
            port,
            provider_timeout,
            yahoo_query_url: lookup("YAHOO_QUERY_URL").unwrap_or_else(|| DEFAULT_QUERY_URL.to_string()),
            yahoo_cookie_url: lookup("YAHOO_COOKIE_URL")
                .unwrap_or_else(|| DEFAULT_COOKIE_URL.to_string()),
        };
        info!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
