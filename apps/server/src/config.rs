//! Server configuration sourced from environment variables.
//!
//! All variables are optional; the defaults run a self-contained server on
//! the simulated provider. A `.env` file is honored when present.

use quotecast_core::constants::{DEFAULT_DIRECTORY_CHUNK_SIZE, DEFAULT_REFRESH_CHUNK_SIZE};
use quotecast_market_data::Interval;

/// Seconds between scheduled refresh cycles unless overridden.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (`QUOTECAST_LISTEN_ADDR`).
    pub listen_addr: String,
    /// Serve quotes from the built-in random walk instead of the HTTP
    /// provider (`QUOTECAST_USE_SIMULATED_PROVIDER`, default true).
    pub use_simulated_provider: bool,
    /// Timestamp step for the simulated provider
    /// (`QUOTECAST_SIMULATED_INTERVAL`, one of the interval labels).
    pub simulated_interval: Interval,
    /// Base URL of the IEX-compatible API (`QUOTECAST_IEX_BASE_URL`).
    pub iex_base_url: Option<String>,
    /// API token for the IEX-compatible API (`QUOTECAST_IEX_TOKEN`).
    /// Required when the simulated provider is disabled.
    pub iex_token: Option<String>,
    /// Symbols refreshed concurrently per chunk
    /// (`QUOTECAST_REFRESH_CHUNK_SIZE`).
    pub refresh_chunk_size: usize,
    /// Directory rows written per batch (`QUOTECAST_DIRECTORY_CHUNK_SIZE`).
    pub directory_chunk_size: usize,
    /// Seconds between scheduled refresh cycles
    /// (`QUOTECAST_REFRESH_INTERVAL_SECS`).
    pub refresh_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            listen_addr: env_or("QUOTECAST_LISTEN_ADDR", "0.0.0.0:8080"),
            use_simulated_provider: env_flag("QUOTECAST_USE_SIMULATED_PROVIDER", true),
            simulated_interval: std::env::var("QUOTECAST_SIMULATED_INTERVAL")
                .map(|label| Interval::from(label.as_str()))
                .unwrap_or_default(),
            iex_base_url: std::env::var("QUOTECAST_IEX_BASE_URL").ok(),
            iex_token: std::env::var("QUOTECAST_IEX_TOKEN").ok(),
            refresh_chunk_size: env_parse("QUOTECAST_REFRESH_CHUNK_SIZE", DEFAULT_REFRESH_CHUNK_SIZE),
            directory_chunk_size: env_parse(
                "QUOTECAST_DIRECTORY_CHUNK_SIZE",
                DEFAULT_DIRECTORY_CHUNK_SIZE,
            ),
            refresh_interval_secs: env_parse(
                "QUOTECAST_REFRESH_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL_SECS,
            ),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
        Err(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
