//! Counter configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `COUNTER_HOST` - Bind address (default: 127.0.0.1)
//! - `COUNTER_PORT` - Listen port (default: 3000)
//! - `COUNTER_DATA_FILE` - Path to the JSON order document; when unset the
//!   store is in-memory and resets on restart
//! - `PAYMENT_WINDOW_MINS` - Minutes before an unpaid order auto-cancels
//!   (default: 10)
//! - `SWEEP_INTERVAL_SECS` - Expiry sweep cadence (default: 30)
//! - `SUBMIT_MIN_LATENCY_MS` - Artificial minimum submit latency so the UI
//!   can show a busy state; 0 disables it (default: 400)
//! - `STAFF_PIN` - Shared PIN for the staff board. A UI nicety, not a trust
//!   boundary; unset means no PIN check

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Counter service configuration.
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON order document path; `None` means in-memory store
    pub data_file: Option<PathBuf>,
    /// How long an unpaid order stays alive
    pub payment_window: Duration,
    /// Expiry sweep cadence
    pub sweep_interval: Duration,
    /// Artificial minimum latency on order submission
    pub submit_min_latency: Duration,
    /// Staff board PIN (redacted in Debug output)
    pub staff_pin: Option<SecretString>,
}

impl CounterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("COUNTER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("COUNTER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("COUNTER_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("COUNTER_PORT".to_string(), e.to_string()))?;
        let data_file = get_optional_env("COUNTER_DATA_FILE").map(PathBuf::from);

        let payment_window_mins = parse_env_or_default("PAYMENT_WINDOW_MINS", 10)?;
        let sweep_interval_secs = parse_env_or_default("SWEEP_INTERVAL_SECS", 30)?;
        let submit_min_latency_ms = parse_env_or_default("SUBMIT_MIN_LATENCY_MS", 400)?;

        let staff_pin = get_optional_env("STAFF_PIN").map(SecretString::from);

        Ok(Self {
            host,
            port,
            data_file,
            payment_window: Duration::from_secs(payment_window_mins * 60),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            submit_min_latency: Duration::from_millis(submit_min_latency_ms),
            staff_pin,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_file: None,
            payment_window: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(30),
            submit_min_latency: Duration::from_millis(400),
            staff_pin: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric environment variable, falling back to a default when
/// unset.
fn parse_env_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
