//! Bridge configuration

use scratchcraft_core::{BridgeError, Result};
use std::time::Duration;

/// Environment variable overriding the game server address
pub const ADDRESS_ENV: &str = "SCRATCHCRAFT_ADDRESS";
/// Environment variable overriding the poll period in milliseconds
pub const POLL_MS_ENV: &str = "SCRATCHCRAFT_POLL_MS";
/// Environment variable overriding the command acknowledgment delay in milliseconds
pub const ACK_MS_ENV: &str = "SCRATCHCRAFT_ACK_MS";

/// Configuration for the ScratchCraft bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Game server base address, without trailing slash
    pub base_address: String,
    /// Period of the `/poll` fetch
    pub poll_interval: Duration,
    /// Time after which a dispatched command reports completion
    pub command_ack_delay: Duration,
    /// Upper bound on a single request
    pub request_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_address: "http://127.0.0.1:8088".to_string(),
            poll_interval: Duration::from_millis(500),
            command_ack_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl BridgeConfig {
    /// Create config for a custom server address
    pub fn with_address(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            base_address: address.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Create config from `SCRATCHCRAFT_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(ADDRESS_ENV) {
            Some(address) if !address.trim().is_empty() => Self::with_address(address.trim()),
            _ => Self::default(),
        };

        if let Some(ms) = lookup(POLL_MS_ENV) {
            config.poll_interval = parse_millis(POLL_MS_ENV, &ms)?;
        }
        if let Some(ms) = lookup(ACK_MS_ENV) {
            config.command_ack_delay = parse_millis(ACK_MS_ENV, &ms)?;
        }

        Ok(config)
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(BridgeError::Config(format!("{} must be greater than zero", key))),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(e) => Err(BridgeError::Config(format!(
            "{}={:?} is not a number of milliseconds: {}",
            key, value, e
        ))),
    }
}
