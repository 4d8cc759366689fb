//! Engine timing and retry configuration.
//!
//! Defaults are tuned for an interactively rendered feed: a short polling
//! interval for the detail-ready wait, settle delays that absorb trailing
//! DOM mutations, and a small stall budget before a run is declared dead.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Timing and stall parameters for a traversal run.
///
/// All durations are stored as [`Duration`]; env overrides are expressed
/// in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Polling interval of the detail-ready detector.
    pub poll_interval: Duration,
    /// Wall-clock bound on one detail-ready wait.
    pub detail_timeout: Duration,
    /// Delay after a successful wait, absorbing trailing mutations.
    pub settle_delay: Duration,
    /// Delay between consecutive card scrapes.
    pub entry_delay: Duration,
    /// Delay after a scroll before re-counting visible entries.
    pub scroll_settle: Duration,
    /// Consecutive no-progress scroll cycles tolerated before the run
    /// terminates as stalled.
    pub max_scroll_failures: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            detail_timeout: Duration::from_millis(5000),
            settle_delay: Duration::from_millis(400),
            entry_delay: Duration::from_millis(500),
            scroll_settle: Duration::from_millis(1200),
            max_scroll_failures: 3,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from environment variables, after loading
    /// any `.env` file in scope. Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a set variable does not
    /// parse as an unsigned integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Builds the configuration from the provided env-var lookup function.
    ///
    /// Decoupled from the process environment so tests can drive it with a
    /// plain map lookup — no `set_var`/`remove_var` needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a present value fails to
    /// parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let defaults = Self::default();

        let parse_ms = |var: &str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(var) {
                Err(_) => Ok(default),
                Ok(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::InvalidEnvVar {
                        var: var.to_owned(),
                        reason: e.to_string(),
                    }),
            }
        };

        let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
            match lookup(var) {
                Err(_) => Ok(default),
                Ok(raw) => raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_owned(),
                    reason: e.to_string(),
                }),
            }
        };

        Ok(Self {
            poll_interval: parse_ms("PLACEFEED_POLL_INTERVAL_MS", defaults.poll_interval)?,
            detail_timeout: parse_ms("PLACEFEED_DETAIL_TIMEOUT_MS", defaults.detail_timeout)?,
            settle_delay: parse_ms("PLACEFEED_SETTLE_DELAY_MS", defaults.settle_delay)?,
            entry_delay: parse_ms("PLACEFEED_ENTRY_DELAY_MS", defaults.entry_delay)?,
            scroll_settle: parse_ms("PLACEFEED_SCROLL_SETTLE_MS", defaults.scroll_settle)?,
            max_scroll_failures: parse_u32(
                "PLACEFEED_MAX_SCROLL_FAILURES",
                defaults.max_scroll_failures,
            )?,
        })
    }
}
