//! Runtime configuration read from the environment.

use crate::cancel::Cancellation;
use crate::error::{LedgerError, Result};
use std::env;
use std::time::Duration;

/// Per-command deadline in milliseconds. Unset means no deadline.
pub const COMMAND_TIMEOUT_VAR: &str = "LEDGER_COMMAND_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub command_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let command_timeout = match lookup(COMMAND_TIMEOUT_VAR) {
            Some(raw) if !raw.trim().is_empty() => Some(parse_millis(COMMAND_TIMEOUT_VAR, &raw)?),
            _ => None,
        };

        Ok(Config { command_timeout })
    }

    /// A fresh cancellation signal for one ledger command.
    pub fn command_signal(&self) -> Cancellation {
        match self.command_timeout {
            Some(timeout) => Cancellation::with_timeout(timeout),
            None => Cancellation::new(),
        }
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(LedgerError::Config(format!(
            "{} must be a positive number of milliseconds, got {:?}",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(value: Option<&str>) -> Result<Config> {
        Config::from_lookup(|key| {
            assert_eq!(key, COMMAND_TIMEOUT_VAR);
            value.map(str::to_string)
        })
    }

    #[test]
    fn test_defaults_to_no_deadline() {
        let config = config_with(None).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.command_signal().deadline().is_none());
    }

    #[test]
    fn test_blank_value_means_unset() {
        assert_eq!(config_with(Some("  ")).unwrap().command_timeout, None);
    }

    #[test]
    fn test_parses_timeout() {
        let config = config_with(Some("250")).unwrap();
        assert_eq!(config.command_timeout, Some(Duration::from_millis(250)));
        assert!(config.command_signal().deadline().is_some());
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in ["0", "-5", "soon"] {
            assert!(matches!(config_with(Some(bad)), Err(LedgerError::Config(_))));
        }
    }
}
