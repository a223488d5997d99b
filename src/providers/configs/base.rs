use std::env;
use std::time::Duration;

use crate::errors::{AgentError, AgentResult};

/// Resolves a variable name to its value, `None` when unset
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub trait ProviderConfig {
    /// Variable holding the credential this provider cannot work without
    const API_KEY_VAR: &'static str;

    /// Load configuration from an arbitrary variable source
    fn from_lookup(lookup: Lookup<'_>) -> AgentResult<Self>
    where
        Self: Sized;

    /// Load configuration from environment variables
    fn from_env() -> AgentResult<Self>
    where
        Self: Sized,
    {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Helper function to get variables with error handling. Blank values count as unset.
    fn get_env(
        lookup: Lookup<'_>,
        key: &str,
        required: bool,
        default: Option<String>,
    ) -> AgentResult<Option<String>> {
        match lookup(key).filter(|value| !value.trim().is_empty()) {
            Some(value) => Ok(Some(value)),
            None if !required => Ok(default),
            None => Err(AgentError::Config(format!(
                "Environment variable '{}' is required but not set.",
                key
            ))),
        }
    }

    /// Read a timeout in whole seconds
    fn get_timeout(lookup: Lookup<'_>, key: &str, default_secs: u64) -> AgentResult<Duration> {
        match Self::get_env(lookup, key, false, None)? {
            None => Ok(Duration::from_secs(default_secs)),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(AgentError::Config(format!(
                    "Environment variable '{}' must be a positive number of seconds, got '{}'",
                    key, raw
                ))),
            },
        }
    }
}
