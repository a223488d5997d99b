use std::time::Duration;

use super::base::{Lookup, ProviderConfig};
use crate::errors::AgentResult;

pub const SERPAPI_HOST: &str = "https://serpapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SerpApiProviderConfig {
    pub api_key: String,
    pub host: String,
    pub timeout: Duration,
}

impl SerpApiProviderConfig {
    pub fn new(api_key: String, host: String) -> Self {
        Self {
            api_key,
            host,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ProviderConfig for SerpApiProviderConfig {
    const API_KEY_VAR: &'static str = "SERPAPI_API_KEY";

    fn from_lookup(lookup: Lookup<'_>) -> AgentResult<Self> {
        let api_key = Self::get_env(lookup, Self::API_KEY_VAR, true, None)?.unwrap_or_default();

        let host = Self::get_env(lookup, "SERPAPI_HOST", false, Some(SERPAPI_HOST.to_string()))?
            .unwrap_or_else(|| SERPAPI_HOST.to_string());

        let timeout = Self::get_timeout(lookup, "SERPAPI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self::new(api_key, host).with_timeout(timeout))
    }
}
