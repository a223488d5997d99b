pub mod base;
pub mod groq;
pub mod serpapi;

use std::env;

use tracing::warn;

use self::base::{Lookup, ProviderConfig};
use self::groq::GroqProviderConfig;
use self::serpapi::SerpApiProviderConfig;
use crate::errors::AgentResult;

/// Process-wide settings, read once at start-up and never mutated afterwards.
///
/// A provider whose credential is missing is simply absent; requests that need it fail
/// with a configuration error at dispatch time instead of at start-up.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub groq: Option<GroqProviderConfig>,
    pub serpapi: Option<SerpApiProviderConfig>,
}

impl Settings {
    pub fn from_env() -> AgentResult<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> AgentResult<Self> {
        Ok(Self {
            groq: optional::<GroqProviderConfig>(lookup)?,
            serpapi: optional::<SerpApiProviderConfig>(lookup)?,
        })
    }
}

fn optional<C: ProviderConfig>(lookup: Lookup<'_>) -> AgentResult<Option<C>> {
    if lookup(C::API_KEY_VAR).filter(|v| !v.trim().is_empty()).is_none() {
        warn!("{} not found in environment", C::API_KEY_VAR);
        return Ok(None);
    }
    C::from_lookup(lookup).map(Some)
}
