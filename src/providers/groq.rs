use reqwest::blocking::Client; // blocking API, one request per turn
use serde_json::{json, Value};
use tracing::{debug, info_span};

use super::{
    base::{CompletionProvider, Usage},
    configs::base::ProviderConfig,
    configs::groq::GroqProviderConfig,
    utils::{get_usage, messages_to_openai_spec, openai_error_message, openai_response_to_text},
};
use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;

/// Chat completions against Groq's OpenAI-compatible endpoint
pub struct GroqProvider {
    client: Client,
    config: GroqProviderConfig,
}

impl GroqProvider {
    pub fn new(config: GroqProviderConfig) -> AgentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> AgentResult<Self> {
        Self::new(GroqProviderConfig::from_env()?)
    }

    fn post(&self, payload: Value) -> AgentResult<Value> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Upstream("Request timed out".to_string())
                } else {
                    AgentError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .map_err(|e| AgentError::Upstream(format!("Invalid response body: {}", e)));
        }

        // error bodies carry a more useful message than the bare status
        let detail = response
            .json::<Value>()
            .ok()
            .and_then(|body| body.get("error").map(openai_error_message));
        Err(AgentError::Upstream(match detail {
            Some(message) => format!("Server error: {} ({})", status, message),
            None => format!("Server error: {}", status),
        }))
    }
}

impl CompletionProvider for GroqProvider {
    fn complete(
        &self,
        model: &str,
        temperature: f64,
        messages: &[Message],
    ) -> AgentResult<(String, Usage)> {
        if self.config.api_key.trim().is_empty() {
            return Err(AgentError::Config(
                "Cannot send query because GROQ_API_KEY is missing.".to_string(),
            ));
        }

        let _span = info_span!("completion", model, messages = messages.len()).entered();

        let payload = json!({
            "model": model,
            "temperature": temperature,
            "messages": messages_to_openai_spec(messages),
        });

        let response = self.post(payload)?;

        if let Some(error) = response.get("error") {
            return Err(AgentError::Upstream(openai_error_message(error)));
        }

        let text = openai_response_to_text(&response)?;
        let usage = get_usage(&response);
        debug!(?usage, "completion received");

        Ok((text, usage))
    }
}
