use serde_json::{json, Value};

use super::base::Usage;
use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;

/// Convert messages to the OpenAI chat completion message format, preserving order
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role,
                "content": message.content,
            })
        })
        .collect()
}

/// Extract the first choice's text from an OpenAI-compatible response
pub fn openai_response_to_text(response: &Value) -> AgentResult<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            AgentError::Upstream("Response did not contain a completion message".to_string())
        })
}

pub fn get_usage(data: &Value) -> Usage {
    let Some(usage) = data.get("usage") else {
        return Usage::default();
    };

    let input_tokens = usage
        .get("prompt_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let output_tokens = usage
        .get("completion_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let total_tokens = usage
        .get("total_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32)
        .or_else(|| match (input_tokens, output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

/// Turn an `error` object from the endpoint into a displayable message
pub fn openai_error_message(error: &Value) -> String {
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string();

    match error.get("code").and_then(|c| c.as_str()) {
        Some("context_length_exceeded") | Some("string_above_max_length") => {
            format!("Input message too long. Message: {}", message)
        }
        _ => message,
    }
}
