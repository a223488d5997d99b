use serde::{Deserialize, Serialize};

use crate::errors::AgentResult;
use crate::models::message::Message;

/// Placeholder for a search hit that came back without a snippet
pub const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// One organic search hit, in the order the search provider ranked it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Base trait for chat completion backends
pub trait CompletionProvider: Send + Sync {
    /// Generate the next assistant reply for `messages`.
    ///
    /// The messages are sent exactly as given; implementations must not add a system
    /// message, reorder, or drop entries.
    fn complete(
        &self,
        model: &str,
        temperature: f64,
        messages: &[Message],
    ) -> AgentResult<(String, Usage)>;
}

/// Base trait for web search backends
pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str) -> AgentResult<Vec<SearchResult>>;
}
