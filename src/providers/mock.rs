use std::sync::Mutex;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::providers::base::{CompletionProvider, SearchProvider, SearchResult, Usage};

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Mutex<Vec<AgentResult<String>>>,
    requests: Mutex<Vec<(String, f64, Vec<Message>)>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<AgentResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every `(model, temperature, messages)` received so far
    pub fn requests(&self) -> Vec<(String, f64, Vec<Message>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionProvider for MockProvider {
    fn complete(
        &self,
        model: &str,
        temperature: f64,
        messages: &[Message],
    ) -> AgentResult<(String, Usage)> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), temperature, messages.to_vec()));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty response if no more pre-configured responses
            Ok((String::new(), Usage::default()))
        } else {
            responses.remove(0).map(|text| (text, Usage::default()))
        }
    }
}

/// A mock search backend returning one fixed outcome
pub struct MockSearch {
    outcome: AgentResult<Vec<SearchResult>>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(outcome: AgentResult<Vec<SearchResult>>) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl SearchProvider for MockSearch {
    fn search(&self, query: &str) -> AgentResult<Vec<SearchResult>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.outcome.clone()
    }
}
