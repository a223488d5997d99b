use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info_span};

use super::{
    base::{SearchProvider, SearchResult, NO_DESCRIPTION},
    configs::base::ProviderConfig,
    configs::serpapi::SerpApiProviderConfig,
};
use crate::errors::{AgentError, AgentResult};

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    snippet: Option<String>,
}

impl From<OrganicResult> for SearchResult {
    fn from(result: OrganicResult) -> Self {
        SearchResult {
            title: result.title,
            link: result.link,
            snippet: result
                .snippet
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        }
    }
}

/// Name the search backend is listed under among a request's enabled tools
pub const TOOL_NAME: &str = "web_search";

/// Google web search through SerpApi
pub struct SerpApiProvider {
    client: Client,
    config: SerpApiProviderConfig,
}

impl SerpApiProvider {
    pub fn new(config: SerpApiProviderConfig) -> AgentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> AgentResult<Self> {
        Self::new(SerpApiProviderConfig::from_env()?)
    }
}

impl SearchProvider for SerpApiProvider {
    fn search(&self, query: &str) -> AgentResult<Vec<SearchResult>> {
        if self.config.api_key.trim().is_empty() {
            return Err(AgentError::Config(
                "Cannot search because SERPAPI_API_KEY is missing.".to_string(),
            ));
        }

        let _span = info_span!("search", query).entered();
        let url = format!("{}/search.json", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::SearchUnavailable("Request timed out".to_string())
                } else {
                    AgentError::SearchUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Search {
                status_code: status.as_u16(),
            });
        }

        let body: SerpApiResponse = response
            .json()
            .map_err(|e| AgentError::SearchUnavailable(format!("Invalid response body: {}", e)))?;

        let results: Vec<SearchResult> = body
            .organic_results
            .into_iter()
            .map(SearchResult::from)
            .collect();
        debug!(count = results.len(), "search results received");

        Ok(results)
    }
}
