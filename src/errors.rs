use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Completion request failed: {0}")]
    Upstream(String),

    #[error("Search request failed with status {status_code}")]
    Search { status_code: u16 },

    #[error("Search request failed: {0}")]
    SearchUnavailable(String),

    #[error("Error in calculation: {0}")]
    InvalidExpression(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    EmptyInput(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
