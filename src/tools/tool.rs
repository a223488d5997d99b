use serde_json::Value;
use std::fmt::Debug;

use crate::errors::AgentResult;

type ToolFn = dyn Fn(&Value) -> AgentResult<Value> + Send + Sync;

/// A named string argument a tool expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
}

impl ToolParameter {
    pub fn new<N, D>(name: N, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A deterministic tool that can answer a request in place of the model.
pub struct ToolSpec {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// Ordered string parameters, all required
    pub parameters: Vec<ToolParameter>,
    /// The function that powers the tool. It receives a JSON object keyed by parameter name
    /// and must not hold any state between calls.
    pub function: Box<ToolFn>,
}

impl ToolSpec {
    pub fn new<N, D>(
        name: N,
        description: D,
        parameters: Vec<ToolParameter>,
        function: impl Fn(&Value) -> AgentResult<Value> + Send + Sync + 'static,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolSpec {
            name: name.into(),
            description: description.into(),
            parameters,
            function: Box::new(function),
        }
    }

    pub fn call(&self, args: &Value) -> AgentResult<Value> {
        (self.function)(args)
    }
}

impl Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("function", &"<function>")
            .finish()
    }
}
