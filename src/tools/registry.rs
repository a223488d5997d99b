use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::tool::ToolSpec;
use super::{calculate, planet};
use crate::errors::{AgentError, AgentResult};

fn is_valid_tool_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}

/// Holds the tools that can answer a request without the model.
///
/// Dispatch only ever goes through [`ToolRegistry::invoke`], so new tools are added with
/// [`ToolRegistry::register`] and nothing else changes.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `calculate` and `get_planet_mass`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.tools.push(calculate::tool());
        registry.tools.push(planet::tool());
        registry
    }

    pub fn register(&mut self, tool: ToolSpec) -> AgentResult<()> {
        if !is_valid_tool_name(&tool.name) {
            return Err(AgentError::InvalidParameters(format!(
                "The provided tool name '{}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+",
                tool.name
            )));
        }
        if self.get(&tool.name).is_some() {
            return Err(AgentError::InvalidParameters(format!(
                "Duplicate tool name: {}",
                tool.name
            )));
        }
        debug!(tool = %tool.name, "registered tool");
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Call a tool after checking every declared parameter is present as a string
    pub fn invoke(&self, name: &str, args: &Value) -> AgentResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        for parameter in &tool.parameters {
            if !args.get(&parameter.name).is_some_and(Value::is_string) {
                return Err(AgentError::InvalidParameters(format!(
                    "{} requires a string '{}' argument",
                    tool.name, parameter.name
                )));
            }
        }

        debug!(tool = %name, "invoking tool");
        tool.call(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolParameter;
    use serde_json::json;

    fn echo_tool(name: &str) -> ToolSpec {
        ToolSpec::new(
            name,
            "Echo the input back",
            vec![ToolParameter::new("text", "Text to echo")],
            |args| Ok(args["text"].clone()),
        )
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = ToolRegistry::with_builtins();
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["calculate", "get_planet_mass"]);
    }

    #[test]
    fn test_invoke_builtins() {
        let registry = ToolRegistry::with_builtins();

        let value = registry
            .invoke("calculate", &json!({"expression": "2 + 3 * 4"}))
            .unwrap();
        assert_eq!(value.as_f64(), Some(14.0));

        let value = registry
            .invoke("get_planet_mass", &json!({"planet": "EARTH"}))
            .unwrap();
        assert_eq!(value.as_f64(), Some(5.972e24));
    }

    #[test]
    fn test_invoke_propagates_tool_errors() {
        let registry = ToolRegistry::with_builtins();
        let err = registry
            .invoke("calculate", &json!({"expression": "__import__('os')"}))
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidExpression(_)));
    }

    #[test]
    fn test_unknown_tool() {
        let registry = ToolRegistry::with_builtins();
        let err = registry.invoke("eval", &json!({})).unwrap_err();
        assert_eq!(err, AgentError::ToolNotFound("eval".to_string()));
    }

    #[test]
    fn test_missing_or_non_string_argument() {
        let registry = ToolRegistry::with_builtins();

        let err = registry.invoke("calculate", &json!({})).unwrap_err();
        assert!(matches!(err, AgentError::InvalidParameters(_)));

        let err = registry
            .invoke("calculate", &json!({"expression": 4}))
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidParameters(_)));
    }

    #[test]
    fn test_register_extension_tool() {
        let mut registry = ToolRegistry::with_builtins();
        registry.register(echo_tool("echo")).unwrap();

        let value = registry.invoke("echo", &json!({"text": "hi"})).unwrap();
        assert_eq!(value, json!("hi"));
        assert_eq!(registry.tools().len(), 3);
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = ToolRegistry::with_builtins();
        let err = registry.register(echo_tool("calculate")).unwrap_err();
        assert!(err.to_string().contains("Duplicate tool name"));
        assert_eq!(registry.tools().len(), 2);
    }

    #[test]
    fn test_register_invalid_name() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(echo_tool("hello world")).is_err());
        assert!(registry.register(echo_tool("hello@world")).is_err());
        assert!(registry.register(echo_tool("hello-world_2")).is_ok());
    }

    #[test]
    fn test_is_valid_tool_name() {
        assert!(is_valid_tool_name("get_planet_mass"));
        assert!(!is_valid_tool_name(""));
        assert!(!is_valid_tool_name("os.system"));
    }
}
