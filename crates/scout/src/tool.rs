use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;

/// A tool that can be used by a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// Parameters that the tool accepts
    pub parameters: Value,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// A tool taking a single free-text `query` argument, the only shape
    /// the search adapters accept.
    pub fn text_input<N, D>(name: N, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self::new(
            name,
            description,
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The input text for the tool"
                    }
                },
                "required": ["query"]
            }),
        )
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// The name of the tool to execute
    pub name: String,
    /// The arguments for the execution
    pub arguments: Value,
}

impl ToolCall {
    /// Create a new ToolCall with the given name and arguments
    pub fn new<S: Into<String>>(name: S, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// The free-text input carried by this call.
    ///
    /// Models do not always respect the schema, so a bare string or the
    /// first string-valued argument is accepted as well.
    pub fn text_input(&self) -> String {
        match &self.arguments {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("query")
                .and_then(Value::as_str)
                .or_else(|| map.values().find_map(Value::as_str))
                .unwrap_or_default()
                .to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_prefers_query_argument() {
        let call = ToolCall::new("jira_help", json!({"other": "x", "query": "reset password"}));
        assert_eq!(call.text_input(), "reset password");
    }

    #[test]
    fn test_text_input_falls_back_to_any_string() {
        let call = ToolCall::new("jira_help", json!({"input": "PROJ"}));
        assert_eq!(call.text_input(), "PROJ");

        let call = ToolCall::new("jira_help", json!("PROJ"));
        assert_eq!(call.text_input(), "PROJ");

        let call = ToolCall::new("jira_help", Value::Null);
        assert_eq!(call.text_input(), "");
    }

    #[test]
    fn test_text_input_schema() {
        let tool = Tool::text_input("get_jira_tickets", "Use to retrieve JIRA tickets");
        assert_eq!(tool.parameters["required"], json!(["query"]));
        assert_eq!(tool.parameters["properties"]["query"]["type"], "string");
    }
}
