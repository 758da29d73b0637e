//! The shape of what an agent run hands back.
//!
//! Whatever the loop produces is normalised into [`AgentOutcome`] as soon as it
//! returns, so the printer only ever matches on one enum.

use serde_json::{Map, Value};

pub const OUTPUT_KEY: &str = "output";
pub const INPUT_KEY: &str = "input";

pub type ReturnValues = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// A completed run, carrying its return values (`input`, `output`)
    Finished(ReturnValues),
    /// A bare key/value mapping from elsewhere, e.g. a serialized result
    Mapping(ReturnValues),
    /// A plain answer string
    Text(String),
    /// Anything else; holds the name of the type that was received
    Unrecognized(String),
}

impl AgentOutcome {
    pub fn finished(input: &str, output: impl Into<String>) -> Self {
        let mut values = ReturnValues::new();
        values.insert(INPUT_KEY.to_string(), Value::String(input.to_string()));
        values.insert(OUTPUT_KEY.to_string(), Value::String(output.into()));
        AgentOutcome::Finished(values)
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => AgentOutcome::Mapping(map),
            Value::String(text) => AgentOutcome::Text(text),
            other => AgentOutcome::Unrecognized(type_name(&other).to_string()),
        }
    }

    /// The answer text, when the outcome carries one
    pub fn output(&self) -> Option<String> {
        match self {
            AgentOutcome::Finished(values) | AgentOutcome::Mapping(values) => {
                values.get(OUTPUT_KEY).map(value_text)
            }
            AgentOutcome::Text(text) => Some(text.clone()),
            AgentOutcome::Unrecognized(_) => None,
        }
    }
}

/// Strings are shown without quotes; other JSON values in their compact form
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
