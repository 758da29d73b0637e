use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;

use super::base::Usage;
use crate::errors::AgentError;
use crate::models::message::{Message, MessageContent, Role};
use crate::tool::{Tool, ToolCall};

lazy_static! {
    static ref INVALID_NAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
    static ref VALID_NAME: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Convert internal Message format to Gemini `contents`
pub fn messages_to_gemini_spec(messages: &[Message]) -> Vec<Value> {
    let mut contents = Vec::new();

    for message in messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "model",
        };

        let mut parts = Vec::new();
        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.text.is_empty() {
                        parts.push(json!({"text": text.text}));
                    }
                }
                MessageContent::ToolRequest(request) => {
                    // Rejected calls were never executed, so they have no functionCall to echo
                    if let Ok(call) = &request.tool_call {
                        parts.push(json!({
                            "functionCall": {
                                "name": sanitize_function_name(&call.name),
                                "args": call.arguments,
                            }
                        }));
                    }
                }
                MessageContent::ToolResponse(response) => {
                    if response.name.is_empty() {
                        parts.push(json!({"text": response.output}));
                    } else {
                        parts.push(json!({
                            "functionResponse": {
                                "name": sanitize_function_name(&response.name),
                                "response": {
                                    "name": response.name,
                                    "content": response.output,
                                }
                            }
                        }));
                    }
                }
            }
        }

        if !parts.is_empty() {
            contents.push(json!({"role": role, "parts": parts}));
        }
    }

    contents
}

/// Convert internal Tool format to Gemini `functionDeclarations`
pub fn tools_to_gemini_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "name": sanitize_function_name(&tool.name),
            "description": tool.description,
            "parameters": tool.parameters,
        }));
    }

    Ok(result)
}

/// Convert the first Gemini candidate to internal Message format
pub fn gemini_response_to_message(response: &Value) -> Result<Message> {
    let candidate = match response.get("candidates").and_then(|c| c.get(0)) {
        Some(candidate) => candidate,
        None => {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidates returned");
            return Err(anyhow!("Gemini returned no answer: {}", reason));
        }
    };

    let mut message = Message::assistant();
    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    for (index, part) in parts.iter().enumerate() {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            message = message.with_text(text);
        } else if let Some(call) = part.get("functionCall") {
            let id = format!("call_{}", index);
            let name = call
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let arguments = call.get("args").cloned().unwrap_or_else(|| json!({}));

            let tool_call = if is_valid_function_name(&name) {
                Ok(ToolCall::new(name, arguments))
            } else {
                Err(AgentError::ToolNotFound(format!(
                    "The provided function name '{}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+",
                    name
                )))
            };
            message = message.with_tool_request(id, tool_call);
        }
    }

    Ok(message)
}

pub fn gemini_usage(response: &Value) -> Usage {
    let count = |key: &str| {
        response
            .get("usageMetadata")
            .and_then(|usage| usage.get(key))
            .and_then(Value::as_i64)
            .map(|v| v as i32)
    };

    let input_tokens = count("promptTokenCount");
    let output_tokens = count("candidatesTokenCount");
    let total_tokens = count("totalTokenCount").or(match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

pub fn sanitize_function_name(name: &str) -> String {
    INVALID_NAME_CHARS.replace_all(name, "_").to_string()
}

pub fn is_valid_function_name(name: &str) -> bool {
    VALID_NAME.is_match(name)
}
