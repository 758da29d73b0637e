use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Error as TeraError, Tera};

use crate::tool::Tool;

/// System prompt for the issue tracker agent
pub const SERVICE_PROMPT: &str = include_str!("prompts/service.md");

/// System prompt for the encyclopedia and video agent
pub const MEDIA_PROMPT: &str = include_str!("prompts/media.md");

/// Values available to a system prompt template
#[derive(Debug, Serialize)]
pub struct PromptContext<'a> {
    pub tools: &'a [Tool],
    pub tool_names: Vec<&'a str>,
    pub max_iterations: usize,
}

impl<'a> PromptContext<'a> {
    pub fn new(tools: &'a [Tool], max_iterations: usize) -> Self {
        Self {
            tools,
            tool_names: tools.iter().map(|tool| tool.name.as_str()).collect(),
            max_iterations,
        }
    }
}

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    tera.render("inline_template", &context)
}

/// Read a template from disk, for prompts supplied at run time
pub fn read_prompt_file(template_file: impl AsRef<Path>) -> Result<String, TeraError> {
    fs::read_to_string(template_file.as_ref())
        .map_err(|e| TeraError::chain("Failed to read template file", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tools() -> Vec<Tool> {
        vec![
            Tool::text_input("wikipedia_search_tool", "Useful for querying Wikipedia"),
            Tool::text_input("youtube_search_tool", "search for youtube videos"),
        ]
    }

    #[test]
    fn test_load_prompt() {
        let template = "Hello, {{ name }}! You are {{ age }} years old.";
        let mut context = HashMap::new();
        context.insert("name".to_string(), "Alice".to_string());
        context.insert("age".to_string(), 30.to_string());

        let result = load_prompt(template, &context).unwrap();
        assert_eq!(result, "Hello, Alice! You are 30 years old.");
    }

    #[test]
    fn test_load_prompt_missing_variable() {
        let template = "Hello, {{ name }}! You are {{ age }} years old.";
        let mut context = HashMap::new();
        context.insert("name".to_string(), "Alice".to_string());
        assert!(load_prompt(template, &context).is_err());
    }

    #[test]
    fn test_read_prompt_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("custom.md");
        fs::write(&file_path, "Tools: {{ tool_names | join(sep=\", \") }}").unwrap();

        let tools = tools();
        let template = read_prompt_file(&file_path).unwrap();
        let result = load_prompt(&template, &PromptContext::new(&tools, 10)).unwrap();
        assert_eq!(result, "Tools: wikipedia_search_tool, youtube_search_tool");

        temp_dir.close().unwrap();
    }

    #[test]
    fn test_read_prompt_file_missing_file() {
        assert!(read_prompt_file("non_existent_template.md").is_err());
    }

    #[test]
    fn test_media_prompt_lists_tools() {
        let tools = tools();
        let result = load_prompt(MEDIA_PROMPT, &PromptContext::new(&tools, 10)).unwrap();
        assert!(result.contains("wikipedia_search_tool: Useful for querying Wikipedia"));
        assert!(result.contains("youtube_search_tool: search for youtube videos"));
        assert!(result.contains("maximum 5 videos"));
        assert!(result.contains("at most 10 times"));
    }

    #[test]
    fn test_service_prompt_renders() {
        let tools = vec![Tool::text_input("get_jira_tickets", "Use to retrieve JIRA tickets")];
        let result = load_prompt(SERVICE_PROMPT, &PromptContext::new(&tools, 10)).unwrap();
        assert!(result.contains("get_jira_tickets: Use to retrieve JIRA tickets"));
        assert!(result.contains("input to get_jira_tickets"));
    }
}
