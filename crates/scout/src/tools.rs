//! Search tools exposed to the agent.
//!
//! Every tool takes one piece of free text and always answers with text. Transport
//! failures, error statuses and unexpected payloads are turned into a fixed message
//! inside the tool, so the agent can treat every tool the same way.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{MediaConfig, ServiceConfig};
use crate::tool::Tool;

mod http;
pub mod jira;
pub mod wikipedia;
pub mod youtube;

pub use jira::{JiraHelp, JiraTickets, KnowledgeBase};
pub use wikipedia::WikipediaSearch;
pub use youtube::YoutubeSearch;

/// A named lookup the model can invoke
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Name the model uses to address this tool
    fn name(&self) -> &str;

    /// What the tool does, shown to the model
    fn description(&self) -> &str;

    /// Run one lookup. Never fails: errors come back as text.
    async fn run(&self, input: &str) -> String;

    /// The definition sent to the model
    fn definition(&self) -> Tool {
        Tool::text_input(self.name(), self.description())
    }
}

/// An ordered collection of tools handed to the agent
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<Box<dyn SearchTool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: impl SearchTool + 'static) -> Self {
        self.add(Box::new(tool));
        self
    }

    pub fn add(&mut self, tool: Box<dyn SearchTool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn SearchTool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| &**tool)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn definitions(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Identifies scout to the services it queries; Wikimedia rejects anonymous clients
pub const USER_AGENT: &str = concat!("scout/", env!("CARGO_PKG_VERSION"));

/// The HTTP client shared by all tools
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// Issue tickets, help articles and knowledge base articles, in that order
pub fn service_tools(client: &Client, config: &ServiceConfig) -> ToolSet {
    ToolSet::new()
        .with_tool(JiraTickets::new(client.clone(), config))
        .with_tool(JiraHelp::new(client.clone(), config))
        .with_tool(KnowledgeBase::new(client.clone(), config))
}

/// Encyclopedia then video search
pub fn media_tools(client: &Client, config: &MediaConfig) -> ToolSet {
    ToolSet::new()
        .with_tool(WikipediaSearch::new(client.clone(), config))
        .with_tool(YoutubeSearch::new(client.clone(), config))
}
