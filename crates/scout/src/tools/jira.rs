//! Issue tracker, help centre and knowledge base lookups.
//!
//! All three share one bearer token and one response discipline: the payload must
//! carry the expected top-level list, each item is reduced to a single line, and
//! anything else yields the tool's fallback sentence.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::http::api_request;
use super::SearchTool;
use crate::config::ServiceConfig;
use crate::errors::ToolResult;

pub const NO_TICKETS: &str = "No tickets found or an error occurred.";
pub const NO_HELP_ARTICLES: &str = "No help articles found or an error occurred.";
pub const NO_KB_ARTICLES: &str = "No knowledge base articles found or an error occurred.";

const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct IssueSearch {
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct Issue {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct HelpSearch {
    articles: Vec<HelpArticle>,
}

#[derive(Debug, Deserialize)]
struct HelpArticle {
    title: String,
    link: String,
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseSearch {
    articles: Vec<KnowledgeBaseArticle>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseArticle {
    title: String,
    url: String,
}

/// Reduce a successful response to lines, or fall back when the request failed
/// or the payload does not have the expected shape.
fn render<T, F>(tool: &str, response: ToolResult<Value>, fallback: &str, lines: F) -> String
where
    T: DeserializeOwned,
    F: FnOnce(T) -> Vec<String>,
{
    let payload = match response {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(tool, error = %e, "request failed");
            return fallback.to_string();
        }
    };

    match serde_json::from_value::<T>(payload) {
        Ok(parsed) => lines(parsed).join("\n"),
        Err(e) => {
            tracing::warn!(tool, error = %e, "unexpected response shape");
            fallback.to_string()
        }
    }
}

pub fn format_issues(response: ToolResult<Value>) -> String {
    render(
        "get_jira_tickets",
        response,
        NO_TICKETS,
        |search: IssueSearch| {
            search
                .issues
                .into_iter()
                .map(|issue| format!("Ticket: {}, Summary: {}", issue.key, issue.fields.summary))
                .collect()
        },
    )
}

pub fn format_help_articles(response: ToolResult<Value>) -> String {
    render(
        "jira_help",
        response,
        NO_HELP_ARTICLES,
        |search: HelpSearch| {
            search
                .articles
                .into_iter()
                .map(|article| format!("Article: {}, Link: {}", article.title, article.link))
                .collect()
        },
    )
}

pub fn format_kb_articles(response: ToolResult<Value>) -> String {
    render(
        "get_knowledge_base_articles",
        response,
        NO_KB_ARTICLES,
        |search: KnowledgeBaseSearch| {
            search
                .articles
                .into_iter()
                .map(|article| format!("Article: {}, URL: {}", article.title, article.url))
                .collect()
        },
    )
}

/// Tickets for a project key
pub struct JiraTickets {
    client: Client,
    base_url: String,
    token: String,
}

impl JiraTickets {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            base_url: config.jira_base_url.clone(),
            token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl SearchTool for JiraTickets {
    fn name(&self) -> &str {
        "get_jira_tickets"
    }

    fn description(&self) -> &str {
        "Use to retrieve JIRA tickets. Fetches JIRA tickets based on a project key; the input is the project key."
    }

    async fn run(&self, input: &str) -> String {
        let project_key = input.trim();
        let url = format!("{}/rest/api/2/search", self.base_url);
        let params = [
            ("jql", format!("project={}", project_key)),
            ("maxResults", MAX_RESULTS.to_string()),
        ];

        tracing::info!(project_key, "searching tickets");
        let response = api_request(
            &self.client,
            Method::GET,
            &url,
            &self.token,
            &params,
            None,
        )
        .await;
        format_issues(response)
    }
}

/// Articles from the help centre search
pub struct JiraHelp {
    client: Client,
    base_url: String,
    token: String,
}

impl JiraHelp {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            base_url: config.jira_help_url.clone(),
            token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl SearchTool for JiraHelp {
    fn name(&self) -> &str {
        "jira_help"
    }

    fn description(&self) -> &str {
        "Use to retrieve help articles from JIRA help system. The input is a free-text question."
    }

    async fn run(&self, input: &str) -> String {
        let url = format!("{}/search", self.base_url);
        let body = json!({ "query": input });

        tracing::info!(query = input, "searching help articles");
        let response = api_request(
            &self.client,
            Method::POST,
            &url,
            &self.token,
            &[],
            Some(&body),
        )
        .await;
        format_help_articles(response)
    }
}

/// Knowledge base articles on a topic
pub struct KnowledgeBase {
    client: Client,
    base_url: String,
    token: String,
}

impl KnowledgeBase {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            base_url: config.knowledge_base_url.clone(),
            token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl SearchTool for KnowledgeBase {
    fn name(&self) -> &str {
        "get_knowledge_base_articles"
    }

    fn description(&self) -> &str {
        "Use to get knowledge base articles on a specific topic. The input is the topic."
    }

    async fn run(&self, input: &str) -> String {
        let topic = input.trim();
        let url = format!("{}/articles", self.base_url);
        let params = [("topic", topic.to_string())];

        tracing::info!(topic, "searching knowledge base");
        let response = api_request(
            &self.client,
            Method::GET,
            &url,
            &self.token,
            &params,
            None,
        )
        .await;
        format_kb_articles(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolError;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ServiceConfig {
        ServiceConfig::new(server.uri(), server.uri(), server.uri(), "test_token")
    }

    #[tokio::test]
    async fn test_tickets_single_issue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", "project=PROJ"))
            .and(query_param("maxResults", "10"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [{"key": "PROJ-1", "fields": {"summary": "Fix bug"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = JiraTickets::new(Client::new(), &config_for(&server));
        assert_eq!(tool.run("PROJ").await, "Ticket: PROJ-1, Summary: Fix bug");
    }

    #[tokio::test]
    async fn test_tickets_trims_project_key_and_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", "project=OPS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [
                    {"key": "OPS-3", "fields": {"summary": "Rotate keys"}},
                    {"key": "OPS-1", "fields": {"summary": "Patch hosts"}},
                    {"key": "OPS-2", "fields": {"summary": "Audit logs"}}
                ]
            })))
            .mount(&server)
            .await;

        let tool = JiraTickets::new(Client::new(), &config_for(&server));
        let output = tool.run("  OPS \n").await;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Ticket: OPS-3, Summary: Rotate keys",
                "Ticket: OPS-1, Summary: Patch hosts",
                "Ticket: OPS-2, Summary: Audit logs",
            ]
        );
    }

    #[tokio::test]
    async fn test_tickets_error_status_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let tool = JiraTickets::new(Client::new(), &config_for(&server));
        assert_eq!(tool.run("PROJ").await, NO_TICKETS);
    }

    #[tokio::test]
    async fn test_help_posts_query_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"query": "reset password"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [
                    {"title": "Resetting your password", "link": "https://help/1"},
                    {"title": "Account recovery", "link": "https://help/2"}
                ]
            })))
            .mount(&server)
            .await;

        let tool = JiraHelp::new(Client::new(), &config_for(&server));
        assert_eq!(
            tool.run("reset password").await,
            "Article: Resetting your password, Link: https://help/1\nArticle: Account recovery, Link: https://help/2"
        );
    }

    #[tokio::test]
    async fn test_help_missing_key_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let tool = JiraHelp::new(Client::new(), &config_for(&server));
        assert_eq!(
            tool.run("reset password").await,
            "No help articles found or an error occurred."
        );
    }

    #[tokio::test]
    async fn test_knowledge_base_topic_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .and(query_param("topic", "vpn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [{"title": "VPN setup", "url": "https://kb/vpn"}]
            })))
            .mount(&server)
            .await;

        let tool = KnowledgeBase::new(Client::new(), &config_for(&server));
        assert_eq!(tool.run(" vpn ").await, "Article: VPN setup, URL: https://kb/vpn");
    }

    #[tokio::test]
    async fn test_same_input_same_output() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [{"title": "VPN setup", "url": "https://kb/vpn"}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let tool = KnowledgeBase::new(Client::new(), &config_for(&server));
        let first = tool.run("vpn").await;
        let second = tool.run("vpn").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back() {
        // Nothing listens on port 9 (discard) in the test environment
        let config = ServiceConfig::new("http://127.0.0.1:9", "", "not a url", "");
        let client = Client::new();

        assert_eq!(JiraTickets::new(client.clone(), &config).run("PROJ").await, NO_TICKETS);
        assert_eq!(JiraHelp::new(client.clone(), &config).run("x").await, NO_HELP_ARTICLES);
        assert_eq!(KnowledgeBase::new(client, &config).run("x").await, NO_KB_ARTICLES);
    }

    #[test]
    fn test_malformed_item_falls_back() {
        let payload = json!({"issues": [{"key": "PROJ-1", "fields": {}}]});
        assert_eq!(format_issues(Ok(payload)), NO_TICKETS);
    }

    #[test]
    fn test_empty_list_is_empty_text() {
        assert_eq!(format_kb_articles(Ok(json!({"articles": []}))), "");
    }

    #[test]
    fn test_error_status_is_fallback() {
        let response = Err(ToolError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(format_help_articles(response), NO_HELP_ARTICLES);
    }
}
