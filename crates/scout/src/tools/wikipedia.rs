//! Encyclopedia lookups against the MediaWiki action API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::http::get_text;
use super::SearchTool;
use crate::config::MediaConfig;
use crate::errors::ToolResult;

pub const NO_RESULT: &str = "No good Wikipedia Search Result was found";

const TOP_K_RESULTS: usize = 3;
const MAX_QUERY_CHARS: usize = 300;
const MAX_CONTENT_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

pub struct WikipediaSearch {
    client: Client,
    api_url: String,
}

impl WikipediaSearch {
    pub fn new(client: Client, config: &MediaConfig) -> Self {
        Self {
            client,
            api_url: config.wikipedia_api_url.clone(),
        }
    }

    async fn titles(&self, query: &str) -> ToolResult<Vec<String>> {
        let query: String = query.chars().take(MAX_QUERY_CHARS).collect();
        let params = [
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", query),
            ("srlimit", TOP_K_RESULTS.to_string()),
            ("format", "json".to_string()),
        ];

        let body = get_text(&self.client, &self.api_url, &params).await?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        Ok(response
            .query
            .search
            .into_iter()
            .take(TOP_K_RESULTS)
            .map(|hit| hit.title)
            .collect())
    }

    /// Plain-text intro of a page, `None` when the page has no extract
    async fn summary(&self, title: &str) -> ToolResult<Option<(String, String)>> {
        let params = [
            ("action", "query".to_string()),
            ("prop", "extracts".to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("redirects", "1".to_string()),
            ("titles", title.to_string()),
            ("format", "json".to_string()),
        ];

        let body = get_text(&self.client, &self.api_url, &params).await?;
        let response: ExtractResponse = serde_json::from_str(&body)?;
        Ok(response
            .query
            .and_then(|query| query.pages.into_values().next())
            .and_then(|page| match page.extract {
                Some(extract) if !extract.trim().is_empty() => Some((page.title, extract)),
                _ => None,
            }))
    }

    async fn search(&self, query: &str) -> ToolResult<String> {
        let mut summaries = Vec::new();
        for title in self.titles(query).await? {
            if let Some((title, extract)) = self.summary(&title).await? {
                summaries.push(format!("Page: {}\nSummary: {}", title, extract.trim()));
            }
        }

        if summaries.is_empty() {
            return Ok(NO_RESULT.to_string());
        }

        Ok(summaries
            .join("\n\n")
            .chars()
            .take(MAX_CONTENT_CHARS)
            .collect())
    }
}

#[async_trait]
impl SearchTool for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia_search_tool"
    }

    fn description(&self) -> &str {
        "Useful for querying Wikipedia for factual information"
    }

    async fn run(&self, input: &str) -> String {
        tracing::info!(query = input, "searching wikipedia");
        match self.search(input).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "wikipedia search failed");
                format!("Error in Wikipedia search: {}", e)
            }
        }
    }
}
