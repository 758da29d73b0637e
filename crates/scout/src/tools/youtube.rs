//! Video lookups by scraping the public results page.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;

use super::http::get_text;
use super::SearchTool;
use crate::config::MediaConfig;
use crate::errors::{ToolError, ToolResult};

const DEFAULT_NUM_RESULTS: usize = 2;
pub const MAX_NUM_RESULTS: usize = 5;

lazy_static! {
    static ref VIDEO_ID: Regex = Regex::new(r#""videoId":"([A-Za-z0-9_-]{11})""#).unwrap();
}

/// Split `"person[,count]"` into the search text and the number of videos wanted.
pub fn parse_input(input: &str) -> ToolResult<(String, usize)> {
    let mut parts = input.splitn(2, ',');
    let name = parts.next().unwrap_or_default().trim().to_string();
    let count = match parts.next().map(str::trim) {
        None | Some("") => DEFAULT_NUM_RESULTS,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ToolError::InvalidInput(format!("'{}' is not a number of results", raw)))?,
    };

    Ok((name, count.min(MAX_NUM_RESULTS)))
}

/// Video ids in page order, without repeats
pub fn extract_video_ids(page: &str, limit: usize) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    if limit == 0 {
        return ids;
    }
    for capture in VIDEO_ID.captures_iter(page) {
        let id = &capture[1];
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
        if ids.len() == limit {
            break;
        }
    }
    ids
}

pub struct YoutubeSearch {
    client: Client,
    base_url: String,
}

impl YoutubeSearch {
    pub fn new(client: Client, config: &MediaConfig) -> Self {
        Self {
            client,
            base_url: config.youtube_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search(&self, input: &str) -> ToolResult<String> {
        let (name, count) = parse_input(input)?;
        let url = format!("{}/results", self.base_url);
        let page = get_text(&self.client, &url, &[("search_query", name.clone())]).await?;

        let ids = extract_video_ids(&page, count);
        if ids.is_empty() {
            return Ok(format!("No YouTube videos found for: {}", name));
        }

        Ok(ids
            .iter()
            .map(|id| format!("{}/watch?v={}", self.base_url, id))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait]
impl SearchTool for YoutubeSearch {
    fn name(&self) -> &str {
        "youtube_search_tool"
    }

    fn description(&self) -> &str {
        "search for youtube videos associated with a person. the input to this tool should be a comma separated list, the first part contains a person name and the second a number that is the maximum number of video results to return aka num_results. the second part is optional"
    }

    async fn run(&self, input: &str) -> String {
        tracing::info!(query = input, "searching youtube");
        match self.search(input).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "youtube search failed");
                format!("Error in Youtube search: {}", e)
            }
        }
    }
}
