//! Credentials and endpoints read once from the environment at process start.
//!
//! Nothing here is global: each process builds the structs it needs and passes
//! them by reference into the tool adapters and the provider.

use anyhow::{anyhow, Result};
use std::env;

pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

pub trait ConfigFromEnv {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Load a `.env` file from the working directory (or a parent) if one exists.
pub fn load_dotenv() {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!("Loaded environment from {:?}", path);
    }
}

/// Endpoints for the issue tracker, help centre and knowledge base.
///
/// Every value is optional. A missing base URL or token produces a request
/// that fails, and the adapter reports its fallback text instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    pub jira_base_url: String,
    pub jira_help_url: String,
    pub knowledge_base_url: String,
    pub api_token: String,
}

impl ServiceConfig {
    pub fn new(
        jira_base_url: impl Into<String>,
        jira_help_url: impl Into<String>,
        knowledge_base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            jira_base_url: jira_base_url.into(),
            jira_help_url: jira_help_url.into(),
            knowledge_base_url: knowledge_base_url.into(),
            api_token: api_token.into(),
        }
    }
}

impl ConfigFromEnv for ServiceConfig {
    fn from_env() -> Result<Self> {
        let optional = |key: &str| -> Result<String> {
            Ok(Self::get_env(key, false, None)?.unwrap_or_default())
        };

        let config = Self::new(
            optional("JIRA_API_BASE_URL")?,
            optional("JIRA_HELP_API_URL")?,
            optional("KNOWLEDGE_BASE_API_URL")?,
            optional("JIRA_API_TOKEN")?,
        );

        for (key, value) in [
            ("JIRA_API_BASE_URL", &config.jira_base_url),
            ("JIRA_HELP_API_URL", &config.jira_help_url),
            ("KNOWLEDGE_BASE_API_URL", &config.knowledge_base_url),
            ("JIRA_API_TOKEN", &config.api_token),
        ] {
            if value.is_empty() {
                tracing::warn!("{} is not set; the tools using it will report no results", key);
            }
        }

        Ok(config)
    }
}

/// Endpoints for the encyclopedia and video search tools.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaConfig {
    pub wikipedia_api_url: String,
    pub youtube_base_url: String,
}

impl MediaConfig {
    pub fn new(wikipedia_api_url: impl Into<String>, youtube_base_url: impl Into<String>) -> Self {
        Self {
            wikipedia_api_url: wikipedia_api_url.into(),
            youtube_base_url: youtube_base_url.into(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIKIPEDIA_API_URL, DEFAULT_YOUTUBE_BASE_URL)
    }
}

impl ConfigFromEnv for MediaConfig {
    fn from_env() -> Result<Self> {
        let wikipedia_api_url = Self::get_env(
            "WIKIPEDIA_API_URL",
            false,
            Some(DEFAULT_WIKIPEDIA_API_URL.to_string()),
        )?
        .unwrap_or_else(|| DEFAULT_WIKIPEDIA_API_URL.to_string());

        let youtube_base_url = Self::get_env(
            "YOUTUBE_BASE_URL",
            false,
            Some(DEFAULT_YOUTUBE_BASE_URL.to_string()),
        )?
        .unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.to_string());

        Ok(Self::new(wikipedia_api_url, youtube_base_url))
    }
}
