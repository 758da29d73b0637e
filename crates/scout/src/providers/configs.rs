use anyhow::Result;

use crate::config::ConfigFromEnv;

pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-pro";

/// Settings for the Gemini `generateContent` endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub top_k: Option<i32>,
    pub top_p: Option<f32>,
    /// Turn off blocking for the dangerous-content harm category
    pub allow_dangerous_content: bool,
}

impl GeminiProviderConfig {
    /// Generation settings the agents were tuned with
    pub fn new(api_key: String) -> Self {
        Self {
            host: GEMINI_HOST.to_string(),
            api_key,
            model: GEMINI_MODEL.to_string(),
            temperature: Some(0.3),
            max_tokens: Some(1024),
            top_k: Some(40),
            top_p: Some(0.95),
            allow_dangerous_content: true,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

impl ConfigFromEnv for GeminiProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("GOOGLE_API_KEY", true, None)?
            .ok_or_else(|| anyhow::anyhow!("Google API key should be present"))?;

        let host = Self::get_env("GOOGLE_API_HOST", false, Some(GEMINI_HOST.to_string()))?
            .unwrap_or_else(|| GEMINI_HOST.to_string());

        let model = Self::get_env("GEMINI_MODEL", false, Some(GEMINI_MODEL.to_string()))?
            .unwrap_or_else(|| GEMINI_MODEL.to_string());

        Ok(Self::new(api_key).with_host(host).with_model(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        env::remove_var("GOOGLE_API_KEY");
        assert!(GeminiProviderConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::set_var("GOOGLE_API_KEY", "key");
        env::remove_var("GOOGLE_API_HOST");
        env::remove_var("GEMINI_MODEL");

        let config = GeminiProviderConfig::from_env().unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.host, GEMINI_HOST);
        assert_eq!(config.model, GEMINI_MODEL);
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_tokens, Some(1024));

        env::remove_var("GOOGLE_API_KEY");
    }
}
