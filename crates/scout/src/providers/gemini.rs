use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{Provider, Usage};
use super::configs::GeminiProviderConfig;
use super::utils::{
    gemini_response_to_message, gemini_usage, messages_to_gemini_spec, tools_to_gemini_spec,
};
use crate::models::message::Message;
use crate::tool::Tool;

pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generation_config(&self) -> Value {
        let mut generation = serde_json::Map::new();
        if let Some(temp) = self.config.temperature {
            generation.insert("temperature".to_string(), json!(temp));
        }
        if let Some(tokens) = self.config.max_tokens {
            generation.insert("maxOutputTokens".to_string(), json!(tokens));
        }
        if let Some(k) = self.config.top_k {
            generation.insert("topK".to_string(), json!(k));
        }
        if let Some(p) = self.config.top_p {
            generation.insert("topP".to_string(), json!(p));
        }
        Value::Object(generation)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow!("Request failed: {}\nResponse: {}", status, body))
            }
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<(Message, Usage)> {
        let mut payload = json!({
            "systemInstruction": {"parts": [{"text": system}]},
            "contents": messages_to_gemini_spec(messages),
            "generationConfig": self.generation_config(),
        });

        if let Some(body) = payload.as_object_mut() {
            if !tools.is_empty() {
                body.insert(
                    "tools".to_string(),
                    json!([{ "functionDeclarations": tools_to_gemini_spec(tools)? }]),
                );
            }
            if self.config.allow_dangerous_content {
                body.insert(
                    "safetySettings".to_string(),
                    json!([{
                        "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                        "threshold": "BLOCK_NONE"
                    }]),
                );
            }
        }

        let response = self.post(payload).await?;

        if let Some(error) = response.get("error") {
            return Err(anyhow!("Gemini API error: {}", error));
        }

        let message = gemini_response_to_message(&response)?;
        let usage = gemini_usage(&response);
        tracing::debug!(?usage, model = %self.config.model, "completion received");

        Ok((message, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::MessageContent;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server(status: u16, response_body: Value) -> (MockServer, GeminiProvider) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .and(header("x-goog-api-key", "test_api_key"))
            .respond_with(ResponseTemplate::new(status).set_body_json(response_body))
            .mount(&mock_server)
            .await;

        let config =
            GeminiProviderConfig::new("test_api_key".to_string()).with_host(mock_server.uri());
        let provider = GeminiProvider::new(config).unwrap();
        (mock_server, provider)
    }

    #[tokio::test]
    async fn test_complete_basic() -> Result<()> {
        let response_body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello! How can I help?"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 15, "totalTokenCount": 27}
        });

        let (_server, provider) = setup_mock_server(200, response_body).await;
        let messages = vec![Message::user().with_text("Hello?")];

        let (message, usage) = provider
            .complete("You are a helpful assistant.", &messages, &[])
            .await?;

        if let MessageContent::Text(text) = &message.content[0] {
            assert_eq!(text.text, "Hello! How can I help?");
        } else {
            panic!("Expected Text content");
        }
        assert_eq!(usage.input_tokens, Some(12));
        assert_eq!(usage.output_tokens, Some(15));
        assert_eq!(usage.total_tokens, Some(27));
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_sends_tools_and_settings() -> Result<()> {
        let response_body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "get_jira_tickets", "args": {"query": "PROJ"}}}
                ]}
            }]
        });

        let (server, provider) = setup_mock_server(200, response_body).await;
        let tool = Tool::text_input("get_jira_tickets", "Use to retrieve JIRA tickets");
        let messages = vec![Message::user().with_text("What is open in PROJ?")];

        let (message, _) = provider.complete("system", &messages, &[tool]).await?;
        let call = message.tool_requests()[0].tool_call.clone().unwrap();
        assert_eq!(call.name, "get_jira_tickets");
        assert_eq!(call.text_input(), "PROJ");

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body)?;
        assert_eq!(sent["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(
            sent["tools"][0]["functionDeclarations"][0]["name"],
            "get_jira_tickets"
        );
        assert_eq!(sent["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(sent["generationConfig"]["topK"], 40);
        assert_eq!(
            sent["safetySettings"][0]["category"],
            "HARM_CATEGORY_DANGEROUS_CONTENT"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let (_server, provider) =
            setup_mock_server(400, json!({"error": {"message": "API key not valid"}})).await;
        let messages = vec![Message::user().with_text("Hello?")];

        let error = provider.complete("system", &messages, &[]).await.unwrap_err();
        assert!(error.to_string().contains("400"));
    }
}
