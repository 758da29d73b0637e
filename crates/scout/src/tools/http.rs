use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::errors::{ToolError, ToolResult};

/// One authenticated JSON round trip. No retries, client default timeouts.
pub(crate) async fn api_request(
    client: &Client,
    method: Method,
    url: &str,
    token: &str,
    params: &[(&str, String)],
    body: Option<&Value>,
) -> ToolResult<Value> {
    let mut request = client
        .request(method, url)
        .bearer_auth(token)
        .header(CONTENT_TYPE, "application/json");

    if !params.is_empty() {
        request = request.query(params);
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::Status(status));
    }

    Ok(response.json().await?)
}

/// Fetch a page or JSON document without credentials.
pub(crate) async fn get_text(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
) -> ToolResult<String> {
    let response = client.get(url).query(params).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::Status(status));
    }

    Ok(response.text().await?)
}
