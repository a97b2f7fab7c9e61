use crate::error::{CompletionError, Result};
use crate::types::{CompletionRequest, CompletionResponse};

/// Client for the completion endpoint. Cheap to clone; holds a pooled
/// reqwest client.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CompletionClient {
    /// `base_url` is the provider origin (no trailing path); `api_key`
    /// `None` sends no Authorization header, for self-hosted endpoints.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Issue one completion call and return the typed response.
    ///
    /// Transport failures map to [`CompletionError::Http`], non-2xx
    /// statuses to [`CompletionError::Api`] (with the provider's error
    /// message when the body carries one), and malformed success bodies to
    /// [`CompletionError::Decode`].
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/v1/completions", self.base_url);
        tracing::debug!(model = %request.model, prompt_chars = request.prompt.len(), "completion call");

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: error_message(&body, status.as_u16()),
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)?;
        tracing::debug!(text_chars = parsed.text.len(), "completion response");
        Ok(parsed)
    }
}

/// Pull a human-readable message out of an error body. Providers disagree
/// on shape, so try `error.message`, then a string `error`, then the raw
/// body, then the bare status.
fn error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value["error"]["message"].as_str() {
            return msg.to_string();
        }
        if let Some(msg) = value["error"].as_str() {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
