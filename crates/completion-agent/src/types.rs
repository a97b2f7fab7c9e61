use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// CompletionRequest
// ---------------------------------------------------------------------------

/// Body for `POST /v1/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

// ---------------------------------------------------------------------------
// CompletionResponse
// ---------------------------------------------------------------------------

/// The provider's completion payload. Only `text` is load-bearing; a
/// missing or null `text` deserializes to the empty string, which callers
/// treat as a valid (empty) generation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompletionResponse {
    #[serde(default, deserialize_with = "null_to_empty")]
    pub text: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_text() {
        let json = r#"{"text": "hello", "model": "m1"}"#;
        let resp: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text, "hello");
        assert_eq!(resp.model.as_deref(), Some("m1"));
        assert!(resp.usage.is_none());
    }

    #[test]
    fn missing_text_key_is_empty_string() {
        let json = r#"{"model": "m1"}"#;
        let resp: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text, "");
    }

    #[test]
    fn null_text_is_empty_string() {
        let json = r#"{"text": null}"#;
        let resp: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text, "");
    }

    #[test]
    fn usage_fields_default_to_zero() {
        let json = r#"{"text": "x", "usage": {"total_tokens": 12}}"#;
        let resp: CompletionResponse = serde_json::from_str(json).unwrap();
        let usage = resp.usage.unwrap();
        assert_eq!(usage.total_tokens, 12);
        assert_eq!(usage.prompt_tokens, 0);
    }

    #[test]
    fn request_serializes_all_fields() {
        let req = CompletionRequest {
            model: "m1".into(),
            prompt: "say hi".into(),
            max_tokens: 64,
            temperature: 0.2,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "m1");
        assert_eq!(json["max_tokens"], 64);
    }
}
