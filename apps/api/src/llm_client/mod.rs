//! LLM client: the single point of entry for all Gemini API calls.
//!
//! No other module may call the Generative Language API directly.
//! Callers go through the `StructuredModel` trait so tests can swap in fakes.
//!
//! Model: gemini-2.5-flash (hardcoded to prevent drift)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiKey;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// The model used for every analysis call.
pub const MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A model that can answer a prompt with JSON constrained by a response schema.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Returns the raw response text. Implementations make exactly one attempt.
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types for models/{model}:generateContent
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate. `None` when there is
    /// no candidate or every part is empty.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini client. One request per call: no retry, no backoff.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: ApiKey,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Points the client at a different host (local fakes in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL)
    }

    /// Makes a raw call to the API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}, finish_reason={:?}",
                usage.prompt_token_count,
                usage.candidates_token_count,
                gemini_response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
            );
        }

        Ok(gemini_response)
    }
}

#[async_trait]
impl StructuredModel for GeminiClient {
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, LlmError> {
        let response = self.call(prompt, schema).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Calls the model and deserializes its text response as `T`.
pub async fn generate_structured<T: DeserializeOwned>(
    model: &dyn StructuredModel,
    prompt: &str,
    schema: &Value,
) -> Result<T, LlmError> {
    let text = model.generate_json(prompt, schema).await?;

    // JSON mode should not fence its output, but some model versions still do
    let text = strip_json_fences(&text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn test_key() -> ApiKey {
        match crate::config::Credential::from_value(Some("test-key".to_string())) {
            crate::config::Credential::Configured(key) => key,
            crate::config::Credential::Unconfigured => unreachable!(),
        }
    }

    fn client_for(server: &Server) -> GeminiClient {
        GeminiClient::new(test_key()).unwrap().with_base_url(server.url())
    }

    fn endpoint_path() -> String {
        format!("/v1beta/models/{MODEL}:generateContent")
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_text_none_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_call_sends_schema_and_key() {
        let mut server = Server::new_async().await;
        let schema = json!({"type": "OBJECT", "properties": {"a": {"type": "NUMBER"}}});

        let mock = server
            .mock("POST", endpoint_path().as_str())
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": schema.clone()
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {"parts": [{"text": "{\"a\": 1}"}], "role": "model"},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 3}
                }"#,
            )
            .create_async()
            .await;

        let text = client_for(&server)
            .generate_json("hello", &schema)
            .await
            .unwrap();
        assert_eq!(text, "{\"a\": 1}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_message_is_extracted() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", endpoint_path().as_str())
            .with_status(429)
            .with_body(r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server)
            .generate_json("hello", &json!({}))
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        // a single attempt, never retried
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_content() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", endpoint_path().as_str())
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .generate_json("hello", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    struct CannedModel(&'static str);

    #[async_trait]
    impl StructuredModel for CannedModel {
        async fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        a: u32,
    }

    #[tokio::test]
    async fn test_generate_structured_parses_fenced_json() {
        let sample: Sample = generate_structured(&CannedModel("```json\n{\"a\": 7}\n```"), "p", &json!({}))
            .await
            .unwrap();
        assert_eq!(sample.a, 7);
    }

    #[tokio::test]
    async fn test_generate_structured_reports_malformed_json() {
        let err = generate_structured::<Sample>(&CannedModel("{not json"), "p", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_generate_structured_rejects_blank_fenced_output() {
        let err = generate_structured::<Sample>(&CannedModel("```json\n```"), "p", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
