//! Google Gemini `generateContent` adapter.
//!
//! Gemini returns the whole reply in one buffered JSON response; the
//! adapter extracts the first candidate's text. Conversation roles map
//! to Gemini's `user`/`model` pair.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{ReplyProvider, api_error};
use crate::config::ProviderConfig;
use crate::error::RelayError;
use crate::types::{ChatMessage, MessageRole};

const PROVIDER_ID: &str = "gemini";

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini chat adapter
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    config: ProviderConfig,
    http_client: HttpClient,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig, http_client: HttpClient) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn build_request_body(&self, messages: &[ChatMessage]) -> GenerateContentRequest {
        let contents = messages
            .iter()
            .map(|msg| GeminiContent {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                },
                parts: vec![GeminiPart {
                    text: msg.content.clone(),
                }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.config.generation.temperature,
                max_output_tokens: self.config.generation.max_output_tokens,
            },
        }
    }

    /// First candidate's first text part, or `EmptyReply` when the
    /// response is structurally missing it.
    fn extract_reply(response: GenerateContentResponse) -> Result<String, RelayError> {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| RelayError::EmptyReply(PROVIDER_ID.to_string()))
    }
}

#[async_trait]
impl ReplyProvider for GeminiProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn get_reply(&self, messages: &[ChatMessage]) -> Result<String, RelayError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| RelayError::MissingApiKey(PROVIDER_ID.to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = self.build_request_body(messages);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(PROVIDER_ID, response).await);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Parse(format!("gemini response: {e}")))?;
        Self::extract_reply(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            ProviderConfig::new("https://example.invalid/v1beta", "gemini-2.0-flash"),
            HttpClient::new(),
        )
    }

    #[test]
    fn assistant_turns_map_to_model_role() {
        let body = provider().build_request_body(&[
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ]);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn missing_candidates_is_empty_reply() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let err = GeminiProvider::extract_reply(response).unwrap_err();
        assert!(matches!(err, RelayError::EmptyReply(_)));
    }

    #[test]
    fn candidate_without_parts_is_empty_reply() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        let err = GeminiProvider::extract_reply(response).unwrap_err();
        assert!(matches!(err, RelayError::EmptyReply(_)));
    }

    #[test]
    fn first_candidate_text_wins() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello\nWorld"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            GeminiProvider::extract_reply(response).unwrap(),
            "Hello\nWorld"
        );
    }
}
