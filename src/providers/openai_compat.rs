//! OpenAI-compatible `chat/completions` adapter.
//!
//! Serves every selector whose upstream speaks the chat-completions
//! shape; the deepseek and openai selectors both instantiate it with
//! their own configuration. The wire model id is publisher-prefixed
//! when the catalogue requires it (GitHub Models).

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{ReplyProvider, api_error};
use crate::config::ProviderConfig;
use crate::error::RelayError;
use crate::types::{ChatMessage, MessageRole};

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: String,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions adapter parameterized by provider id and config.
#[derive(Debug, Clone)]
pub struct OpenAiCompatProvider {
    provider_id: String,
    config: ProviderConfig,
    http_client: HttpClient,
}

impl OpenAiCompatProvider {
    pub fn new(
        provider_id: impl Into<String>,
        config: ProviderConfig,
        http_client: HttpClient,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            config,
            http_client,
        }
    }

    fn build_request_body<'a>(&self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: self.config.wire_model(),
            messages: messages
                .iter()
                .map(|msg| WireMessage {
                    role: match msg.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    },
                    content: &msg.content,
                })
                .collect(),
            temperature: self.config.generation.temperature,
            max_tokens: self.config.generation.max_output_tokens,
        }
    }

    fn extract_reply(&self, response: ChatCompletionResponse) -> Result<String, RelayError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| RelayError::EmptyReply(self.provider_id.clone()))
    }
}

#[async_trait]
impl ReplyProvider for OpenAiCompatProvider {
    fn id(&self) -> &str {
        &self.provider_id
    }

    async fn get_reply(&self, messages: &[ChatMessage]) -> Result<String, RelayError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| RelayError::MissingApiKey(self.provider_id.clone()))?;

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = self.build_request_body(messages);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(&self.provider_id, response).await);
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            RelayError::Parse(format!("{} response: {e}", self.provider_id))
        })?;
        self.extract_reply(parsed)
    }
}
