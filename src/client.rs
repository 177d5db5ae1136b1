//! Relay client: submit a conversation and consume the reply stream.

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::assembler::{AssembledMessage, assemble_with};
use crate::error::RelayError;
use crate::types::{ChatMessage, ChatRequest, ModelSelector};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for a relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    http_client: HttpClient,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RelayError> {
        let http_client = HttpClient::builder()
            .build()
            .map_err(|e| RelayError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(base_url, http_client))
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    /// Send a conversation and assemble the streamed reply.
    pub async fn send_chat(
        &self,
        messages: &[ChatMessage],
        model: Option<ModelSelector>,
    ) -> Result<AssembledMessage, RelayError> {
        self.send_chat_with(messages, model, |_| {}).await
    }

    /// Send a conversation, invoking `on_append` for every decoded
    /// frame so the caller can render the reply as it grows.
    pub async fn send_chat_with<F>(
        &self,
        messages: &[ChatMessage],
        model: Option<ModelSelector>,
        on_append: F,
    ) -> Result<AssembledMessage, RelayError>
    where
        F: FnMut(&AssembledMessage),
    {
        let request = ChatRequest {
            messages: messages.to_vec(),
            model: model.map(|m| m.to_string()),
        };

        let response = self
            .http_client
            .post(format!("{}/chat", self.base_url.trim_end_matches('/')))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Non-streaming structured error from the relay.
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "relay request failed".to_string());
            return Err(RelayError::Api {
                provider: "relay".to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(assemble_with(response.bytes_stream(), on_append).await)
    }
}
