//! Model selection and request dispatch.
//!
//! The dispatcher owns the closed-enum selector check and the adapter
//! table; it stays ignorant of provider-specific request shapes.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::providers::{GeminiProvider, OpenAiCompatProvider, ReplyProvider};
use crate::types::{ChatMessage, ModelSelector};

/// Routes a conversation to the adapter named by the selector.
pub struct Dispatcher {
    gemini: GeminiProvider,
    deepseek: OpenAiCompatProvider,
    openai: OpenAiCompatProvider,
    default_model: ModelSelector,
}

impl Dispatcher {
    /// Build a dispatcher with a shared HTTP client carrying the
    /// configured upstream timeout.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RelayError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Build a dispatcher around an existing HTTP client.
    pub fn with_http_client(config: &RelayConfig, http_client: HttpClient) -> Self {
        Self {
            gemini: GeminiProvider::new(config.gemini.clone(), http_client.clone()),
            deepseek: OpenAiCompatProvider::new(
                ModelSelector::Deepseek.as_str(),
                config.deepseek.clone(),
                http_client.clone(),
            ),
            openai: OpenAiCompatProvider::new(
                ModelSelector::OpenAi.as_str(),
                config.openai.clone(),
                http_client,
            ),
            default_model: config.default_model,
        }
    }

    /// Resolve the selector and delegate to the matching adapter.
    ///
    /// A missing selector falls back to the configured default; an
    /// explicitly supplied unknown name fails with `InvalidModel`
    /// before any adapter runs.
    pub async fn dispatch(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<String, RelayError> {
        let selector = match model {
            Some(name) => name.parse::<ModelSelector>()?,
            None => self.default_model,
        };
        let provider = self.provider(selector);
        tracing::debug!(
            provider = provider.id(),
            turns = messages.len(),
            "dispatching chat request"
        );
        provider.get_reply(messages).await
    }

    fn provider(&self, selector: ModelSelector) -> &dyn ReplyProvider {
        match selector {
            ModelSelector::Gemini => &self.gemini,
            ModelSelector::Deepseek => &self.deepseek,
            ModelSelector::OpenAi => &self.openai,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    fn dispatcher() -> Dispatcher {
        Dispatcher::with_http_client(&RelayConfig::default(), HttpClient::new())
    }

    #[tokio::test]
    async fn unknown_model_is_rejected_before_any_call() {
        let err = dispatcher()
            .dispatch(&[ChatMessage::user("hi")], Some("claude"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidModel(_)));
    }

    #[tokio::test]
    async fn missing_credential_fails_fast() {
        // Default config carries no credentials; the adapter must fail
        // before reaching the network.
        let err = dispatcher()
            .dispatch(&[ChatMessage::user("hi")], Some("gemini"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingApiKey(_)));
    }

    #[tokio::test]
    async fn absent_selector_uses_the_default_provider() {
        let err = dispatcher()
            .dispatch(&[ChatMessage::user("hi")], None)
            .await
            .unwrap_err();
        match err {
            RelayError::MissingApiKey(provider) => assert_eq!(provider, "gemini"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
