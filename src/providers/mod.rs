//! Provider adapters.
//!
//! One adapter per upstream call shape. Each adapter converts the
//! canonical conversation into its backend's request shape, executes a
//! single outbound call and extracts the completed reply text. Retry
//! policy lives with the caller, never inside an adapter.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::ChatMessage;

mod gemini;
mod openai_compat;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;

/// Uniform capability contract implemented once per provider.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Stable id used in logs and error reports.
    fn id(&self) -> &str;

    /// Produce one completed reply for the conversation.
    async fn get_reply(&self, messages: &[ChatMessage]) -> Result<String, RelayError>;
}

/// Turn a non-success upstream response into an [`RelayError::Api`].
///
/// The body is read for diagnostics only; `user_message()` keeps it out
/// of anything forwarded to a consumer.
pub(crate) async fn api_error(provider: &str, response: reqwest::Response) -> RelayError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    tracing::error!(provider, status, %message, "upstream call failed");
    RelayError::Api {
        provider: provider.to_string(),
        status,
        message,
    }
}
