//! Error handling for the relay core.
//!
//! One taxonomy covers both sides of the wire: request validation and
//! provider failures on the server side, record decoding on the client
//! side. Helpers map errors to HTTP status codes and to user-facing
//! messages that never carry upstream-internal detail.

use thiserror::Error;

/// Errors produced by the relay core.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed request body (missing, empty, or wrong-typed `messages`).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model selector outside the closed set of supported providers.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// The selected provider has no credential configured.
    #[error("Missing API key for provider: {0}")]
    MissingApiKey(String),

    /// Provider or process configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream call completed with a non-success status.
    #[error("API error from {provider} (status {status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// Upstream succeeded but the reply field was missing or empty.
    #[error("Empty reply from provider: {0}")]
    EmptyReply(String),

    /// A payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The record stream failed mid-flight.
    #[error("Stream error: {0}")]
    Stream(String),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelayError {
    /// HTTP status equivalent for non-streaming error responses.
    ///
    /// Only meaningful for errors raised before the first byte of a
    /// reply has been streamed; after that point the response shape is
    /// fixed and the stream is simply closed.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::InvalidModel(_) => 400,
            Self::MissingApiKey(_) | Self::Configuration(_) => 500,
            Self::Http(_) | Self::Api { .. } | Self::EmptyReply(_) => 502,
            Self::Parse(_) | Self::Stream(_) | Self::Json(_) => 502,
        }
    }

    /// Message safe to forward to a consumer.
    ///
    /// Validation and configuration failures are explicit; provider
    /// failures collapse to a generic notice so upstream error bodies
    /// never leak through the relay.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(_) | Self::InvalidModel(_) => self.to_string(),
            Self::MissingApiKey(provider) => {
                format!("Provider is not configured: {provider}")
            }
            Self::Configuration(_) => "Relay is not configured correctly".to_string(),
            Self::Http(_)
            | Self::Api { .. }
            | Self::EmptyReply(_)
            | Self::Parse(_)
            | Self::Stream(_)
            | Self::Json(_) => "Failed to get a reply from the model provider".to_string(),
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(RelayError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(RelayError::InvalidModel("x".into()).status_code(), 400);
    }

    #[test]
    fn provider_failures_are_gateway_errors() {
        let err = RelayError::Api {
            provider: "gemini".into(),
            status: 429,
            message: "quota".into(),
        };
        assert_eq!(err.status_code(), 502);
        assert_eq!(RelayError::EmptyReply("gemini".into()).status_code(), 502);
    }

    #[test]
    fn user_message_masks_upstream_detail() {
        let err = RelayError::Api {
            provider: "gemini".into(),
            status: 500,
            message: "internal quota table exploded".into(),
        };
        assert!(!err.user_message().contains("quota table"));

        let validation = RelayError::InvalidModel("claude".into());
        assert!(validation.user_message().contains("claude"));
    }
}
