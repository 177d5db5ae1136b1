//! HTTP relay: request validation, dispatch and SSE streaming.
//!
//! Validation and provider failures are decided before the first byte
//! of a reply is written, so they surface as non-streaming structured
//! errors. Once streaming has begun the response shape is fixed: any
//! later failure only closes the channel, and the consumer's own
//! end-of-stream handling is the signal.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::dispatch::Dispatcher;
use crate::error::RelayError;
use crate::framing::reply_frames;
use crate::types::ChatRequest;

/// Shared per-process state: the dispatcher over the read-only
/// provider configuration.
pub struct RelayState {
    pub dispatcher: Dispatcher,
}

/// Build the relay application for a configuration.
pub fn app(config: &RelayConfig) -> Result<Router, RelayError> {
    let dispatcher = Dispatcher::new(config)?;
    Ok(router(Arc::new(RelayState { dispatcher })))
}

/// Build the relay router around existing state.
pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state)
}

async fn chat_handler(
    State(state): State<Arc<RelayState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return error_response(&RelayError::InvalidInput(rejection.body_text()));
        }
    };

    if request.messages.is_empty() {
        return error_response(&RelayError::InvalidInput(
            "messages must be a non-empty array".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    let reply = match state
        .dispatcher
        .dispatch(&request.messages, request.model.as_deref())
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(%request_id, error = %e, "chat request failed before streaming");
            return error_response(&e);
        }
    };

    tracing::debug!(%request_id, chars = reply.len(), "streaming reply");
    frame_stream_response(reply)
}

/// Stream the reply as SSE records, one `data: {"content": ...}`
/// record per frame, flushed per record, closing the channel when the
/// frames run out. Frames are produced lazily from the reply text so
/// the relay hop never holds a second copy of the whole reply.
fn frame_stream_response(reply: String) -> Response {
    let stream = async_stream::stream! {
        for frame in reply_frames(&reply) {
            let data = serde_json::to_string(&frame).unwrap_or_else(|_| "{}".to_string());
            yield Ok::<Event, Infallible>(Event::default().data(data));
        }
    };
    Sse::new(stream).into_response()
}

fn error_response(error: &RelayError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({ "error": error.user_message() });
    (status, Json(body)).into_response()
}
