//! Client-side frame decoding and message reassembly.
//!
//! Raw bytes arrive in arbitrary chunks unrelated to record
//! boundaries; an incremental SSE decoder recovers records on the
//! authoritative `\n\n` terminator and each payload is folded into a
//! single growing message. A record that fails to parse is dropped at
//! the record level and decoding continues with subsequent records.

use std::fmt;

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt, pin_mut};

use crate::framing::ReplyFrame;
use crate::types::MessageRole;

/// Lifecycle of an assembled reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Streaming,
    Complete,
    Errored,
}

/// The single growing assistant message a consumer renders.
///
/// Content is append-only while `status` is [`MessageStatus::Streaming`]
/// and immutable after; no transition leaves a terminal state. A new
/// user turn always starts a fresh message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledMessage {
    pub role: MessageRole,
    pub content: String,
    pub status: MessageStatus,
    /// True when the byte stream terminated unexpectedly rather than
    /// ending cleanly. Kept separate from `status` so partial content
    /// is never discarded or mislabeled as a provider failure.
    pub interrupted: bool,
}

impl AssembledMessage {
    fn new() -> Self {
        Self {
            role: MessageRole::Assistant,
            content: String::new(),
            status: MessageStatus::Streaming,
            interrupted: false,
        }
    }
}

/// Incremental decoder state folding wire records into an
/// [`AssembledMessage`].
#[derive(Debug)]
pub struct MessageAssembler {
    message: AssembledMessage,
    frames_parsed: usize,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self {
            message: AssembledMessage::new(),
            frames_parsed: 0,
        }
    }

    /// Fold one record payload into the message.
    ///
    /// Returns the appended payload on success. Empty payloads and
    /// payloads that fail to parse are dropped without terminating the
    /// stream; drops are logged at `warn` and otherwise invisible to
    /// the consumer.
    pub fn apply_record(&mut self, data: &str) -> Option<&str> {
        if self.message.status != MessageStatus::Streaming {
            return None;
        }
        let data = data.trim();
        if data.is_empty() {
            return None;
        }
        match serde_json::from_str::<ReplyFrame>(data) {
            Ok(frame) => {
                let start = self.message.content.len();
                self.message.content.push_str(&frame.content);
                self.message.content.push('\n');
                self.frames_parsed += 1;
                Some(&self.message.content[start..])
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed reply frame");
                None
            }
        }
    }

    /// Clean end of the byte stream.
    pub fn finish(&mut self) {
        self.close(false);
    }

    /// Unexpected termination of the byte stream. Accumulated content
    /// is kept and the message completes with `interrupted` set.
    pub fn interrupt(&mut self) {
        self.close(true);
    }

    fn close(&mut self, interrupted: bool) {
        if self.message.status != MessageStatus::Streaming {
            return;
        }
        self.message.interrupted = interrupted;
        self.message.status = if self.frames_parsed == 0 && self.message.content.is_empty() {
            MessageStatus::Errored
        } else {
            MessageStatus::Complete
        };
    }

    pub fn message(&self) -> &AssembledMessage {
        &self.message
    }

    pub fn into_message(self) -> AssembledMessage {
        self.message
    }
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble a reply from a raw byte stream.
pub async fn assemble<S, B, E>(byte_stream: S) -> AssembledMessage
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    assemble_with(byte_stream, |_| {}).await
}

/// Assemble a reply, invoking `on_append` after every decoded record
/// so a caller can render the growing message incrementally.
pub async fn assemble_with<S, B, E, F>(byte_stream: S, mut on_append: F) -> AssembledMessage
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
    F: FnMut(&AssembledMessage),
{
    let mut assembler = MessageAssembler::new();
    let events = byte_stream.eventsource();
    pin_mut!(events);

    while let Some(item) = events.next().await {
        match item {
            Ok(event) => {
                if assembler.apply_record(&event.data).is_some() {
                    on_append(assembler.message());
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "reply stream terminated unexpectedly");
                assembler.interrupt();
                return assembler.into_message();
            }
        }
    }

    assembler.finish();
    assembler.into_message()
}
