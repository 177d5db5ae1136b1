//! Reply framing: canonical reply text into ordered wire records.

use serde::{Deserialize, Serialize};

/// One transport-level record carrying a fragment of the canonical
/// reply. Serialized on the wire as the JSON payload of an SSE record:
/// `data: {"content": ...}\n\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyFrame {
    pub content: String,
}

impl ReplyFrame {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Split a canonical reply into frames.
///
/// Pure, lazy and restartable: splits on newline boundaries, drops
/// payloads that are empty or whitespace-only, preserves relative
/// order. Concatenating the payloads with `\n` reconstructs the reply
/// minus blank lines.
pub fn reply_frames(reply: &str) -> impl Iterator<Item = ReplyFrame> + '_ {
    reply
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ReplyFrame::new)
}
