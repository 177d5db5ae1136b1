//! chatrelay
//!
//! Streaming multi-provider chat relay. A conversation goes in, one of
//! several interchangeable LLM backends produces a reply, and the reply
//! comes back as an ordered stream of length-delimited records that the
//! consumer reassembles into a single growing message.
//!
//! The two public contracts:
//! - server side: [`relay::app`] and [`dispatch::Dispatcher`] validate,
//!   pick an adapter and stream the framed reply;
//! - client side: [`client::RelayClient`] and [`assembler::assemble`]
//!   consume a reply stream into an [`assembler::AssembledMessage`].
#![deny(unsafe_code)]

pub mod assembler;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod framing;
pub mod providers;
pub mod relay;
pub mod types;

pub use assembler::{AssembledMessage, MessageAssembler, MessageStatus, assemble, assemble_with};
pub use client::RelayClient;
pub use config::{GenerationDefaults, ProviderConfig, RelayConfig};
pub use dispatch::Dispatcher;
pub use error::RelayError;
pub use framing::{ReplyFrame, reply_frames};
pub use types::{ChatMessage, ChatRequest, MessageRole, ModelSelector};
