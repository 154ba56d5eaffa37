//! Provider trait for live analysis.
//!
//! The analyzer sees the language model only through [`ChatProvider`]: an
//! ordered list of messages goes in, generated text or a [`RelayError`]
//! comes out. Every error is recoverable from the analyzer's point of view;
//! it substitutes a canned response instead of propagating.
//!
//! [`RelayError`]: crate::RelayError

use async_trait::async_trait;

use crate::Result;
use crate::types::{ChatOptions, ChatResponse, Message};

/// Chat-completion provider.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Non-streaming chat completion.
    ///
    /// Implementations should return [`RelayError::EmptyResponse`](crate::RelayError::EmptyResponse)
    /// rather than an empty `content`.
    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse>;
}
