//! Model endpoint boundary.
//!
//! The agent only depends on [`LlmClient`]: given the transcript, a system
//! instruction and the tool schemas, return one response made of ordered
//! content blocks. [`AnthropicClient`] speaks the Messages API over HTTP.

mod anthropic;
mod types;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use thiserror::Error;

pub use anthropic::AnthropicClient;
pub use types::{
    ContentBlock, Message, MessageContent, MessageRequest, ModelResponse, Role, ToolSchema, Usage,
};

/// Failures talking to the model endpoint. These are never shown to the model.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode model response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A request/response model endpoint.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one request and wait for the complete response.
    async fn create_message(&self, request: &MessageRequest<'_>) -> Result<ModelResponse, LlmError>;
}
