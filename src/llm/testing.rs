//! Scripted model client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{ContentBlock, LlmClient, LlmError, Message, MessageRequest, ModelResponse, Usage};

/// Replays canned responses and records every request's transcript.
#[derive(Default)]
pub struct ScriptedClient {
    pub responses: Mutex<VecDeque<Result<ModelResponse, LlmError>>>,
    pub seen: Mutex<Vec<Vec<Message>>>,
    pub delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn create_message(&self, request: &MessageRequest<'_>) -> Result<ModelResponse, LlmError> {
        self.seen.lock().unwrap().push(request.messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| panic!("no scripted response left"))
    }
}

pub fn response(content: Vec<ContentBlock>) -> ModelResponse {
    ModelResponse {
        id: "msg".to_string(),
        content,
        stop_reason: None,
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}

pub fn text(s: &str) -> ContentBlock {
    ContentBlock::Text {
        text: s.to_string(),
    }
}

pub fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
    ContentBlock::ToolUse {
        id: id.to_string(),
        name: name.to_string(),
        input,
    }
}
