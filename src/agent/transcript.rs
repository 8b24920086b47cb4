//! Conversation transcript for one agent run.

use crate::llm::{ContentBlock, Message};

/// Ordered, append-only turn history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with the user's prompt.
    pub fn new(prompt: &str) -> Self {
        Self {
            turns: vec![Message::user(prompt)],
        }
    }

    pub fn push_assistant(&mut self, blocks: Vec<ContentBlock>) {
        self.turns.push(Message::assistant(blocks));
    }

    pub fn push_tool_results(&mut self, results: Vec<ContentBlock>) {
        self.turns.push(Message::tool_results(results));
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
