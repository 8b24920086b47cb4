//! Events emitted while the agent loop runs.

use serde_json::Value;

use crate::tools::ToolOutcome;

/// Progress of one agent run, in the order it happens.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Assistant text block.
    Text { content: String },
    /// The model asked for a tool call; it is about to run.
    ToolCall { id: String, name: String, args: Value },
    /// Tool execution completed.
    ToolResult {
        id: String,
        name: String,
        outcome: ToolOutcome,
    },
    /// Token usage of one model call.
    Usage {
        input_tokens: u64,
        output_tokens: u64,
    },
}

/// Receiver of [`AgentEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: AgentEvent);
}

/// Collects events, mostly for tests.
impl EventSink for Vec<AgentEvent> {
    fn emit(&mut self, event: AgentEvent) {
        self.push(event);
    }
}
