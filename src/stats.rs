//! Session statistics.
//!
//! Counts model requests, tokens and tool calls for the life of the process.
//! The value is owned by the session shell and threaded into each agent run.

use crate::llm::Usage;
use crate::tools::ToolOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub tool_calls: u64,
    pub tool_errors: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed model request.
    pub fn record_request(&mut self, usage: &Usage) {
        self.requests += 1;
        self.input_tokens = self.input_tokens.saturating_add(usage.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(usage.output_tokens);

        tracing::debug!(
            input = usage.input_tokens,
            output = usage.output_tokens,
            total = self.total_tokens(),
            "Model usage recorded"
        );
    }

    pub fn record_tool(&mut self, outcome: &ToolOutcome) {
        self.tool_calls += 1;
        if outcome.is_error() {
            self.tool_errors += 1;
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} request(s) · {} tokens ({} in / {} out) · {} tool call(s), {} failed",
            self.requests,
            self.total_tokens(),
            self.input_tokens,
            self.output_tokens,
            self.tool_calls,
            self.tool_errors
        )
    }
}
