//! Core agent loop implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::Config;
use crate::llm::{
    AnthropicClient, ContentBlock, LlmClient, LlmError, MessageRequest, ModelResponse, ToolSchema,
};
use crate::stats::SessionStats;
use crate::tools::ToolRegistry;

use super::events::{AgentEvent, EventSink};
use super::prompt::build_system_prompt;
use super::transcript::Transcript;

/// Failures that end an agent run. Tool failures never show up here.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Max iterations ({0}) reached without completion")]
    MaxIterations(usize),
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub transcript: Transcript,
    /// Text of the last assistant turn.
    pub final_text: String,
    pub iterations: usize,
}

/// The tools-in-a-loop agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    tool_schemas: Vec<ToolSchema>,
    system_prompt: String,
    workspace: PathBuf,
    model: String,
    max_tokens: u32,
    max_iterations: Option<usize>,
    request_timeout: Option<Duration>,
}

impl Agent {
    /// Create an agent talking to the Anthropic Messages API.
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let llm = Arc::new(AnthropicClient::new(
            config.api_key.clone(),
            &config.base_url,
        )?);
        Ok(Self::with_client(config, llm))
    }

    /// Create an agent with any model client.
    pub fn with_client(config: &Config, llm: Arc<dyn LlmClient>) -> Self {
        let tools = ToolRegistry::new(config.command_timeout);
        let tool_schemas = tools.get_tool_schemas();
        let workspace = config.workspace_path.clone();
        let system_prompt = build_system_prompt(&workspace.to_string_lossy(), &tools);

        Self {
            llm,
            tools,
            tool_schemas,
            system_prompt,
            workspace,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_iterations: config.max_iterations,
            request_timeout: config.request_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn workspace(&self) -> &std::path::Path {
        &self.workspace
    }

    /// Run one prompt to completion.
    ///
    /// Each iteration sends the whole transcript, appends the response as an
    /// assistant turn, then runs the requested tools in the order they were
    /// emitted. The run ends on the first response without tool requests.
    pub async fn run(
        &self,
        prompt: &str,
        stats: &mut SessionStats,
        sink: &mut dyn EventSink,
    ) -> Result<AgentRun, AgentError> {
        let mut transcript = Transcript::new(prompt);
        let mut iterations = 0usize;

        loop {
            if let Some(max) = self.max_iterations {
                if iterations >= max {
                    return Err(AgentError::MaxIterations(max));
                }
            }
            iterations += 1;
            tracing::debug!("Agent iteration {}", iterations);

            let response = self.call_model(&transcript).await?;
            let wants_tools = response.has_tool_use();
            stats.record_request(&response.usage);
            sink.emit(AgentEvent::Usage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            });

            let blocks: Vec<ContentBlock> = response
                .content
                .into_iter()
                .filter(|block| !matches!(block, ContentBlock::Unsupported))
                .collect();
            transcript.push_assistant(blocks.clone());

            let mut results = Vec::new();
            let mut final_text = Vec::new();
            for block in blocks {
                match block {
                    ContentBlock::Text { text } => {
                        final_text.push(text.clone());
                        sink.emit(AgentEvent::Text { content: text });
                    }
                    ContentBlock::ToolUse { id, name, input } => {
                        sink.emit(AgentEvent::ToolCall {
                            id: id.clone(),
                            name: name.clone(),
                            args: input.clone(),
                        });

                        let outcome = self.tools.execute(&name, input, &self.workspace).await;
                        if outcome.is_error() {
                            tracing::warn!("Tool {} failed: {}", name, outcome.content);
                        }
                        stats.record_tool(&outcome);

                        results.push(ContentBlock::ToolResult {
                            tool_use_id: id.clone(),
                            content: outcome.content.clone(),
                            is_error: outcome.is_error(),
                        });
                        sink.emit(AgentEvent::ToolResult { id, name, outcome });
                    }
                    ContentBlock::ToolResult { .. } | ContentBlock::Unsupported => {}
                }
            }

            if !wants_tools {
                return Ok(AgentRun {
                    transcript,
                    final_text: final_text.join("\n"),
                    iterations,
                });
            }

            transcript.push_tool_results(results);
        }
    }

    async fn call_model(&self, transcript: &Transcript) -> Result<ModelResponse, AgentError> {
        let request = MessageRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &self.system_prompt,
            messages: transcript.turns(),
            tools: &self.tool_schemas,
        };

        let call = self.llm.create_message(&request);
        let response = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AgentError::Timeout(limit))??,
            None => call.await?,
        };
        Ok(response)
    }
}
