//! Session shell: one-shot and interactive front ends for the agent.

use std::io::Write;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::agent::{Agent, AgentEvent, EventSink};
use crate::stats::SessionStats;
use crate::tools::truncate_str;

const RESULT_PREVIEW_CHARS: usize = 200;
const ARG_PREVIEW_CHARS: usize = 60;

/// Prints agent events as they happen.
pub struct TerminalRenderer<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> TerminalRenderer<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }
}

impl<W: Write> EventSink for TerminalRenderer<'_, W> {
    fn emit(&mut self, event: AgentEvent) {
        let written = match event {
            AgentEvent::Text { content } => writeln!(self.out, "{}", content.trim_end()),
            AgentEvent::ToolCall { name, args, .. } => {
                writeln!(self.out, "▸ {}({})", name, render_args(&args))
            }
            AgentEvent::ToolResult { outcome, .. } => {
                let marker = if outcome.is_error() { "✗" } else { "→" };
                writeln!(self.out, "  {} {}", marker, preview(&outcome.content))
            }
            AgentEvent::Usage { .. } => Ok(()),
        };
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

/// `key=value` pairs with long values shortened.
fn render_args(args: &Value) -> String {
    match args {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => format!("{:?}", shorten(s, ARG_PREVIEW_CHARS)),
                    other => shorten(&other.to_string(), ARG_PREVIEW_CHARS),
                };
                format!("{}={}", key, rendered)
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => shorten(&other.to_string(), ARG_PREVIEW_CHARS),
    }
}

/// Single-line preview of a tool result.
fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    shorten(&flat, RESULT_PREVIEW_CHARS)
}

fn shorten(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}…", truncate_str(s, max_len))
    }
}

/// One user session: the agent, its running statistics and the output.
pub struct Session<W: Write> {
    agent: Agent,
    stats: SessionStats,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(agent: Agent, out: W) -> Self {
        Self {
            agent,
            stats: SessionStats::new(),
            out,
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Run a single prompt. Loop-level errors propagate to the caller.
    pub async fn run_once(&mut self, prompt: &str) -> anyhow::Result<String> {
        let run = self.run_prompt(prompt).await?;
        self.print_stats()?;
        Ok(run)
    }

    /// Read prompts line by line until `exit` or end of input.
    pub async fn run_interactive<R>(&mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(
            self.out,
            "mini-agent · model: {} · workspace: {}",
            self.agent.model(),
            self.agent.workspace().display()
        )?;
        writeln!(
            self.out,
            "Each prompt starts a fresh conversation. Type 'exit' to quit."
        )?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "\n> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") {
                break;
            }

            if let Err(e) = self.run_prompt(line).await {
                tracing::error!("Agent run failed: {:#}", e);
                writeln!(self.out, "Error: agent run failed")?;
            }
        }

        self.print_stats()?;
        Ok(())
    }

    async fn run_prompt(&mut self, prompt: &str) -> anyhow::Result<String> {
        let mut renderer = TerminalRenderer::new(&mut self.out);
        let run = self.agent.run(prompt, &mut self.stats, &mut renderer).await?;
        tracing::info!(
            iterations = run.iterations,
            turns = run.transcript.len(),
            "Agent run complete"
        );
        Ok(run.final_text)
    }

    fn print_stats(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "\n[{}]", self.stats.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::testing::{response, text, tool_use, ScriptedClient};
    use crate::llm::LlmError;
    use crate::tools::ToolOutcome;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    fn session(client: Arc<ScriptedClient>, workspace: &std::path::Path) -> Session<Vec<u8>> {
        let config = Config::new("k".to_string(), "test-model".to_string(), workspace.to_path_buf());
        Session::new(Agent::with_client(&config, client), Vec::new())
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(&session.out).into_owned()
    }

    #[tokio::test]
    async fn one_shot_prints_trace_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![
            response(vec![
                text("Checking."),
                tool_use("t1", "read_file", json!({"path": "a.txt"})),
            ]),
            response(vec![text("It says alpha.")]),
        ]));
        let mut session = session(client, dir.path());

        let answer = session.run_once("what is in a.txt?").await.unwrap();
        assert_eq!(answer, "It says alpha.");

        let out = output(&session);
        assert!(out.contains("Checking."));
        assert!(out.contains("▸ read_file(path=\"a.txt\")"));
        assert!(out.contains("→ alpha"));
        assert!(out.contains("It says alpha."));
        assert!(out.contains("2 request(s)"));
        assert_eq!(session.stats().requests, 2);
    }

    #[tokio::test]
    async fn one_shot_propagates_endpoint_errors() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient {
            responses: Mutex::new(VecDeque::from(vec![Err(LlmError::Api {
                status: 500,
                body: "overloaded".to_string(),
            })])),
            ..Default::default()
        });
        let mut session = session(client, dir.path());
        assert!(session.run_once("hi").await.is_err());
    }

    #[tokio::test]
    async fn interactive_skips_blank_lines_and_stops_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient::new(vec![
            response(vec![text("first answer")]),
            response(vec![text("second answer")]),
        ]));
        let mut session = session(client.clone(), dir.path());

        let input = tokio_test::io::Builder::new()
            .read(b"hello\n\n   \nagain\nEXIT\nnever sent\n")
            .build();
        session
            .run_interactive(tokio::io::BufReader::new(input))
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        // Each line starts a fresh transcript.
        assert_eq!(requests[1].len(), 1);

        let out = output(&session);
        assert!(out.contains("fresh conversation"));
        assert!(out.contains("first answer"));
        assert!(out.contains("second answer"));
        assert!(out.contains("2 request(s)"));
    }

    #[tokio::test]
    async fn interactive_reports_errors_and_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient {
            responses: Mutex::new(VecDeque::from(vec![
                Err(LlmError::Api {
                    status: 401,
                    body: "invalid x-api-key".to_string(),
                }),
                Ok(response(vec![text("recovered")])),
            ])),
            ..Default::default()
        });
        let mut session = session(client, dir.path());

        let input = tokio_test::io::Builder::new().read(b"one\ntwo\n").build();
        session
            .run_interactive(tokio::io::BufReader::new(input))
            .await
            .unwrap();

        let out = output(&session);
        assert!(out.contains("Error: agent run failed"));
        assert!(!out.contains("invalid x-api-key"));
        assert!(out.contains("recovered"));
    }

    #[test]
    fn renderer_marks_tool_errors_and_truncates() {
        let mut buf = Vec::new();
        {
            let mut renderer = TerminalRenderer::new(&mut buf);
            renderer.emit(AgentEvent::ToolResult {
                id: "t".to_string(),
                name: "read_file".to_string(),
                outcome: ToolOutcome::error("nope"),
            });
            renderer.emit(AgentEvent::ToolResult {
                id: "t".to_string(),
                name: "bash".to_string(),
                outcome: ToolOutcome::success("y\n".repeat(500)),
            });
        }
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  ✗ Error: nope");
        assert!(lines[1].ends_with('…'));
        assert!(lines[1].len() < RESULT_PREVIEW_CHARS + 16);
    }

    #[test]
    fn render_args_is_compact() {
        let rendered = render_args(&json!({"path": "src", "recursive": false}));
        assert!(rendered.contains("path=\"src\""));
        assert!(rendered.contains("recursive=false"));
    }
}
