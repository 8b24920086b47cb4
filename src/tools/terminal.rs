//! Terminal/shell command execution tool.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::Command;

use super::{truncate_str, Tool};

const MAX_OUTPUT_CHARS: usize = 30_000;

/// Run a shell command.
pub struct Bash {
    timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BashArgs {
    pub command: String,
}

impl Bash {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Tool for Bash {
    type Args = BashArgs;

    fn name(&self) -> &'static str {
        "bash"
    }

    fn description(&self) -> &'static str {
        "Execute a shell command in the working directory. Returns the exit code, stdout and stderr. Use for running tests, builds, git, etc."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: BashArgs, workspace: &Path) -> anyhow::Result<String> {
        tracing::info!("Executing command: {}", args.command);

        // Determine shell based on OS
        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let mut cmd = Command::new(shell);
        cmd.arg(shell_arg)
            .arg(&args.command)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let child = cmd.output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child).await.map_err(|_| {
                anyhow::anyhow!("Command timed out after {:?}", limit)
            })?,
            None => child.await,
        }
        .map_err(|e| anyhow::anyhow!("Failed to execute command: {}", e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let exit_code = output.status.code().unwrap_or(-1);

        tracing::debug!(exit_code, "Command finished");

        Ok(format_output(exit_code, &stdout, &stderr))
    }
}

fn format_output(exit_code: i32, stdout: &str, stderr: &str) -> String {
    let mut result = format!("Exit code: {}\n", exit_code);

    if !stdout.is_empty() {
        result.push_str("\n--- stdout ---\n");
        result.push_str(stdout);
    }

    if !stderr.is_empty() {
        result.push_str("\n--- stderr ---\n");
        result.push_str(stderr);
    }

    if result.len() > MAX_OUTPUT_CHARS {
        let mut truncated = truncate_str(&result, MAX_OUTPUT_CHARS).to_string();
        truncated.push_str("\n... [output truncated]");
        return truncated;
    }

    result
}
