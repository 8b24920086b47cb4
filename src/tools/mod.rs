//! Tool registry and executor.
//!
//! The tool set is compiled in: `read_file`, `write_file`, `list_dir`, `bash`
//! and `grep_search`. Arguments from the model are decoded into a
//! [`ToolInvocation`] before anything runs, and every outcome (including
//! failures) comes back as text so the model can react to it.

mod fs;
mod search;
mod terminal;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::llm::ToolSchema;

pub use fs::{ListDir, ListDirArgs, ReadFile, ReadFileArgs, WriteFile, WriteFileArgs};
pub use search::{GrepSearch, GrepSearchArgs};
pub use terminal::{Bash, BashArgs};

/// A locally executed tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Validated argument shape.
    type Args: DeserializeOwned + Send;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema for the arguments, shown to the model.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Self::Args, workspace: &Path) -> anyhow::Result<String>;
}

/// Argument problems caught before a tool runs.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Missing required argument '{argument}' for {tool}")]
    MissingArgument { tool: String, argument: &'static str },
}

/// One tool call with its decoded arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    ReadFile(ReadFileArgs),
    WriteFile(WriteFileArgs),
    ListDir(ListDirArgs),
    Bash(BashArgs),
    GrepSearch(GrepSearchArgs),
}

impl ToolInvocation {
    /// Decode model-supplied arguments for the named tool.
    pub fn parse(name: &str, args: Value) -> Result<Self, ToolError> {
        match name {
            "read_file" => decode(name, args).map(Self::ReadFile),
            "write_file" => {
                let raw: fs::RawWriteFileArgs = decode(name, args)?;
                WriteFileArgs::try_from(raw).map(Self::WriteFile)
            }
            "list_dir" => decode(name, args).map(Self::ListDir),
            "bash" => decode(name, args).map(Self::Bash),
            "grep_search" => decode(name, args).map(Self::GrepSearch),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadFile(_) => "read_file",
            Self::WriteFile(_) => "write_file",
            Self::ListDir(_) => "list_dir",
            Self::Bash(_) => "bash",
            Self::GrepSearch(_) => "grep_search",
        }
    }
}

fn decode<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Whether a tool call succeeded, as far as the shell is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolResultKind {
    Success,
    ToolError,
}

/// Text handed back to the model plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub kind: ToolResultKind,
    pub content: String,
}

impl ToolOutcome {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            kind: ToolResultKind::Success,
            content: content.into(),
        }
    }

    pub fn error(err: impl fmt::Display) -> Self {
        Self {
            kind: ToolResultKind::ToolError,
            content: format!("Error: {:#}", err),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToolResultKind::ToolError
    }
}

/// Name and description of a registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// The fixed set of tools offered to the model.
pub struct ToolRegistry {
    read_file: ReadFile,
    write_file: WriteFile,
    list_dir: ListDir,
    bash: Bash,
    grep_search: GrepSearch,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ToolRegistry {
    /// Create the registry. `command_timeout` bounds each `bash` call.
    pub fn new(command_timeout: Option<Duration>) -> Self {
        Self {
            read_file: ReadFile,
            write_file: WriteFile,
            list_dir: ListDir,
            bash: Bash::new(command_timeout),
            grep_search: GrepSearch,
        }
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        vec![
            info(&self.read_file),
            info(&self.write_file),
            info(&self.list_dir),
            info(&self.bash),
            info(&self.grep_search),
        ]
    }

    /// Schemas passed verbatim to the model on every turn.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        vec![
            schema(&self.read_file),
            schema(&self.write_file),
            schema(&self.list_dir),
            schema(&self.bash),
            schema(&self.grep_search),
        ]
    }

    /// Run one tool call. Never fails: errors are folded into the outcome text.
    pub async fn execute(&self, name: &str, args: Value, workspace: &Path) -> ToolOutcome {
        let invocation = match ToolInvocation::parse(name, args) {
            Ok(invocation) => invocation,
            Err(e) => {
                tracing::debug!("Rejected tool call {}: {}", name, e);
                return ToolOutcome::error(e);
            }
        };

        let result = match invocation {
            ToolInvocation::ReadFile(args) => self.read_file.execute(args, workspace).await,
            ToolInvocation::WriteFile(args) => self.write_file.execute(args, workspace).await,
            ToolInvocation::ListDir(args) => self.list_dir.execute(args, workspace).await,
            ToolInvocation::Bash(args) => self.bash.execute(args, workspace).await,
            ToolInvocation::GrepSearch(args) => self.grep_search.execute(args, workspace).await,
        };

        match result {
            Ok(output) => ToolOutcome::success(output),
            Err(e) => ToolOutcome::error(e),
        }
    }
}

fn info<T: Tool>(tool: &T) -> ToolInfo {
    ToolInfo {
        name: tool.name(),
        description: tool.description(),
    }
}

fn schema<T: Tool>(tool: &T) -> ToolSchema {
    ToolSchema {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        input_schema: tool.parameters_schema(),
    }
}

/// Resolve a tool path against the workspace; absolute paths pass through.
pub fn resolve_path(workspace: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        workspace.join(candidate)
    }
}

/// Cut `s` to at most `max_len` bytes on a char boundary.
pub(crate) fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
