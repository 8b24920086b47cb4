//! File tools: read, write and list.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{resolve_path, Tool, ToolError};

/// Read a file's contents.
pub struct ReadFile;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadFileArgs {
    pub path: String,
}

#[async_trait]
impl Tool for ReadFile {
    type Args = ReadFileArgs;

    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read the full contents of a file. Relative paths are resolved against the working directory."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file, relative to the working directory or absolute"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: ReadFileArgs, workspace: &Path) -> anyhow::Result<String> {
        let path = resolve_path(workspace, &args.path);

        let metadata = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("Cannot access {}", args.path))?;
        if metadata.is_dir() {
            anyhow::bail!("{} is a directory, not a file", args.path);
        }

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", args.path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Create or overwrite a file.
pub struct WriteFile;

/// Arguments as sent by the model, before the `content` check.
#[derive(Debug, Deserialize)]
pub(super) struct RawWriteFileArgs {
    path: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteFileArgs {
    pub path: String,
    pub content: String,
}

impl TryFrom<RawWriteFileArgs> for WriteFileArgs {
    type Error = ToolError;

    fn try_from(raw: RawWriteFileArgs) -> Result<Self, Self::Error> {
        let content = raw.content.ok_or(ToolError::MissingArgument {
            tool: "write_file".to_string(),
            argument: "content",
        })?;
        Ok(Self {
            path: raw.path,
            content,
        })
    }
}

#[async_trait]
impl Tool for WriteFile {
    // Decoded through `RawWriteFileArgs`; see `ToolInvocation::parse`.
    type Args = WriteFileArgs;

    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Write content to a file, creating it or replacing any existing content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the file, relative to the working directory or absolute"
                },
                "content": {
                    "type": "string",
                    "description": "The full content to write"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, args: WriteFileArgs, workspace: &Path) -> anyhow::Result<String> {
        let path = resolve_path(workspace, &args.path);

        tokio::fs::write(&path, args.content.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", args.path))?;

        tracing::debug!("Wrote {} bytes to {}", args.content.len(), path.display());
        Ok(format!(
            "Successfully wrote {} bytes to {}",
            args.content.len(),
            args.path
        ))
    }
}

/// List a directory's immediate children.
pub struct ListDir;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListDirArgs {
    pub path: String,
}

#[async_trait]
impl Tool for ListDir {
    type Args = ListDirArgs;

    fn name(&self) -> &'static str {
        "list_dir"
    }

    fn description(&self) -> &'static str {
        "List the entries of a directory, one per line. Directories end with '/'. Not recursive."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list, relative to the working directory or absolute"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: ListDirArgs, workspace: &Path) -> anyhow::Result<String> {
        let path = resolve_path(workspace, &args.path);

        let metadata = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("Cannot access {}", args.path))?;
        if !metadata.is_dir() {
            anyhow::bail!("{} is not a directory", args.path);
        }

        let mut reader = tokio::fs::read_dir(&path)
            .await
            .with_context(|| format!("Failed to list {}", args.path))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push(if is_dir { format!("{}/", name) } else { name });
        }

        if entries.is_empty() {
            return Ok("(empty directory)".to_string());
        }

        entries.sort();
        Ok(entries.join("\n"))
    }
}
