//! System prompt template for the agent.

use crate::tools::ToolRegistry;

/// Build the system prompt with the working directory and tool list.
pub fn build_system_prompt(workspace_path: &str, tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful coding assistant running in a terminal. You operate in the working directory: {workspace_path}

## Tools

You have access to the following tools:
{tool_descriptions}

## Guidelines

1. **Use tools instead of guessing** - Read files, list directories and run commands to check the actual state.

2. **Read before edit** - Read a file's contents before overwriting it, unless you're creating a new file.

3. **Paths** - Relative paths are resolved against the working directory above.

4. **Errors are information** - Tool failures come back as text starting with "Error:". Read them and adjust.

5. **Finish with an answer** - When you are done, reply with plain text and no tool calls."#,
        workspace_path = workspace_path,
        tool_descriptions = tool_descriptions
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_workspace_and_tools() {
        let prompt = build_system_prompt("/home/dev/project", &ToolRegistry::default());
        assert!(prompt.contains("/home/dev/project"));
        for name in ["read_file", "write_file", "list_dir", "bash", "grep_search"] {
            assert!(prompt.contains(&format!("**{}**", name)), "missing {}", name);
        }
    }
}
