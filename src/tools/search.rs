//! Code search tool: regex search over file contents.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use walkdir::{DirEntry, WalkDir};

use super::{resolve_path, Tool};

const MAX_MATCHES: usize = 100;
const BINARY_SNIFF_BYTES: usize = 8192;
const SKIP_DIRS: &[&str] = &["node_modules"];

/// Search file contents with a regex.
pub struct GrepSearch;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrepSearchArgs {
    pub pattern: String,
    pub path: String,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,
}

fn default_recursive() -> bool {
    true
}

#[async_trait]
impl Tool for GrepSearch {
    type Args = GrepSearchArgs;

    fn name(&self) -> &'static str {
        "grep_search"
    }

    fn description(&self) -> &'static str {
        "Search for a regex pattern in file contents. Returns matching lines as path:line_number:line. Great for finding definitions, usages, or specific code patterns."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Regex pattern to search for"
                },
                "path": {
                    "type": "string",
                    "description": "File or directory to search, relative to the working directory or absolute"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Descend into subdirectories (default: true)"
                },
                "case_sensitive": {
                    "type": "boolean",
                    "description": "Whether search is case-sensitive (default: false)"
                },
                "file_extensions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional: only search files with these extensions (e.g., [\"rs\", \"py\"])"
                }
            },
            "required": ["pattern", "path"]
        })
    }

    async fn execute(&self, args: GrepSearchArgs, workspace: &Path) -> anyhow::Result<String> {
        let re = RegexBuilder::new(&args.pattern)
            .case_insensitive(!args.case_sensitive)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid regex pattern: {}", e))?;

        let root = resolve_path(workspace, &args.path);
        if !root.exists() {
            anyhow::bail!("Path not found: {}", args.path);
        }

        let workspace = workspace.to_path_buf();
        let extensions = args.file_extensions.as_deref().map(normalize_extensions);
        let recursive = args.recursive;

        // Directory walks are blocking filesystem work.
        let matches = tokio::task::spawn_blocking(move || {
            search(&root, &workspace, &re, recursive, extensions.as_deref())
        })
        .await?;

        if matches.is_empty() {
            return Ok(format!("No matches found for pattern: {}", args.pattern));
        }

        // One extra match is collected to tell a full page from a cut one.
        let truncated = matches.len() > MAX_MATCHES;
        let result = matches[..matches.len().min(MAX_MATCHES)].join("\n");
        if truncated {
            Ok(format!(
                "{}\n\n... (showing first {} matches)",
                result, MAX_MATCHES
            ))
        } else {
            Ok(result)
        }
    }
}

fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn search(
    root: &Path,
    workspace: &Path,
    re: &Regex,
    recursive: bool,
    extensions: Option<&[String]>,
) -> Vec<String> {
    let mut matches = Vec::new();

    if root.is_file() {
        grep_file(root, workspace, re, &mut matches);
        return matches;
    }

    let walker = WalkDir::new(root)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker.filter_map(|e| e.ok()) {
        if matches.len() > MAX_MATCHES {
            break;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(exts) = extensions {
            if !has_extension(entry.path(), exts) {
                continue;
            }
        }
        grep_file(entry.path(), workspace, re, &mut matches);
    }

    matches
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIP_DIRS.iter().any(|skip| *skip == name)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

/// Append `path:line:text` for each matching line. Unreadable or binary files are skipped.
fn grep_file(path: &Path, workspace: &Path, re: &Regex, matches: &mut Vec<String>) {
    if is_likely_binary(path) {
        return;
    }
    let Ok(bytes) = std::fs::read(path) else {
        return;
    };
    let content = String::from_utf8_lossy(&bytes);

    let display = path.strip_prefix(workspace).unwrap_or(path).to_string_lossy();

    for (idx, line) in content.lines().enumerate() {
        if matches.len() > MAX_MATCHES {
            break;
        }
        if re.is_match(line) {
            matches.push(format!("{}:{}:{}", display, idx + 1, line));
        }
    }
}

fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = std::fs::File::open(path) else {
        return true;
    };
    let mut buf = [0u8; BINARY_SNIFF_BYTES];
    match file.read(&mut buf) {
        Ok(n) => buf[..n].contains(&0),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pattern: &str, path: &str) -> GrepSearchArgs {
        GrepSearchArgs {
            pattern: pattern.to_string(),
            path: path.to_string(),
            recursive: true,
            case_sensitive: false,
            file_extensions: None,
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "one\ntwo\nfoobar\nfour\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn finds_match_with_line_number() {
        let dir = fixture();
        let out = GrepSearch.execute(args("foo", "."), dir.path()).await.unwrap();
        assert_eq!(out, "a.txt:3:foobar");
    }

    #[tokio::test]
    async fn reports_no_matches_explicitly() {
        let dir = fixture();
        let out = GrepSearch
            .execute(args("absent_pattern", "."), dir.path())
            .await
            .unwrap();
        assert!(out.starts_with("No matches found"));
    }

    #[tokio::test]
    async fn case_sensitivity_is_opt_in() {
        let dir = fixture();
        let out = GrepSearch.execute(args("FOO", "."), dir.path()).await.unwrap();
        assert!(out.contains("a.txt:3:foobar"));

        let mut strict = args("FOO", ".");
        strict.case_sensitive = true;
        let out = GrepSearch.execute(strict, dir.path()).await.unwrap();
        assert!(out.starts_with("No matches found"));
    }

    #[tokio::test]
    async fn invalid_regex_is_an_error() {
        let dir = fixture();
        let err = GrepSearch.execute(args("(unclosed", "."), dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Invalid regex"));
    }

    #[tokio::test]
    async fn skips_hidden_and_dependency_dirs() {
        let dir = fixture();
        for sub in [".git", "node_modules", "src"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
            std::fs::write(dir.path().join(sub).join("x.txt"), "foo here\n").unwrap();
        }

        let out = GrepSearch.execute(args("foo", "."), dir.path()).await.unwrap();
        assert!(out.contains("src/x.txt:1:foo here"));
        assert!(!out.contains(".git"));
        assert!(!out.contains("node_modules"));
    }

    #[tokio::test]
    async fn non_recursive_stays_at_top_level() {
        let dir = fixture();
        std::fs::create_dir(dir.path().join("deep")).unwrap();
        std::fs::write(dir.path().join("deep").join("b.txt"), "foo\n").unwrap();

        let mut shallow = args("foo", ".");
        shallow.recursive = false;
        let out = GrepSearch.execute(shallow, dir.path()).await.unwrap();
        assert_eq!(out, "a.txt:3:foobar");
    }

    #[tokio::test]
    async fn extension_filter_and_binary_skip() {
        let dir = fixture();
        std::fs::write(dir.path().join("code.rs"), "fn foo() {}\n").unwrap();
        std::fs::write(dir.path().join("blob.rs"), b"foo\0\x01\x02").unwrap();

        let mut filtered = args("foo", ".");
        filtered.file_extensions = Some(vec![".rs".to_string()]);
        let out = GrepSearch.execute(filtered, dir.path()).await.unwrap();
        assert_eq!(out, "code.rs:1:fn foo() {}");
    }

    #[tokio::test]
    async fn single_file_is_searched_directly() {
        let dir = fixture();
        let out = GrepSearch.execute(args("two", "a.txt"), dir.path()).await.unwrap();
        assert_eq!(out, "a.txt:2:two");
    }

    #[tokio::test]
    async fn searches_text_with_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("latin1.c"), b"/* caf\xe9 */\nint needle = 1;\n").unwrap();

        let out = GrepSearch.execute(args("needle", "."), dir.path()).await.unwrap();
        assert_eq!(out, "latin1.c:2:int needle = 1;");
    }

    #[tokio::test]
    async fn notice_only_when_matches_are_cut() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("exact.txt"), "hit\n".repeat(MAX_MATCHES)).unwrap();
        let out = GrepSearch.execute(args("hit", "."), dir.path()).await.unwrap();
        assert_eq!(out.lines().count(), MAX_MATCHES);
        assert!(!out.contains("showing first"));

        std::fs::write(dir.path().join("exact.txt"), "hit\n".repeat(MAX_MATCHES + 5)).unwrap();
        let out = GrepSearch.execute(args("hit", "."), dir.path()).await.unwrap();
        assert!(out.ends_with("... (showing first 100 matches)"));
        assert_eq!(out.lines().filter(|l| l.starts_with("exact.txt:")).count(), MAX_MATCHES);
    }

    #[tokio::test]
    async fn missing_path_is_an_error() {
        let dir = fixture();
        assert!(GrepSearch.execute(args("x", "ghost"), dir.path()).await.is_err());
    }
}
