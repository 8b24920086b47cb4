//! # mini-agent
//!
//! A minimal coding agent for the terminal.
//!
//! This library provides:
//! - A tool-invocation loop over a hosted model (Anthropic Messages API)
//! - Five local tools: `read_file`, `write_file`, `list_dir`, `bash`, `grep_search`
//! - One-shot and interactive session shells
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Take a prompt from the command line or standard input
//! 2. Send the transcript with the system prompt and tool schemas
//! 3. Execute any tool calls in order and feed results back
//! 4. Repeat until the model answers without requesting tools
//!
//! ## Example
//!
//! ```rust,ignore
//! use mini_agent::{agent::Agent, config::Config, session::Session};
//!
//! let config = Config::from_env()?;
//! let mut session = Session::new(Agent::new(&config)?, std::io::stdout());
//! session.run_once("List the files in this directory").await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod session;
pub mod stats;
pub mod tools;

pub use config::Config;
