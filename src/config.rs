//! Configuration management for mini-agent.
//!
//! Configuration can be set via environment variables:
//! - `ANTHROPIC_API_KEY` - API key for the model endpoint. Not checked here; a missing
//!   key surfaces as an authentication error from the endpoint.
//! - `ANTHROPIC_BASE_URL` - Optional. Endpoint base URL. Defaults to `https://api.anthropic.com`.
//! - `AGENT_MODEL` - Optional. Model identifier. Defaults to `claude-sonnet-4-5`.
//! - `AGENT_MAX_TOKENS` - Optional. Max output tokens per model call. Defaults to `4096`.
//! - `WORKSPACE_PATH` - Optional. The working directory for tools. Defaults to current directory.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `50`, `0` disables the cap.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Per model call timeout. Defaults to `300`, `0` disables it.
//! - `COMMAND_TIMEOUT_SECS` - Optional. Per `bash` invocation timeout. Unset or `0` disables it.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model endpoint API key
    pub api_key: String,

    /// Model endpoint base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Maximum output tokens requested per call
    pub max_tokens: u32,

    /// Working directory for file operations and shell commands
    pub workspace_path: PathBuf,

    /// Maximum iterations for the agent loop (`None` = unbounded)
    pub max_iterations: Option<usize>,

    /// Timeout applied to each model call
    pub request_timeout: Option<Duration>,

    /// Timeout applied to each `bash` tool invocation
    pub command_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY").unwrap_or_default();

        let base_url = lookup("ANTHROPIC_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = lookup("AGENT_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_tokens: u32 = parse_var(&lookup, "AGENT_MAX_TOKENS")?.unwrap_or(4096);

        let workspace_path = lookup("WORKSPACE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let max_iterations = match parse_var::<usize, _>(&lookup, "MAX_ITERATIONS")? {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(50),
        };

        let request_timeout = match parse_var::<u64, _>(&lookup, "REQUEST_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(300)),
        };

        let command_timeout = parse_var::<u64, _>(&lookup, "COMMAND_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_key,
            base_url,
            model,
            max_tokens,
            workspace_path,
            max_iterations,
            request_timeout,
            command_timeout,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model: String, workspace_path: PathBuf) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            max_tokens: 4096,
            workspace_path,
            max_iterations: Some(50),
            request_timeout: Some(Duration::from_secs(300)),
            command_timeout: None,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e)))
        })
        .transpose()
}
