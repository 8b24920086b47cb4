//! Agent module - the core tool-invocation loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Start a transcript with the user's prompt
//! 2. Call the model with the transcript, system prompt and tool schemas
//! 3. Run every tool the model asked for, in order, and append the results
//! 4. Repeat until a response contains no tool requests

mod agent_loop;
mod events;
mod prompt;
mod transcript;

pub use agent_loop::{Agent, AgentError, AgentRun};
pub use events::{AgentEvent, EventSink};
pub use prompt::build_system_prompt;
pub use transcript::Transcript;
