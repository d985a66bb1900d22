//! Agent module - the conversational tool-calling loop.
//!
//! One agent owns one linear conversation. Each user turn runs the
//! "tools in a loop" pattern:
//! 1. Append the user message to history
//! 2. Call the model with the history and available tool schemas
//! 3. If the model requests tool calls, execute them via the tool client and
//!    append the results as tool turns
//! 4. Repeat until the model answers in text or the round limit trips

mod agent_loop;
mod extract;
mod prompt;

pub use agent_loop::{Agent, MAX_DEPTH_MESSAGE};
pub use prompt::build_system_prompt;
