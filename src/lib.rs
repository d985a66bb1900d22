//! # toolwire
//!
//! A conversational agent that drives a remote language model and lets the
//! model invoke named tools, either in-process or in a separate worker
//! process reached over a newline-delimited JSON stdio protocol.
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Append the user message to the conversation history
//! 2. Call the model, offering the tool client's tool schemas
//! 3. Execute any requested tool calls and feed results back as tool turns
//! 4. Repeat until the model answers in text or the round limit trips
//!
//! Tool execution is abstracted behind [`tools::ToolClient`]:
//! [`tools::LocalToolClient`] runs handlers in-process, while
//! [`tools::StdioToolClient`] forwards calls to a worker subprocess speaking
//! the protocol in [`protocol`], with [`worker::WorkerServer`] as the
//! worker-side counterpart.

pub mod agent;
pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod tools;
pub mod worker;

pub use config::Config;
