//! System prompt for the agent.

/// Build the system message that seeds every fresh conversation.
pub fn build_system_prompt() -> String {
    "You are a helpful assistant. When one of the available tools can answer \
     the user's question, call it instead of guessing; otherwise answer \
     directly and concisely."
        .to_string()
}
