//! toolwire - interactive chat entry point.
//!
//! Reads user input line by line, drives the agent, and prints replies.
//! `exit` quits, `clear` resets the conversation.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolwire::agent::Agent;
use toolwire::config::{Config, ToolMode};
use toolwire::model::OpenAiCompatibleModel;
use toolwire::tools::{LocalToolClient, StdioToolClient, ToolClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the chat transcript.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    info!("Loaded configuration: model={}", config.model.name);

    let model = Arc::new(OpenAiCompatibleModel::new(&config)?);

    let tool_client: Option<Arc<dyn ToolClient>> = if config.tools.enabled {
        let client: Arc<dyn ToolClient> = match config.tools.mode {
            ToolMode::Local => Arc::new(LocalToolClient::with_builtins()),
            ToolMode::Stdio => {
                info!("Spawning tool worker: {}", config.tools.worker_command);
                Arc::new(StdioToolClient::spawn(
                    &config.tools.worker_command,
                    &config.tools.worker_args,
                )?)
            }
        };
        Some(client)
    } else {
        None
    };

    let mut agent = Agent::new(
        model,
        tool_client.clone(),
        config.context.max_history,
        config.agent.max_rounds,
    );

    println!("toolwire started!");
    println!(
        "Tool calling: {}",
        if config.tools.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("Max context messages: {}", config.context.max_history);
    println!("Type 'exit' to quit, 'clear' to reset conversation history.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "exit" => break,
            "clear" => {
                agent.clear_history();
                println!("Conversation history cleared.");
                continue;
            }
            _ => {}
        }

        match agent.chat(input).await {
            Ok(reply) => println!("Agent: {reply}\n"),
            // A failed turn does not end the session.
            Err(e) => eprintln!("Error processing request: {e}"),
        }
    }

    if let Some(client) = tool_client {
        if let Err(e) = client.close().await {
            warn!("failed to shut down tool worker cleanly: {e}");
        }
    }

    println!("Goodbye!");
    Ok(())
}
