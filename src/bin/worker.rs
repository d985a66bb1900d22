//! toolwire-worker - tool worker entry point.
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line until stdin reaches end-of-stream. Every iteration is
//! independent: malformed input produces an error response and the loop
//! keeps serving. Logs go to stderr only; stdout is the protocol channel.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolwire::worker::WorkerServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let server = WorkerServer::with_builtins();
    tracing::info!("tool worker ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let response = server.handle_line(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, worker exiting");
    Ok(())
}
