//! Tool client backed by a worker subprocess.
//!
//! The worker is spawned once at construction and spoken to over its
//! stdin/stdout in newline-delimited JSON: one request object per line, one
//! response object per line. The protocol has no request ids and no
//! multiplexing, so correctness rests on strict request/response alternation:
//! a single mutex is held across each write-then-read pair, making exactly
//! one request outstanding per worker at any instant. Do not pipeline calls
//! through this transport without first adding ids to the wire format.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::protocol::{CallToolRequest, CallToolResponse, ListToolsRequest, ListToolsResponse};

use super::{ToolArguments, ToolClient, ToolError, ToolSpec};

/// Grace period between the interrupt signal and a force kill.
const SHUTDOWN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

struct WorkerLink {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// Makes a worker process's tools available through the [`ToolClient`]
/// contract, hiding subprocess and pipe mechanics.
pub struct StdioToolClient {
    link: Mutex<WorkerLink>,
}

impl StdioToolClient {
    /// Spawn the worker and take exclusive ownership of its stdin/stdout.
    ///
    /// Failure to spawn or to obtain either pipe is fatal; no half-initialized
    /// client is ever returned.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, ToolError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ToolError::WorkerUnavailable(format!("failed to spawn worker '{program}': {e}"))
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ToolError::WorkerUnavailable("failed to open worker stdin pipe".to_string())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ToolError::WorkerUnavailable("failed to open worker stdout pipe".to_string())
        })?;

        tracing::debug!(program, pid = child.id(), "spawned tool worker");

        Ok(Self {
            link: Mutex::new(WorkerLink {
                child,
                stdin,
                stdout: BufReader::new(stdout).lines(),
            }),
        })
    }

    /// Send one request line and read one response line. The lock is held for
    /// the full exchange so concurrent callers are serialized and responses
    /// cannot be attributed to the wrong request.
    async fn send_request<T: Serialize>(&self, req: &T) -> Result<String, ToolError> {
        let mut link = self.link.lock().await;

        let mut line = serde_json::to_vec(req)
            .map_err(|e| ToolError::WorkerUnavailable(format!("failed to encode request: {e}")))?;
        line.push(b'\n');

        link.stdin.write_all(&line).await.map_err(|e| {
            ToolError::WorkerUnavailable(format!("failed to write to worker: {e}"))
        })?;
        link.stdin.flush().await.map_err(|e| {
            ToolError::WorkerUnavailable(format!("failed to flush worker pipe: {e}"))
        })?;

        match link.stdout.next_line().await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(ToolError::WorkerUnavailable(
                "worker closed stdout before responding".to_string(),
            )),
            Err(e) => Err(ToolError::WorkerUnavailable(format!(
                "failed to read worker response: {e}"
            ))),
        }
    }
}

#[async_trait]
impl ToolClient for StdioToolClient {
    async fn call(&self, name: &str, args: &ToolArguments) -> Result<String, ToolError> {
        let req = CallToolRequest::new(name, args.clone());
        let line = self.send_request(&req).await?;

        let resp: CallToolResponse = serde_json::from_str(&line).map_err(|e| {
            ToolError::WorkerUnavailable(format!("malformed call_tool response: {e}"))
        })?;

        if !resp.error.is_empty() {
            return Err(ToolError::ExecutionFailed(resp.error));
        }
        Ok(resp.result)
    }

    async fn list(&self) -> Result<Vec<ToolSpec>, ToolError> {
        let line = self.send_request(&ListToolsRequest::new()).await?;

        let resp: ListToolsResponse = serde_json::from_str(&line).map_err(|e| {
            ToolError::WorkerUnavailable(format!("malformed list_tools response: {e}"))
        })?;
        Ok(resp.tools)
    }

    /// Graceful shutdown: interrupt, wait up to the fixed timeout, then force
    /// kill and reap. Safe if the worker already exited on its own.
    async fn close(&self) -> Result<(), ToolError> {
        let mut link = self.link.lock().await;

        #[cfg(unix)]
        if let Some(pid) = link.child.id() {
            // SAFETY: pid came from a child we own; kill(2) with SIGINT has no
            // memory-safety implications.
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGINT);
            }
        }
        #[cfg(not(unix))]
        {
            let _ = link.child.start_kill();
        }

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, link.child.wait()).await {
            Ok(_) => {
                tracing::debug!("tool worker exited after interrupt");
            }
            Err(_) => {
                tracing::warn!(
                    "tool worker ignored interrupt for {:?}, killing",
                    SHUTDOWN_TIMEOUT
                );
                let _ = link.child.start_kill();
                let _ = link.child.wait().await;
            }
        }
        Ok(())
    }
}
