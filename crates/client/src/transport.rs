//! Transport layer.
//!
//! A transport delivers one request line to a tool server and hands back
//! the first non-empty line of its answer. The only real implementation is
//! [`StdioTransport`], which spawns a fresh child process per exchange.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use tc_domain::config::{ServerLaunchConfig, StderrMode};
use tc_domain::trace::TraceEvent;

use crate::client::ClientError;

/// Trait for tool server transports.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Send one newline-terminated request line and collect the response line.
    async fn exchange(&self, request_line: &str) -> Result<Exchange, ClientError>;
}

/// What came back from a single exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    /// First non-empty response line, trimmed. `None` if the server closed
    /// its output without writing one.
    pub line: Option<String>,
    /// Server exit code, when it exited normally. Diagnostic only.
    pub exit_code: Option<i32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Stdio transport
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How long a server may keep running after it has answered before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Stdio transport: one child process per exchange.
///
/// The request is written to the child's stdin, which is then closed. The
/// child's stdout is read up to the first non-empty line and then dropped,
/// so anything the server prints afterwards is never consumed.
pub struct StdioTransport {
    config: ServerLaunchConfig,
    response_timeout: Option<Duration>,
}

impl StdioTransport {
    pub fn new(config: ServerLaunchConfig, response_timeout: Option<Duration>) -> Self {
        Self {
            config,
            response_timeout,
        }
    }

    fn spawn(&self) -> Result<Child, ClientError> {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(match self.config.stderr {
                StderrMode::Inherit => Stdio::inherit(),
                StderrMode::Null => Stdio::null(),
            })
            .kill_on_drop(true);

        if let Some(ref cwd) = self.config.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }

        let command = self.config.display_command();
        let child = cmd.spawn().map_err(|source| {
            tracing::error!(
                command = %command,
                error = %source,
                "tool server command not found; is it built and reachable from the cwd?"
            );
            ClientError::Launch {
                command: command.clone(),
                source,
            }
        })?;

        TraceEvent::ServerSpawned {
            command,
            pid: child.id(),
        }
        .emit();

        Ok(child)
    }
}

#[async_trait]
impl ToolTransport for StdioTransport {
    async fn exchange(&self, request_line: &str) -> Result<Exchange, ClientError> {
        let mut child = self.spawn()?;

        let Some(stdin) = child.stdin.take() else {
            tracing::error!("could not open stdin of tool server");
            terminate(&mut child).await;
            return Err(ClientError::StdinUnavailable);
        };
        let Some(stdout) = child.stdout.take() else {
            tracing::error!("could not open stdout of tool server");
            terminate(&mut child).await;
            return Err(ClientError::StdoutUnavailable);
        };

        // The deadline covers the write as well: a server that never reads
        // stdin can block a large request indefinitely.
        let round_trip = send_and_receive(stdin, stdout, request_line);
        let result = match self.response_timeout {
            Some(limit) => match tokio::time::timeout(limit, round_trip).await {
                Ok(inner) => inner,
                Err(_) => {
                    tracing::error!(
                        timeout_ms = limit.as_millis() as u64,
                        "timed out waiting for tool server response"
                    );
                    Err(ClientError::Timeout)
                }
            },
            None => round_trip.await,
        };

        match result {
            Ok(line) => {
                let exit_code = reap(&mut child).await;
                Ok(Exchange { line, exit_code })
            }
            Err(e) => {
                terminate(&mut child).await;
                Err(e)
            }
        }
    }
}

/// Write the request, then read the first non-empty response line.
///
/// A broken pipe on write means the server stopped reading (or already
/// exited); whatever it printed is still in the stdout pipe, so reading
/// goes ahead.
async fn send_and_receive(
    stdin: ChildStdin,
    stdout: ChildStdout,
    request_line: &str,
) -> Result<Option<String>, ClientError> {
    match write_request(stdin, request_line).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            tracing::debug!("tool server closed stdin before reading the whole request");
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to write request to tool server stdin");
            return Err(ClientError::StdinUnavailable);
        }
    }

    read_first_line(BufReader::new(stdout)).await.map_err(|e| {
        tracing::error!(error = %e, "failed to read from tool server stdout");
        ClientError::StdoutUnavailable
    })
}

/// Write the request, flush, and close stdin so the server sees EOF.
async fn write_request(mut stdin: ChildStdin, request_line: &str) -> std::io::Result<()> {
    stdin.write_all(request_line.as_bytes()).await?;
    if !request_line.ends_with('\n') {
        stdin.write_all(b"\n").await?;
    }
    stdin.flush().await?;
    stdin.shutdown().await?;
    Ok(())
}

/// Read lines until the first one that is non-empty after trimming, or EOF.
///
/// The reader is consumed, so the pipe is closed as soon as this returns.
/// Bytes that are not valid UTF-8 are replaced rather than rejected; such a
/// line then fails JSON parsing like any other garbage.
pub(crate) async fn read_first_line<R>(mut reader: R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
}

/// Wait for the server to exit on its own, killing it after [`EXIT_GRACE`].
async fn reap(child: &mut Child) -> Option<i32> {
    match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
        Ok(Ok(status)) => {
            tracing::debug!(?status, "tool server exited");
            status.code()
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "error waiting for tool server process");
            None
        }
        Err(_) => {
            tracing::warn!("tool server did not exit after responding, killing");
            terminate(child).await;
            None
        }
    }
}

/// Kill the child and wait for it, so no zombie outlives the invocation.
async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::debug!(error = %e, "failed to kill tool server process");
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
