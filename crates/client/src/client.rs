//! `ToolClient`: invoke a named tool on an external server and get back
//! its parsed JSON answer.

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use tc_domain::config::{InvokeConfig, ServerLaunchConfig};
use tc_domain::trace::{InvokeOutcome, TraceEvent};

use crate::protocol::{ClientErrorPayload, ToolRequest, CLIENT_ERROR};
use crate::transport::{StdioTransport, ToolTransport};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ToolClient
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Client for a line-delimited JSON tool server.
///
/// Holds no connection: every call spawns, feeds, drains and reaps its own
/// server process, so a `ToolClient` can be shared freely.
pub struct ToolClient {
    transport: Box<dyn ToolTransport>,
}

impl ToolClient {
    /// Client over the stdio transport.
    pub fn new(server: ServerLaunchConfig, invoke: InvokeConfig) -> Self {
        let timeout = invoke.response_timeout();
        Self::with_transport(StdioTransport::new(server, timeout))
    }

    pub fn with_transport(transport: impl ToolTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Invoke `tool_name` with `params` and return the server's answer.
    ///
    /// A JSON error payload produced by the server itself is a successful
    /// result here; `Err` only ever means the client could not get a
    /// well-formed answer at all.
    pub async fn invoke(
        &self,
        tool_name: &str,
        params: impl Serialize,
    ) -> Result<Value, ClientError> {
        let request = ToolRequest::from_serializable(tool_name, params).map_err(|e| {
            tracing::error!(tool = %tool_name, error = %e, "could not encode tool params");
            ClientError::Encode(e)
        })?;
        self.invoke_request(&request).await
    }

    /// Send an already-built request.
    pub async fn invoke_request(&self, request: &ToolRequest) -> Result<Value, ClientError> {
        let invocation_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("tool_invoke", tool = %request.name, %invocation_id);

        async {
            let started = Instant::now();
            let (result, exit_code) = self.exchange(request).await;

            TraceEvent::ToolInvoked {
                invocation_id: invocation_id.clone(),
                tool: request.name.clone(),
                duration_ms: started.elapsed().as_millis() as u64,
                exit_code,
                outcome: if result.is_ok() {
                    InvokeOutcome::Ok
                } else {
                    InvokeOutcome::ClientError
                },
            }
            .emit();

            result
        }
        .instrument(span)
        .await
    }

    async fn exchange(&self, request: &ToolRequest) -> (Result<Value, ClientError>, Option<i32>) {
        let line = match request.to_line() {
            Ok(line) => line,
            Err(e) => return (Err(ClientError::Encode(e)), None),
        };

        tracing::debug!("sending tool request");
        match self.transport.exchange(&line).await {
            Ok(exchange) => (parse_response(exchange.line), exchange.exit_code),
            Err(e) => (Err(e), None),
        }
    }

    /// Like [`invoke`](Self::invoke), but folds client failures into the
    /// flat `{"error": ..., "errorType": "CLIENT_ERROR"}` object.
    pub async fn invoke_flat(&self, tool_name: &str, params: impl Serialize) -> Value {
        match self.invoke(tool_name, params).await {
            Ok(value) => value,
            Err(e) => e.payload().to_value(),
        }
    }
}

fn parse_response(line: Option<String>) -> Result<Value, ClientError> {
    let Some(line) = line else {
        tracing::error!("no response from tool server");
        return Err(ClientError::NoResponse);
    };
    serde_json::from_str(&line).map_err(|e| {
        tracing::error!(raw = %line, error = %e, "could not decode JSON response from tool server");
        ClientError::InvalidJson(e)
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Client-local failures. None of them is retried; each ends the invocation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("MCP command not found")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to MCP stdin")]
    StdinUnavailable,

    #[error("Failed to read from MCP stdout")]
    StdoutUnavailable,

    #[error("No response from MCP")]
    NoResponse,

    #[error("Invalid JSON response from MCP")]
    InvalidJson(#[source] serde_json::Error),

    #[error("timeout waiting for response")]
    Timeout,

    #[error("Failed to encode MCP request")]
    Encode(#[source] serde_json::Error),
}

impl ClientError {
    /// Always [`CLIENT_ERROR`]; server-reported errors never take this path.
    pub fn error_type(&self) -> &'static str {
        CLIENT_ERROR
    }

    /// The flat error object for callers of the untagged API.
    pub fn payload(&self) -> ClientErrorPayload {
        ClientErrorPayload::new(self.to_string())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
