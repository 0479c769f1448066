use serde::Serialize;

/// Structured trace events emitted across the toolcall crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ServerSpawned {
        command: String,
        pid: Option<u32>,
    },
    ToolInvoked {
        invocation_id: String,
        tool: String,
        duration_ms: u64,
        exit_code: Option<i32>,
        outcome: InvokeOutcome,
    },
}

/// Coarse result of one invocation, for dashboards and log queries.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvokeOutcome {
    Ok,
    ClientError,
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "tc_event");
    }
}
