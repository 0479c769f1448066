use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-invocation client behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InvokeConfig {
    /// Deadline for the response line, in milliseconds. `None` waits
    /// for as long as the server takes.
    #[serde(default)]
    pub response_timeout_ms: Option<u64>,
}

impl InvokeConfig {
    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_ms.map(Duration::from_millis)
    }
}
