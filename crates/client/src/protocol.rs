//! Wire types for the one-shot tool protocol.
//!
//! A request is a single line of JSON, `{"name": ..., "params": {...}}`,
//! followed by a newline and EOF on the server's stdin. The response is the
//! first non-empty line the server prints, and may be any JSON value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Requests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A tool invocation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolRequest {
    pub name: String,
    pub params: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Build a request from any serializable parameter set.
    ///
    /// Fails unless `params` serializes to a JSON object (or `null`, which
    /// is taken as "no parameters").
    pub fn from_serializable(
        name: impl Into<String>,
        params: impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        let params = match serde_json::to_value(params)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "tool params must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };
        Ok(Self::new(name, params))
    }

    /// Serialize to exactly one newline-terminated line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client-side error payload
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `errorType` carried by every error the client synthesizes itself.
pub const CLIENT_ERROR: &str = "CLIENT_ERROR";

/// The flat error object callers of the untagged API receive in place of
/// a server response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientErrorPayload {
    pub error: String,
    #[serde(rename = "errorType")]
    pub error_type: String,
}

impl ClientErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            error_type: CLIENT_ERROR.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "error": self.error,
            "errorType": self.error_type,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
