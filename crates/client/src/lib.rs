//! `tc-client` — one-shot client for line-delimited JSON tool servers.
//!
//! This crate provides:
//! - The request line and the legacy `CLIENT_ERROR` payload (`protocol`).
//! - A stdio transport that spawns the server, writes one request line,
//!   and reads back the first non-empty line (`transport`).
//! - `ToolClient`, which turns that line into a parsed JSON result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tc_client::ToolClient;
//!
//! let client = ToolClient::new(config.server.clone(), config.invoke.clone());
//! let reserves = client
//!     .invoke("get_reserve_data", json!({ "chain_id": 1, "assets": ["USDC"] }))
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod protocol;
pub mod transport;

// Re-exports for convenience.
pub use client::{ClientError, ToolClient};
pub use config::{InvokeConfig, ServerLaunchConfig, StderrMode};
pub use protocol::{ClientErrorPayload, ToolRequest, CLIENT_ERROR};
pub use transport::{Exchange, StdioTransport, ToolTransport};
