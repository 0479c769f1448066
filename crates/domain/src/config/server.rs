use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// External tool server launch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How to spawn the external tool server for a single invocation.
///
/// Every invocation launches a fresh process with exactly this command
/// line; nothing is pooled or reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerLaunchConfig {
    /// Executable path (e.g. `"./bin/aave-mcp"`). Resolved through `PATH`
    /// when it contains no separator.
    #[serde(default = "d_command")]
    pub command: String,

    /// Fixed arguments passed on every launch (the subcommand, usually `start`).
    #[serde(default = "d_args")]
    pub args: Vec<String>,

    /// Working directory for the child. `None` inherits ours.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for the child (RPC endpoints and the like).
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// What to do with the child's stderr.
    #[serde(default)]
    pub stderr: StderrMode,
}

impl Default for ServerLaunchConfig {
    fn default() -> Self {
        Self {
            command: d_command(),
            args: d_args(),
            cwd: None,
            env: HashMap::new(),
            stderr: StderrMode::default(),
        }
    }
}

impl ServerLaunchConfig {
    /// Reject launch settings that can never spawn anything.
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(Error::Config("server command must not be empty".into()));
        }
        Ok(())
    }

    /// The full command line, for logs and error messages.
    pub fn display_command(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Disposition of the child's stderr stream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StderrMode {
    /// Share our stderr, so the server's own diagnostics stay visible.
    #[default]
    Inherit,
    /// Discard it.
    Null,
}

fn d_command() -> String {
    "./bin/aave-mcp".into()
}

fn d_args() -> Vec<String> {
    vec!["start".into()]
}
