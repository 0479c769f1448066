pub mod config;
pub mod demo;
pub mod invoke;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use tc_domain::config::Config;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TOOLCALL_CONFIG";

/// toolcall — invoke tools on a line-delimited JSON tool server.
#[derive(Debug, Parser)]
#[command(name = "toolcall", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerOverrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Command-line overrides for the `[server]` and `[invoke]` config sections.
#[derive(Debug, Default, Args)]
pub struct ServerOverrides {
    /// Server executable (overrides `server.command`).
    #[arg(long = "command", global = true, value_name = "PATH")]
    pub server_command: Option<String>,
    /// Server argument; repeat for several (replaces `server.args`).
    #[arg(long = "arg", global = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Working directory for the server (overrides `server.cwd`).
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
    /// Response deadline in milliseconds (overrides `invoke.response_timeout_ms`).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

impl ServerOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(command) = &self.server_command {
            config.server.command = command.clone();
        }
        if !self.args.is_empty() {
            config.server.args = self.args.clone();
        }
        if let Some(cwd) = &self.cwd {
            config.server.cwd = Some(cwd.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config.invoke.response_timeout_ms = Some(ms);
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Invoke one tool and print its JSON result.
    Invoke {
        /// Tool name (e.g. "get_reserve_data").
        tool: String,
        /// Tool parameters as a JSON object.
        #[arg(long, short, default_value = "{}")]
        params: String,
        /// Print the result on a single line instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },
    /// Run the sample reserve-data and token-info calls.
    Demo,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load the config from `$TOOLCALL_CONFIG` (default `toolcall.toml`).
///
/// A missing file is not an error: every section has defaults.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "toolcall.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(config_path: &str) -> anyhow::Result<Config> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {config_path}"))?;
    Config::from_toml_str(&raw).with_context(|| format!("parsing {config_path}"))
}
