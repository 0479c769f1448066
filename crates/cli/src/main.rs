use clap::Parser;
use tracing_subscriber::EnvFilter;

use tc_client::ToolClient;
use tc_domain::config::{LogConfig, LogFormat};
use tc_cli::cli::{Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_path) = tc_cli::cli::load_config()?;
    cli.server.apply(&mut config);

    match cli.command {
        Command::Invoke { tool, params, compact } => {
            init_tracing(&config.log);
            let client = ToolClient::new(config.server, config.invoke);
            let mut stdout = std::io::stdout();
            let ok =
                tc_cli::cli::invoke::run(&client, &tool, &params, compact, &mut stdout).await?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Demo => {
            init_tracing(&config.log);
            let client = ToolClient::new(config.server, config.invoke);
            let ok = tc_cli::cli::demo::run(&client, &mut std::io::stdout()).await?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Validate) => {
            let valid =
                tc_cli::cli::config::validate(&config, &config_path, &mut std::io::stdout())?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => {
            tc_cli::cli::config::show(&config, &mut std::io::stdout())
        }
        Command::Version => {
            println!("toolcall {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize stderr-only tracing so diagnostics never mix with results.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogConfig) {
    let fallback = if log.filter.trim().is_empty() {
        "warn"
    } else {
        log.filter.as_str()
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
