mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::ExtractArgs;

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,leadscan=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    tracing::debug!("Starting Leadscan v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Extract {
            url,
            concurrency,
            output,
            headed,
            events,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::extract(
                config,
                ExtractArgs {
                    url,
                    concurrency,
                    output,
                    headed,
                    events,
                },
            )
            .await
        }
        Commands::Config { action } => commands::config(&action, cli.config.as_deref()),
    }
}
