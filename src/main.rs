// src/main.rs — Parable entry point

use clap::Parser;

use parable::cli::{Cli, Commands};
use parable::infra::config::Config;
use parable::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG, falls back to --log-level
    logger::init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Ask { message, platform }) => {
            parable::cli::ask::run_ask(&config, &message.join(" "), platform.as_deref()).await
        }
        Some(Commands::Check) => parable::cli::check::run_check(&config, cli.config.as_deref()),
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            parable::cli::serve::run_serve(&config).await
        }
        None => parable::cli::serve::run_serve(&config).await,
    }
}
