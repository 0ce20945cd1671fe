use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

use huddle_cli::cli::{Cli, Commands};
use huddle_cli::commands;
use huddle_config::{ConfigLoader, LoggingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install logging before loading config so loader messages are kept.
    // Logs go to stderr so query output stays pipeable.
    let initial = cli.log_filter(&LoggingConfig::default().level);
    let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(initial));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.log_override().is_none() {
        filter_handle
            .reload(EnvFilter::new(cli.log_filter(&config.logging.level)))
            .context("Failed to apply configured log level")?;
    }

    debug!("Using endpoint {}", config.database.url);

    match cli.command {
        Commands::Query {
            sql,
            file,
            complete,
            token,
            compact,
        } => commands::query::execute(&config.database, sql, file, complete, token, compact).await,
        Commands::RenderConfig { format } => commands::config::execute(&config, format),
    }
}
