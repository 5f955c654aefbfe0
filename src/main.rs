//! Biblio terminal client entry point.

use biblio::cli::{commands, output::Output, Cli};
use biblio::{ClientConfig, Result};
use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "biblio=debug" } else { "biblio=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = ClientConfig::load(&cli.config)?;
    tracing::debug!(endpoint = %config.api_endpoint, "Loaded configuration");

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };
    let ctx = commands::Context::new(config, output);

    commands::dispatch(&ctx, cli.command).await
}
