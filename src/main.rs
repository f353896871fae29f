use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod extract;
mod geocode;
mod output;
mod pipeline;
mod plan;
mod route;
mod runner;
mod state;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("tripmap=debug")
    } else {
        EnvFilter::new("tripmap=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Route(args) => cli::run::execute(args).await,
        Commands::Locate(args) => cli::locate::execute(args).await,
        Commands::Follow(args) => cli::follow::execute(args).await,
        Commands::Schema => cli::schema::execute(),
    };
    Ok(result?)
}
