use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod policy;
mod provider;
mod runner;
mod scheduler;
mod scope;
#[cfg(test)]
mod testutil;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("rotor=debug")
    } else {
        EnvFilter::new("rotor=warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Done(args) => cli::done::execute(args).await,
        Commands::Create(args) => cli::create::execute(args).await,
    }
}
