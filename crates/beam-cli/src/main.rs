//! beam - packaging and publishing CLI

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use beam_cli::cmd;
use beam_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --debug overrides the env filter
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Upload { api_url }) => cmd::upload::upload(&api_url, cli.debug).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
