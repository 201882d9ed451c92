mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use podwatch::api::{self, RunOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            api::run(RunOptions {
                address: args.address,
                dry_run_email: args.dry_run,
            })
            .await?
        }
    }

    Ok(())
}
