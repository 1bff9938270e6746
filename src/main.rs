use anyhow::Result;
use clap::Parser;

use fieldmap::cli::{Cli, Commands};
use fieldmap::commands::{fetch, init_config, replay};
use fieldmap::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level())?;

    match &cli.command {
        Commands::Fetch(args) => fetch::run(&cli, args).await,
        Commands::Replay(args) => replay::run(&cli, args),
        Commands::InitConfig(args) => init_config::run(&cli, args),
    }
}
