//! textcut command-line entry point

use anyhow::Result;
use clap::Parser;
use textcut_cli::commands::Commands;

/// Split text records into chunks or extract pattern matches
#[derive(Debug, Parser)]
#[command(name = "textcut", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::GenerateConfig(args) => args.execute(),
        Commands::List { subcommand } => {
            subcommand.execute();
            Ok(())
        }
    }
}
