//! tagseg command-line entry point

use anyhow::Result;
use clap::Parser;
use tagseg_cli::commands::{Commands, ListCommands};

/// Word segmentation and tagging
#[derive(Debug, Parser)]
#[command(name = "tagseg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
        Commands::GenerateConfig(args) => args.execute(),
        Commands::List { subcommand } => match subcommand {
            ListCommands::Formats => {
                tagseg_cli::commands::list_formats();
                Ok(())
            }
        },
    }
}
