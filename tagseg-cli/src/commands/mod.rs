//! CLI command implementations

use clap::Subcommand;
use tagseg_core::CorpusFormat;

pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment and tag text
    Process(process::ProcessArgs),

    /// Check that a model (and optionally a settings file) loads
    Validate(validate::ValidateArgs),

    /// Write a settings file holding a model's defaults
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List corpus formats
    Formats,
}

/// Print every corpus format with its roles
pub fn list_formats() {
    for format in CorpusFormat::ALL {
        let role = if format.is_readable() {
            "input, output"
        } else {
            "output"
        };
        println!("{:<5} {:<14} {}", format.name(), role, describe(format));
    }
}

fn describe(format: CorpusFormat) -> &'static str {
    match format {
        CorpusFormat::Raw => "unsegmented text, one sentence per line",
        CorpusFormat::WordBoundary => "words separated by the word delimiter",
        CorpusFormat::FullyTagged => "words with their tags, surface/tag/...",
        CorpusFormat::Json => "one JSON object per sentence",
    }
}
