//! Process command implementation

use crate::error::CliError;
use crate::input::resolve_patterns;
use crate::progress::RunProgress;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tagseg_core::CorpusFormat;
use tagseg_engine::{Engine, EngineSettings, InputBuffer, OutputBuffer, RunStats};

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Model file
    #[arg(short, long, value_name = "FILE", env = "TAGSEG_MODEL")]
    pub model: PathBuf,

    /// Input files or patterns (default: stdin)
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Input format: raw, tok or full
    #[arg(long, value_name = "FORMAT")]
    pub input_format: Option<CorpusFormat>,

    /// Output format: raw, tok, full or json
    #[arg(long, value_name = "FORMAT")]
    pub output_format: Option<CorpusFormat>,

    /// Skip word segmentation
    #[arg(long = "no-ws")]
    pub no_ws: bool,

    /// Disable tagging for a slot (repeatable)
    #[arg(long = "notag", value_name = "SLOT")]
    pub notag: Vec<usize>,

    /// Marker for words without a tag
    #[arg(long = "unk-tag", value_name = "TAG")]
    pub unk_tag: Option<String>,

    /// Word delimiter of the tok and full formats
    #[arg(long = "word-bound", value_name = "CHAR")]
    pub word_bound: Option<char>,

    /// Settings file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Starting text processing");
        log::debug!("Arguments: {:?}", self);

        let mut engine = Engine::load(&self.model)
            .with_context(|| format!("Failed to load model {}", self.model.display()))?;
        self.configure(&mut engine)?;

        let files = if self.input.is_empty() {
            Vec::new()
        } else {
            resolve_patterns(&self.input)?
        };

        let stats = match (files.as_slice(), &self.output) {
            ([file], Some(output)) => engine
                .run_file_to_file(file, output)
                .with_context(|| format!("Failed to process {}", file.display()))?,
            _ => self.run_buffered(&mut engine, &files)?,
        };

        log::info!(
            "Processed {} sentences ({} words)",
            stats.sentences,
            stats.words
        );
        Ok(())
    }

    /// Apply the settings file, then the command-line flags
    pub fn configure(&self, engine: &mut Engine) -> Result<()> {
        if let Some(path) = &self.config {
            let settings = EngineSettings::from_file(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            engine
                .apply_settings(&settings)
                .with_context(|| format!("Invalid settings in {}", path.display()))?;
        }

        if self.input_format.is_some() || self.output_format.is_some() {
            let input = self.input_format.unwrap_or(engine.config().input_format);
            let output = self.output_format.unwrap_or(engine.config().output_format);
            engine
                .set_formats(input, output)
                .map_err(|e| CliError::ConfigError(e.to_string()))?;
        }
        if self.no_ws {
            engine.set_do_word_segmentation(false);
        }
        for &slot in &self.notag {
            engine
                .set_do_tag(slot, false)
                .map_err(|e| CliError::ConfigError(format!("--notag {slot}: {e}")))?;
        }
        if let Some(tag) = &self.unk_tag {
            engine.set_unknown_tag(tag.as_str());
        }
        if let Some(bound) = self.word_bound {
            engine
                .set_word_bound(bound)
                .map_err(|e| CliError::ConfigError(e.to_string()))?;
        }

        let config = engine.config();
        if config.resegments_input() {
            log::warn!(
                "{} input is segmented again; pass --no-ws to keep its word boundaries",
                config.input_format
            );
        }
        Ok(())
    }

    /// Run every input into one output buffer, then write it out
    fn run_buffered(&self, engine: &mut Engine, files: &[PathBuf]) -> Result<RunStats> {
        let mut output = OutputBuffer::new();

        let total = if files.is_empty() {
            let mut bytes = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("Failed to read stdin")?;
            engine.run_memory_to_memory(&InputBuffer::from_vec(bytes), &mut output)?
        } else {
            let mut progress = RunProgress::new(files, self.quiet || files.len() < 2);
            for file in files {
                let stats = engine
                    .run_file_to_memory(file, &mut output)
                    .with_context(|| format!("Failed to process {}", file.display()))?;
                progress.record(file, stats);
            }
            progress.finish()
        };

        let view = output.freeze();
        match &self.output {
            Some(path) => fs::write(path, view)
                .with_context(|| format!("Failed to write to {}", path.display()))?,
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(view)?;
                stdout.flush()?;
            }
        }
        Ok(total)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // Ignored when a logger is already installed
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}
