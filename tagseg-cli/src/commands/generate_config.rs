//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tagseg_engine::{Engine, EngineSettings};

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Model whose defaults seed the settings
    #[arg(short, long, value_name = "FILE", required = true)]
    pub model: PathBuf,

    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        println!("Generating settings template...");
        println!("  Model: {}", self.model.display());
        println!("  Output file: {}", self.output.display());

        let engine = Engine::load(&self.model)
            .with_context(|| format!("Failed to load model {}", self.model.display()))?;
        let template = self.render(&engine)?;

        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Settings template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the settings to taste");
        println!("2. Validate them:");
        println!(
            "   tagseg validate --model {} --config {}",
            self.model.display(),
            self.output.display()
        );
        println!("3. Use them:");
        println!(
            "   tagseg process --model {} --config {} -i input.txt",
            self.model.display(),
            self.output.display()
        );

        Ok(())
    }

    fn render(&self, engine: &Engine) -> Result<String> {
        let settings = EngineSettings::from(engine.config());
        let body = settings.to_toml_string()?;
        Ok(format!(
            "# tagseg settings generated from {}\n# Slots: {}\n\n{body}",
            self.model.display(),
            engine.tag_slot_count()
        ))
    }
}
