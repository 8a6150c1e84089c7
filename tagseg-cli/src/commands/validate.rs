//! Validate command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tagseg_core::LexiconModel;
use tagseg_engine::{Engine, EngineSettings};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Model file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub model: PathBuf,

    /// Settings file to check against the model
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating model: {}", self.model.display());

        let model = match LexiconModel::from_file(&self.model) {
            Ok(model) => model,
            Err(e) => {
                println!("✗ Model is invalid!");
                println!("  Error: {e}");
                return Err(anyhow::anyhow!("Validation failed: {}", e));
            }
        };

        println!("✓ Model is valid!");
        println!("  Segmentation: {:?}", model.segmentation());
        println!("  Tag slots: {}", model.slots().len());
        for (i, slot) in model.slots().iter().enumerate() {
            let state = if slot.enabled { "enabled" } else { "disabled" };
            println!(
                "    {i}: {} ({state}, fallback {:?})",
                slot.name, slot.fallback
            );
        }

        if let Some(path) = &self.config {
            println!("Validating settings: {}", path.display());
            let mut engine = Engine::with_model(Box::new(model));
            let settings = EngineSettings::from_file(path);
            match settings.and_then(|s| engine.apply_settings(&s)) {
                Ok(()) => println!("✓ Settings are valid!"),
                Err(e) => {
                    println!("✗ Settings are invalid!");
                    println!("  Error: {e}");
                    return Err(anyhow::anyhow!("Validation failed: {}", e));
                }
            }
        }

        Ok(())
    }
}
