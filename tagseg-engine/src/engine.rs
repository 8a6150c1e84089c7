//! Engine handle

use crate::bridge::CorpusBridge;
use crate::buffer::{InputBuffer, OutputBuffer};
use crate::config::{EngineConfig, EngineSettings};
use crate::error::{EngineError, Result};
use crate::pipeline::{Pipeline, RunStats};
use crate::stream::{Sink, Source};
use std::fmt;
use std::path::Path;
use tagseg_core::{CorpusFormat, LexiconModel, Model, ModelError};

/// A loaded model plus the configuration its runs use
///
/// Configuration changes apply to later runs only; a run borrows the engine
/// mutably, so it can never observe a change halfway through.
pub struct Engine {
    model: Box<dyn Model>,
    config: EngineConfig,
}

impl Engine {
    /// Load a [`LexiconModel`] from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let model = LexiconModel::from_file(path).map_err(|e| match e {
            ModelError::Load { path, reason } => EngineError::ModelLoadFailed { path, reason },
            other => EngineError::ModelLoadFailed {
                path: path.display().to_string(),
                reason: other.to_string(),
            },
        })?;
        tracing::debug!(
            path = %path.display(),
            slots = model.tag_slot_count(),
            "engine created"
        );
        Ok(Self::with_model(Box::new(model)))
    }

    /// Wrap any model implementation
    pub fn with_model(model: Box<dyn Model>) -> Self {
        let config = EngineConfig::for_model(&*model);
        Self { model, config }
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of tag slots the model provides
    pub fn tag_slot_count(&self) -> usize {
        self.config.slot_count()
    }

    /// Turn word segmentation on or off
    pub fn set_do_word_segmentation(&mut self, on: bool) {
        self.config.do_word_segmentation = on;
    }

    /// Turn tagging of `slot` on or off
    pub fn set_do_tag(&mut self, slot: usize, on: bool) -> Result<()> {
        self.config.set_do_tag(slot, on)
    }

    /// Select the input and output formats
    pub fn set_formats(&mut self, input: CorpusFormat, output: CorpusFormat) -> Result<()> {
        self.config.set_formats(input, output)
    }

    /// Replace the marker written for untagged slots
    pub fn set_unknown_tag(&mut self, tag: impl Into<String>) {
        self.config.unknown_tag = tag.into();
    }

    /// Replace the word delimiter of the pre-segmented formats
    pub fn set_word_bound(&mut self, bound: char) -> Result<()> {
        self.config.set_word_bound(bound)
    }

    /// Apply every field present in `settings`
    ///
    /// On error the configuration is left unchanged.
    pub fn apply_settings(&mut self, settings: &EngineSettings) -> Result<()> {
        self.config = self.config.with_settings(settings)?;
        Ok(())
    }

    /// Run the pipeline from `source` into `sink`
    ///
    /// Memory output is not frozen; the caller freezes it to read it.
    pub fn run(&mut self, source: Source<'_>, sink: Sink<'_>) -> Result<RunStats> {
        tracing::debug!(
            input = %self.config.input_format,
            output = %self.config.output_format,
            from = %source.describe(),
            to = %sink.describe(),
            "run started"
        );

        let bridge = CorpusBridge::new(&self.config);
        let mut reader = bridge.reader(source)?;
        let mut writer = bridge.writer(sink);
        let stats =
            Pipeline::new(self.model.as_mut(), &self.config).run(reader.as_mut(), writer.as_mut())?;

        tracing::debug!(
            sentences = stats.sentences,
            words = stats.words,
            "run finished"
        );
        Ok(stats)
    }

    /// Run from an input buffer into an output buffer
    pub fn run_memory_to_memory(
        &mut self,
        input: &InputBuffer,
        output: &mut OutputBuffer,
    ) -> Result<RunStats> {
        self.run(Source::memory(input), Sink::memory(output)?)
    }

    /// Run from a file into an output buffer
    pub fn run_file_to_memory<P: AsRef<Path>>(
        &mut self,
        input: P,
        output: &mut OutputBuffer,
    ) -> Result<RunStats> {
        self.run(Source::open(input)?, Sink::memory(output)?)
    }

    /// Run from an input buffer into a file
    pub fn run_memory_to_file<P: AsRef<Path>>(
        &mut self,
        input: &InputBuffer,
        output: P,
    ) -> Result<RunStats> {
        self.run(Source::memory(input), Sink::create(output)?)
    }

    /// Run from one file into another
    pub fn run_file_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input: P,
        output: Q,
    ) -> Result<RunStats> {
        self.run(Source::open(input)?, Sink::create(output)?)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
