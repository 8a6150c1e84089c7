//! Selection of corpus readers and writers by format

use crate::config::EngineConfig;
use crate::error::{EngineError, Phase, Result};
use crate::stream::{Sink, Source};
use tagseg_core::corpus::{
    FullReader, FullWriter, JsonWriter, RawReader, RawWriter, TokenizedReader, TokenizedWriter,
};
use tagseg_core::{CorpusError, CorpusFormat, CorpusReader, CorpusWriter};

/// Builds the reader and writer a run uses
#[derive(Debug, Clone, Copy)]
pub struct CorpusBridge<'c> {
    config: &'c EngineConfig,
}

impl<'c> CorpusBridge<'c> {
    /// Bridge for the formats and delimiter in `config`
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// Reader over `source` in the configured input format
    pub fn reader<'a>(&self, source: Source<'a>) -> Result<Box<dyn CorpusReader + 'a>> {
        let delim = self.config.word_bound;
        Ok(match self.config.input_format {
            CorpusFormat::Raw => Box::new(RawReader::new(source)),
            CorpusFormat::WordBoundary => Box::new(TokenizedReader::new(source, delim)),
            CorpusFormat::FullyTagged => Box::new(FullReader::new(source, delim)),
            CorpusFormat::Json => {
                let err = CorpusError::Unsupported("json is an output-only format");
                return Err(EngineError::corpus(Phase::Read, err));
            }
        })
    }

    /// Writer over `sink` in the configured output format
    ///
    /// The writer still needs its configuration pushed before use.
    pub fn writer<'a>(&self, sink: Sink<'a>) -> Box<dyn CorpusWriter + 'a> {
        let delim = self.config.word_bound;
        match self.config.output_format {
            CorpusFormat::Raw => Box::new(RawWriter::new(sink)),
            CorpusFormat::WordBoundary => Box::new(TokenizedWriter::new(sink, delim)),
            CorpusFormat::FullyTagged => Box::new(FullWriter::new(sink, delim)),
            CorpusFormat::Json => Box::new(JsonWriter::new(sink)),
        }
    }
}
