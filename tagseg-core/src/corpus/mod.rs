//! Corpus readers and writers
//!
//! A reader turns a byte stream into a finite, forward-only sequence of
//! [`Sentence`]s. A writer serializes sentences back out; it must receive
//! its [`WriterConfig`] exactly once, before the first sentence.

use crate::error::{CorpusError, CorpusResult};
use crate::sentence::Sentence;
use std::io::BufRead;

mod full;
mod json;
mod raw;
mod tokenized;

pub use full::{FullReader, FullWriter};
pub use json::JsonWriter;
pub use raw::{RawReader, RawWriter};
pub use tokenized::{TokenizedReader, TokenizedWriter};

/// Output settings pushed to a writer before any sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Marker for enabled slots that have no tag
    pub unknown_tag: String,
    /// Number of tag slots the model provides
    pub slot_count: usize,
    /// Which slots are written
    pub do_tags: Vec<bool>,
}

impl WriterConfig {
    /// Indices of the slots that are written, in increasing order
    pub fn enabled_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.slot_count).filter(|&i| self.do_tags.get(i).copied().unwrap_or(false))
    }
}

/// Source of sentences
pub trait CorpusReader {
    /// Next sentence, or `None` once the input is exhausted
    ///
    /// After the first `None` every further call also returns `None`.
    fn read_sentence(&mut self) -> CorpusResult<Option<Sentence>>;
}

/// Sink for sentences
pub trait CorpusWriter {
    /// Push the one-time output configuration
    fn configure(&mut self, config: WriterConfig) -> CorpusResult<()>;

    /// Serialize one sentence
    fn write_sentence(&mut self, sentence: &Sentence) -> CorpusResult<()>;

    /// Flush buffered output to the underlying stream
    fn flush(&mut self) -> CorpusResult<()>;
}

/// Line-oriented input shared by all readers
#[derive(Debug)]
pub(crate) struct LineSource<R> {
    inner: R,
    buf: String,
    line_no: usize,
    exhausted: bool,
}

impl<R: BufRead> LineSource<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line_no: 0,
            exhausted: false,
        }
    }

    /// Next line without its terminator
    pub(crate) fn next_line(&mut self) -> CorpusResult<Option<&str>> {
        if self.exhausted {
            return Ok(None);
        }

        self.buf.clear();
        let read = match self.inner.read_line(&mut self.buf) {
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(CorpusError::Parse {
                    line: self.line_no + 1,
                    reason: "input is not valid UTF-8".to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        if read == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        self.line_no += 1;
        let line = self.buf.strip_suffix('\n').unwrap_or(&self.buf);
        Ok(Some(line.strip_suffix('\r').unwrap_or(line)))
    }
}

/// Configuration slot shared by all writers
#[derive(Debug, Default)]
pub(crate) struct ConfigSlot(Option<WriterConfig>);

impl ConfigSlot {
    pub(crate) fn set(&mut self, config: WriterConfig) -> CorpusResult<()> {
        if self.0.is_some() {
            return Err(CorpusError::AlreadyConfigured);
        }
        self.0 = Some(config);
        Ok(())
    }

    pub(crate) fn get(&self) -> CorpusResult<&WriterConfig> {
        self.0.as_ref().ok_or(CorpusError::Unconfigured)
    }
}
