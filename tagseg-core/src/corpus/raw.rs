//! Unsegmented text, one sentence per line

use super::{ConfigSlot, CorpusReader, CorpusWriter, LineSource, WriterConfig};
use crate::error::CorpusResult;
use crate::sentence::Sentence;
use std::io::{BufRead, Write};

/// Reads every line, empty ones included, as an unsegmented sentence
#[derive(Debug)]
pub struct RawReader<R> {
    lines: LineSource<R>,
}

impl<R: BufRead> RawReader<R> {
    /// Create a reader over `inner`
    pub fn new(inner: R) -> Self {
        Self {
            lines: LineSource::new(inner),
        }
    }
}

impl<R: BufRead> CorpusReader for RawReader<R> {
    fn read_sentence(&mut self) -> CorpusResult<Option<Sentence>> {
        Ok(self.lines.next_line()?.map(Sentence::from_raw))
    }
}

/// Writes surfaces back to back, dropping word boundaries and tags
#[derive(Debug)]
pub struct RawWriter<W> {
    out: W,
    config: ConfigSlot,
}

impl<W: Write> RawWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            config: ConfigSlot::default(),
        }
    }
}

impl<W: Write> CorpusWriter for RawWriter<W> {
    fn configure(&mut self, config: WriterConfig) -> CorpusResult<()> {
        self.config.set(config)
    }

    fn write_sentence(&mut self, sentence: &Sentence) -> CorpusResult<()> {
        self.config.get()?;
        if sentence.is_segmented() {
            for surface in sentence.surfaces() {
                self.out.write_all(surface.as_bytes())?;
            }
        } else {
            self.out.write_all(sentence.raw.as_bytes())?;
        }
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> CorpusResult<()> {
        Ok(self.out.flush()?)
    }
}
