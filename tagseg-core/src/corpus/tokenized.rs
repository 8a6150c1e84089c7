//! Word-boundary format: escaped surfaces separated by the word-bound marker

use super::{ConfigSlot, CorpusReader, CorpusWriter, LineSource, WriterConfig};
use crate::error::CorpusResult;
use crate::parser::{escape, unescape, Words};
use crate::sentence::{Sentence, Word};
use std::io::{BufRead, Write};

/// Reads pre-segmented sentences
#[derive(Debug)]
pub struct TokenizedReader<R> {
    lines: LineSource<R>,
    delim: char,
}

impl<R: BufRead> TokenizedReader<R> {
    /// Create a reader splitting words on `delim`
    pub fn new(inner: R, delim: char) -> Self {
        Self {
            lines: LineSource::new(inner),
            delim,
        }
    }
}

impl<R: BufRead> CorpusReader for TokenizedReader<R> {
    fn read_sentence(&mut self) -> CorpusResult<Option<Sentence>> {
        let delim = self.delim;
        Ok(self.lines.next_line()?.map(|line| {
            let words = Words::new(line, delim)
                .map(|w| Word::new(unescape(w)))
                .collect();
            Sentence::from_words(words)
        }))
    }
}

/// Writes word surfaces without tags
#[derive(Debug)]
pub struct TokenizedWriter<W> {
    out: W,
    delim: char,
    config: ConfigSlot,
}

impl<W: Write> TokenizedWriter<W> {
    /// Create a writer joining words with `delim`
    pub fn new(out: W, delim: char) -> Self {
        Self {
            out,
            delim,
            config: ConfigSlot::default(),
        }
    }
}

impl<W: Write> CorpusWriter for TokenizedWriter<W> {
    fn configure(&mut self, config: WriterConfig) -> CorpusResult<()> {
        self.config.set(config)
    }

    fn write_sentence(&mut self, sentence: &Sentence) -> CorpusResult<()> {
        self.config.get()?;
        let mut line = String::new();
        if sentence.is_segmented() {
            for (i, surface) in sentence.surfaces().enumerate() {
                if i > 0 {
                    line.push(self.delim);
                }
                line.push_str(&escape(surface, self.delim));
            }
        } else {
            line.push_str(&escape(&sentence.raw, self.delim));
        }
        line.push('\n');
        self.out.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> CorpusResult<()> {
        Ok(self.out.flush()?)
    }
}
