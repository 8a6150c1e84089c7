//! Fully tagged format: `surface/tag0/tag1` words separated by the word-bound marker

use super::{ConfigSlot, CorpusReader, CorpusWriter, LineSource, WriterConfig};
use crate::error::CorpusResult;
use crate::parser::{escape, unescape, TagFields, Words};
use crate::sentence::{Sentence, Word};
use crate::TAG_DELIM;
use std::io::{BufRead, Write};

fn parse_word(word: &str) -> Word {
    let mut fields = TagFields::from(word);
    let mut parsed = Word::new(unescape(fields.next().unwrap_or("")));
    for (slot, tag) in fields.enumerate() {
        let tag = (!tag.is_empty()).then(|| unescape(tag).into_owned());
        parsed.set_tag(slot, tag);
    }
    parsed
}

/// Reads tagged sentences; tag fields fill slots 0, 1, ... in order
#[derive(Debug)]
pub struct FullReader<R> {
    lines: LineSource<R>,
    delim: char,
}

impl<R: BufRead> FullReader<R> {
    /// Create a reader splitting words on `delim`
    pub fn new(inner: R, delim: char) -> Self {
        Self {
            lines: LineSource::new(inner),
            delim,
        }
    }
}

impl<R: BufRead> CorpusReader for FullReader<R> {
    fn read_sentence(&mut self) -> CorpusResult<Option<Sentence>> {
        let delim = self.delim;
        let Some(line) = self.lines.next_line()? else {
            return Ok(None);
        };
        let words = Words::new(line, delim).map(parse_word).collect();
        Ok(Some(Sentence::from_words(words)))
    }
}

/// Writes each word with the tags of every enabled slot
#[derive(Debug)]
pub struct FullWriter<W> {
    out: W,
    delim: char,
    config: ConfigSlot,
}

impl<W: Write> FullWriter<W> {
    /// Create a writer joining words with `delim`
    pub fn new(out: W, delim: char) -> Self {
        Self {
            out,
            delim,
            config: ConfigSlot::default(),
        }
    }
}

impl<W: Write> CorpusWriter for FullWriter<W> {
    fn configure(&mut self, config: WriterConfig) -> CorpusResult<()> {
        self.config.set(config)
    }

    fn write_sentence(&mut self, sentence: &Sentence) -> CorpusResult<()> {
        let config = self.config.get()?;
        let delim = self.delim;
        let mut line = String::new();

        if sentence.is_segmented() {
            for (i, word) in sentence.words.iter().enumerate() {
                if i > 0 {
                    line.push(delim);
                }
                line.push_str(&escape(&word.surface, delim));
                for slot in config.enabled_slots() {
                    let tag = word.tag(slot).unwrap_or(config.unknown_tag.as_str());
                    line.push(TAG_DELIM);
                    line.push_str(&escape(tag, delim));
                }
            }
        } else {
            line.push_str(&escape(&sentence.raw, delim));
        }

        line.push('\n');
        self.out.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> CorpusResult<()> {
        Ok(self.out.flush()?)
    }
}
