//! JSON lines output

use super::{ConfigSlot, CorpusWriter, WriterConfig};
use crate::error::CorpusResult;
use crate::sentence::Sentence;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonWord<'a> {
    surface: &'a str,
    tags: Vec<&'a str>,
}

#[derive(Serialize)]
struct JsonSentence<'a> {
    text: &'a str,
    words: Vec<JsonWord<'a>>,
}

/// Writes one JSON object per sentence
#[derive(Debug)]
pub struct JsonWriter<W> {
    out: W,
    config: ConfigSlot,
}

impl<W: Write> JsonWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            config: ConfigSlot::default(),
        }
    }
}

impl<W: Write> CorpusWriter for JsonWriter<W> {
    fn configure(&mut self, config: WriterConfig) -> CorpusResult<()> {
        self.config.set(config)
    }

    fn write_sentence(&mut self, sentence: &Sentence) -> CorpusResult<()> {
        let config = self.config.get()?;
        let words = sentence
            .words
            .iter()
            .map(|word| JsonWord {
                surface: &word.surface,
                tags: config
                    .enabled_slots()
                    .map(|slot| word.tag(slot).unwrap_or(config.unknown_tag.as_str()))
                    .collect(),
            })
            .collect();

        let json = JsonSentence {
            text: &sentence.raw,
            words,
        };
        serde_json::to_writer(&mut self.out, &json)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> CorpusResult<()> {
        Ok(self.out.flush()?)
    }
}
