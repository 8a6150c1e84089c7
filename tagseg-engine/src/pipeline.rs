//! Read-segment-tag-write loop

use crate::config::EngineConfig;
use crate::error::{EngineError, Phase, Result};
use tagseg_core::{CorpusReader, CorpusWriter, Model};

/// Counters reported by a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Sentences written
    pub sentences: usize,
    /// Word units across all written sentences
    pub words: usize,
}

/// One run of a model over a reader/writer pair
///
/// Sentences are processed one at a time: read, optionally segmented,
/// tagged for each enabled slot in increasing order, written and dropped.
/// The first failing step aborts the run; output already written stays.
pub struct Pipeline<'e, M: Model + ?Sized> {
    model: &'e mut M,
    config: &'e EngineConfig,
}

impl<'e, M: Model + ?Sized> Pipeline<'e, M> {
    /// Pipeline driving `model` under `config`
    pub fn new(model: &'e mut M, config: &'e EngineConfig) -> Self {
        Self { model, config }
    }

    /// Drain `reader` into `writer`
    pub fn run<R, W>(&mut self, reader: &mut R, writer: &mut W) -> Result<RunStats>
    where
        R: CorpusReader + ?Sized,
        W: CorpusWriter + ?Sized,
    {
        writer
            .configure(self.config.writer_config())
            .map_err(|e| EngineError::corpus(Phase::Write, e))?;

        let enabled: Vec<usize> = self
            .config
            .do_tags
            .iter()
            .enumerate()
            .filter_map(|(slot, &on)| on.then_some(slot))
            .collect();

        let tagging = self.config.any_tag_enabled();
        let mut stats = RunStats::default();
        while let Some(mut sentence) = reader
            .read_sentence()
            .map_err(|e| EngineError::corpus(Phase::Read, e))?
        {
            if self.config.do_word_segmentation {
                self.model
                    .segment(&mut sentence)
                    .map_err(|e| EngineError::model(Phase::Segment, e))?;
            }

            // Unsegmented sentences have no units to tag
            if tagging && sentence.is_segmented() {
                for &slot in &enabled {
                    self.model
                        .tag(&mut sentence, slot)
                        .map_err(|e| EngineError::model(Phase::Tag, e))?;
                }
            }

            writer
                .write_sentence(&sentence)
                .map_err(|e| EngineError::corpus(Phase::Write, e))?;

            stats.sentences += 1;
            stats.words += sentence.words.len();
            tracing::trace!(
                sentence = stats.sentences,
                words = sentence.words.len(),
                "sentence written"
            );
        }

        writer
            .flush()
            .map_err(|e| EngineError::corpus(Phase::Write, e))?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{InputBuffer, OutputBuffer};
    use crate::bridge::CorpusBridge;
    use crate::stream::{Sink, Source};
    use tagseg_core::{CorpusFormat, ModelError, Sentence, Word};

    /// Records the order of capability calls
    #[derive(Default)]
    struct Recording {
        calls: Vec<String>,
        fail_slot: Option<usize>,
    }

    impl Model for Recording {
        fn tag_slot_count(&self) -> usize {
            3
        }

        fn default_enabled(&self, _slot: usize) -> bool {
            true
        }

        fn unknown_tag(&self) -> &str {
            "UNK"
        }

        fn segment(&mut self, sentence: &mut Sentence) -> std::result::Result<(), ModelError> {
            self.calls.push("segment".to_string());
            let words = sentence.raw.split_whitespace().map(Word::new).collect();
            sentence.set_words(words);
            Ok(())
        }

        fn tag(
            &mut self,
            sentence: &mut Sentence,
            slot: usize,
        ) -> std::result::Result<(), ModelError> {
            self.calls.push(format!("tag{slot}"));
            if self.fail_slot == Some(slot) {
                return Err(ModelError::Capability(format!("slot {slot} broke")));
            }
            for word in &mut sentence.words {
                word.set_tag(slot, Some(format!("t{slot}")));
            }
            Ok(())
        }
    }

    fn run(
        model: &mut Recording,
        config: &EngineConfig,
        input: &str,
    ) -> (Result<RunStats>, Vec<u8>) {
        let input = InputBuffer::from(input);
        let mut output = OutputBuffer::new();
        let result = {
            let bridge = CorpusBridge::new(config);
            let mut reader = bridge.reader(Source::memory(&input)).unwrap();
            let mut writer = bridge.writer(Sink::memory(&mut output).unwrap());
            Pipeline::new(model, config).run(reader.as_mut(), writer.as_mut())
        };
        (result, output.freeze().to_vec())
    }

    #[test]
    fn test_slots_tagged_in_order() {
        let mut model = Recording::default();
        let mut config = EngineConfig::for_model(&model);
        config.do_tags[1] = false;

        let (result, output) = run(&mut model, &config, "a b\n");
        let stats = result.unwrap();
        assert_eq!((stats.sentences, stats.words), (1, 2));
        assert_eq!(model.calls, vec!["segment", "tag0", "tag2"]);
        assert_eq!(output, b"a/t0/t2\tb/t0/t2\n");
    }

    #[test]
    fn test_no_segmentation_skips_tagging_raw_input() {
        let mut model = Recording::default();
        let mut config = EngineConfig::for_model(&model);
        config.do_word_segmentation = false;
        config.output_format = CorpusFormat::Raw;

        let (result, output) = run(&mut model, &config, "a b\n");
        let stats = result.unwrap();
        assert_eq!((stats.sentences, stats.words), (1, 0));
        assert!(model.calls.is_empty());
        assert_eq!(output, b"a b\n");
    }

    #[test]
    fn test_presegmented_input_is_tagged() {
        let mut model = Recording::default();
        let mut config = EngineConfig::for_model(&model);
        config.do_word_segmentation = false;
        config.input_format = CorpusFormat::WordBoundary;
        config.do_tags = vec![true, false, false];

        let (result, output) = run(&mut model, &config, "x y\tz\n");
        assert_eq!(result.unwrap().words, 2);
        assert_eq!(model.calls, vec!["tag0"]);
        assert_eq!(output, b"x y/t0\tz/t0\n");
    }

    #[test]
    fn test_tag_failure_aborts_with_phase() {
        let mut model = Recording {
            fail_slot: Some(1),
            ..Default::default()
        };
        let config = EngineConfig::for_model(&model);

        let (result, output) = run(&mut model, &config, "a\nb\n");
        let err = result.unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Tag));
        assert_eq!(model.calls, vec!["segment", "tag0", "tag1"]);
        assert!(output.is_empty());
    }

    #[test]
    fn test_all_slots_disabled_only_segments() {
        let mut model = Recording::default();
        let mut config = EngineConfig::for_model(&model);
        config.do_tags = vec![false; 3];

        let (result, output) = run(&mut model, &config, "a b\nc\n");
        let stats = result.unwrap();
        assert_eq!((stats.sentences, stats.words), (2, 3));
        assert_eq!(model.calls, vec!["segment", "segment"]);
        assert_eq!(output, b"a\tb\nc\n");
    }

    #[test]
    fn test_empty_input() {
        let mut model = Recording::default();
        let config = EngineConfig::for_model(&model);
        let (result, output) = run(&mut model, &config, "");
        assert_eq!(result.unwrap(), RunStats::default());
        assert!(output.is_empty());
    }
}
