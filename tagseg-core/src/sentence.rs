//! Sentence and word units

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-slot tags of one word; `None` means the slot was not assigned
pub type SlotTags = SmallVec<[Option<String>; 4]>;

/// A contiguous span of text identified as one segmentation token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Word {
    /// Unescaped surface form
    pub surface: String,
    /// Tags indexed by slot
    pub tags: SlotTags,
}

impl Word {
    /// Create an untagged word
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tags: SmallVec::new(),
        }
    }

    /// Tag assigned in `slot`, if any
    pub fn tag(&self, slot: usize) -> Option<&str> {
        self.tags.get(slot).and_then(|t| t.as_deref())
    }

    /// Assign (or clear) the tag of `slot`, growing the slot vector as needed
    pub fn set_tag(&mut self, slot: usize, tag: Option<String>) {
        if self.tags.len() <= slot {
            self.tags.resize(slot + 1, None);
        }
        self.tags[slot] = tag;
    }
}

/// One sentence moving through the pipeline
///
/// Lives for a single read-process-write iteration. `words` is only
/// meaningful once the sentence is segmented, either by the model or by a
/// pre-segmented input format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sentence {
    /// Raw text span as read
    pub raw: String,
    /// Word units
    pub words: Vec<Word>,
    segmented: bool,
}

impl Sentence {
    /// Unsegmented sentence
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            words: Vec::new(),
            segmented: false,
        }
    }

    /// Sentence that arrives already segmented; `raw` is the concatenated surfaces
    pub fn from_words(words: Vec<Word>) -> Self {
        let raw = words.iter().map(|w| w.surface.as_str()).collect();
        Self {
            raw,
            words,
            segmented: true,
        }
    }

    /// Replace the word units and mark the sentence segmented
    pub fn set_words(&mut self, words: Vec<Word>) {
        self.words = words;
        self.segmented = true;
    }

    /// Whether word units are populated
    pub fn is_segmented(&self) -> bool {
        self.segmented
    }

    /// Iterate over word surfaces
    pub fn surfaces(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(|w| w.surface.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_tag_grows_slots() {
        let mut word = Word::new("猫");
        assert_eq!(word.tag(0), None);

        word.set_tag(2, Some("ねこ".to_string()));
        assert_eq!(word.tags.len(), 3);
        assert_eq!(word.tag(0), None);
        assert_eq!(word.tag(2), Some("ねこ"));

        word.set_tag(2, None);
        assert_eq!(word.tag(2), None);
    }

    #[test]
    fn test_from_words_is_segmented() {
        let sentence = Sentence::from_words(vec![Word::new("吾輩"), Word::new("は")]);
        assert!(sentence.is_segmented());
        assert_eq!(sentence.raw, "吾輩は");
        assert_eq!(sentence.surfaces().collect::<Vec<_>>(), vec!["吾輩", "は"]);
    }

    #[test]
    fn test_from_raw_is_not_segmented() {
        let mut sentence = Sentence::from_raw("ab cd");
        assert!(!sentence.is_segmented());

        sentence.set_words(Vec::new());
        assert!(sentence.is_segmented());
    }
}
