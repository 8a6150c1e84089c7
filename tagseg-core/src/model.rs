//! Segmentation and tagging capability
//!
//! The pipeline only ever talks to a [`Model`]: "split this sentence into
//! word units" and "assign slot N's tag to every unit". [`LexiconModel`] is
//! a deterministic implementation driven by a TOML model file:
//!
//! ```toml
//! unknown_tag = "UNK"
//! segmentation = "char_type"
//!
//! [[slots]]
//! name = "pos"
//! enabled = true
//! fallback = "unknown"
//!
//! [slots.lexicon]
//! "猫" = "名詞"
//! ```

use crate::error::ModelError;
use crate::sentence::{Sentence, Word};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Segmentation and tagging capability
///
/// Implementations may keep scratch state between calls, hence `&mut self`;
/// callers must not run two sentences through one model concurrently.
pub trait Model: Send {
    /// Number of tag slots, fixed at load time
    fn tag_slot_count(&self) -> usize;

    /// Whether `slot` is enabled by default
    fn default_enabled(&self, slot: usize) -> bool;

    /// Marker written for words without a tag
    fn unknown_tag(&self) -> &str;

    /// Populate the sentence's word units from its raw text
    fn segment(&mut self, sentence: &mut Sentence) -> Result<(), ModelError>;

    /// Assign the tag of `slot` to every word unit
    fn tag(&mut self, sentence: &mut Sentence, slot: usize) -> Result<(), ModelError>;
}

/// How raw text is split into word units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segmentation {
    /// Split on whitespace only
    #[default]
    Whitespace,
    /// Split on whitespace and wherever the character class changes
    CharType,
}

/// What to do with a surface missing from a slot's lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Leave the slot unassigned; writers emit the unknown marker
    #[default]
    Unknown,
    /// Upper-cased surface
    Upper,
    /// Lower-cased surface
    Lower,
    /// The surface itself
    Surface,
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default = "default_unknown_tag")]
    unknown_tag: String,
    #[serde(default)]
    segmentation: Segmentation,
    #[serde(default)]
    slots: Vec<SlotFile>,
}

#[derive(Debug, Deserialize)]
struct SlotFile {
    name: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    fallback: Fallback,
    #[serde(default)]
    lexicon: HashMap<String, String>,
}

fn default_unknown_tag() -> String {
    "UNK".to_string()
}

fn default_enabled() -> bool {
    true
}

/// One tag slot of a [`LexiconModel`]
#[derive(Debug, Clone)]
pub struct TagSlot {
    /// Slot name, e.g. `pos`
    pub name: String,
    /// Enabled unless the caller turns it off
    pub enabled: bool,
    /// Rule for surfaces not in the lexicon
    pub fallback: Fallback,
    lexicon: HashMap<String, String>,
}

impl TagSlot {
    fn lookup(&self, surface: &str) -> Option<String> {
        if let Some(tag) = self.lexicon.get(surface) {
            return Some(tag.clone());
        }
        match self.fallback {
            Fallback::Unknown => None,
            Fallback::Upper => Some(surface.to_uppercase()),
            Fallback::Lower => Some(surface.to_lowercase()),
            Fallback::Surface => Some(surface.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Kanji,
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        match c {
            '\u{3040}'..='\u{309F}' => CharClass::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{FF66}'..='\u{FF9F}' => CharClass::Katakana,
            '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '々' => CharClass::Kanji,
            c if c.is_numeric() => CharClass::Digit,
            c if c.is_alphabetic() => CharClass::Latin,
            _ => CharClass::Other,
        }
    }
}

/// Rule and lexicon driven [`Model`]
#[derive(Debug, Clone)]
pub struct LexiconModel {
    unknown_tag: String,
    segmentation: Segmentation,
    slots: Vec<TagSlot>,
    // Scratch buffer reused across sentences
    classes: Vec<(usize, CharClass)>,
}

impl LexiconModel {
    /// Load a model file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ModelError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Load a model from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ModelError> {
        Self::parse(text, "<inline>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ModelError> {
        let load_error = |reason: String| ModelError::Load {
            path: origin.to_string(),
            reason,
        };

        let file: ModelFile = toml::from_str(text).map_err(|e| load_error(e.to_string()))?;

        if let Some(i) = file.slots.iter().position(|s| s.name.trim().is_empty()) {
            return Err(load_error(format!("tag slot {i} has an empty name")));
        }

        let slots = file
            .slots
            .into_iter()
            .map(|s| TagSlot {
                name: s.name,
                enabled: s.enabled,
                fallback: s.fallback,
                lexicon: s.lexicon,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            origin,
            slots = slots.len(),
            segmentation = ?file.segmentation,
            "loaded lexicon model"
        );

        Ok(Self {
            unknown_tag: file.unknown_tag,
            segmentation: file.segmentation,
            slots,
            classes: Vec::new(),
        })
    }

    /// Tag slots in index order
    pub fn slots(&self) -> &[TagSlot] {
        &self.slots
    }

    /// Segmentation rule in use
    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }

    fn split_char_types(&mut self, token: &str, words: &mut Vec<Word>) {
        self.classes.clear();
        self.classes
            .extend(token.char_indices().map(|(i, c)| (i, CharClass::of(c))));

        let mut start = 0;
        for pair in self.classes.windows(2) {
            let (_, prev) = pair[0];
            let (i, class) = pair[1];
            if class != prev {
                words.push(Word::new(&token[start..i]));
                start = i;
            }
        }
        words.push(Word::new(&token[start..]));
    }
}

impl Model for LexiconModel {
    fn tag_slot_count(&self) -> usize {
        self.slots.len()
    }

    fn default_enabled(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.enabled)
    }

    fn unknown_tag(&self) -> &str {
        &self.unknown_tag
    }

    fn segment(&mut self, sentence: &mut Sentence) -> Result<(), ModelError> {
        let mut words = Vec::new();
        let raw = std::mem::take(&mut sentence.raw);
        for token in raw.split_whitespace() {
            match self.segmentation {
                Segmentation::Whitespace => words.push(Word::new(token)),
                Segmentation::CharType => self.split_char_types(token, &mut words),
            }
        }
        sentence.raw = raw;
        sentence.set_words(words);
        Ok(())
    }

    fn tag(&mut self, sentence: &mut Sentence, slot: usize) -> Result<(), ModelError> {
        let tag_slot = self.slots.get(slot).ok_or_else(|| {
            ModelError::Capability(format!(
                "tag slot {slot} out of range ({} slots)",
                self.slots.len()
            ))
        })?;

        for word in &mut sentence.words {
            let tag = tag_slot.lookup(&word.surface);
            word.set_tag(slot, tag);
        }
        Ok(())
    }
}
