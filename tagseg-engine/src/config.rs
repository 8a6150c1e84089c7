//! Engine configuration
//!
//! [`EngineConfig`] is the live configuration held by an
//! [`Engine`](crate::Engine). [`EngineSettings`] is its TOML form: every
//! field is optional and only the fields present are applied.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tagseg_core::{CorpusFormat, Model, WriterConfig, ESCAPE, TAG_DELIM};

/// Live engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Word delimiter of the pre-segmented formats
    pub word_bound: char,
    /// Run word segmentation on each sentence
    pub do_word_segmentation: bool,
    /// Per-slot tagging switches, one per model slot
    pub do_tags: Vec<bool>,
    /// Marker for enabled slots without a tag
    pub unknown_tag: String,
    /// How input is read
    pub input_format: CorpusFormat,
    /// How output is written
    pub output_format: CorpusFormat,
}

impl EngineConfig {
    /// Defaults for `model`: segmentation on, default-enabled slots on
    pub fn for_model(model: &dyn Model) -> Self {
        let do_tags = (0..model.tag_slot_count())
            .map(|slot| model.default_enabled(slot))
            .collect();
        Self {
            word_bound: tagseg_core::WORD_DELIM,
            do_word_segmentation: true,
            do_tags,
            unknown_tag: model.unknown_tag().to_string(),
            input_format: CorpusFormat::Raw,
            output_format: CorpusFormat::FullyTagged,
        }
    }

    /// Number of tag slots
    pub fn slot_count(&self) -> usize {
        self.do_tags.len()
    }

    /// Whether any slot is enabled
    pub fn any_tag_enabled(&self) -> bool {
        self.do_tags.iter().any(|&on| on)
    }

    /// Whether input that is already segmented gets split again by the model
    pub fn resegments_input(&self) -> bool {
        self.do_word_segmentation && self.input_format.is_presegmented()
    }

    /// Turn tagging of `slot` on or off
    pub fn set_do_tag(&mut self, slot: usize, on: bool) -> Result<()> {
        let count = self.do_tags.len();
        let flag = self.do_tags.get_mut(slot).ok_or_else(|| {
            EngineError::ContractViolation(format!("tag slot {slot} out of range ({count} slots)"))
        })?;
        *flag = on;
        Ok(())
    }

    /// Select the input and output formats
    pub fn set_formats(&mut self, input: CorpusFormat, output: CorpusFormat) -> Result<()> {
        if !input.is_readable() {
            let message = format!("{input} is an output-only format");
            return Err(EngineError::ContractViolation(message));
        }
        self.input_format = input;
        self.output_format = output;
        Ok(())
    }

    /// Replace the word delimiter of the pre-segmented formats
    pub fn set_word_bound(&mut self, bound: char) -> Result<()> {
        if matches!(bound, TAG_DELIM | ESCAPE | '\n' | '\r') {
            return Err(EngineError::Config(format!(
                "{bound:?} cannot be used as a word delimiter"
            )));
        }
        self.word_bound = bound;
        Ok(())
    }

    /// Copy of this config with every field present in `settings` applied
    pub fn with_settings(&self, settings: &EngineSettings) -> Result<Self> {
        let mut next = self.clone();

        if let Some(bound) = settings.word_bound_char()? {
            next.set_word_bound(bound)?;
        }
        if let Some(on) = settings.do_word_segmentation {
            next.do_word_segmentation = on;
        }
        if let Some(do_tags) = &settings.do_tags {
            if do_tags.len() > next.do_tags.len() {
                return Err(EngineError::Config(format!(
                    "do_tags lists {} slots but the model has {}",
                    do_tags.len(),
                    next.do_tags.len()
                )));
            }
            next.do_tags[..do_tags.len()].copy_from_slice(do_tags);
        }
        if let Some(tag) = &settings.unknown_tag {
            next.unknown_tag = tag.clone();
        }
        let input = settings.input_format.unwrap_or(next.input_format);
        let output = settings.output_format.unwrap_or(next.output_format);
        next.set_formats(input, output)
            .map_err(|e| EngineError::Config(e.to_string()))?;

        Ok(next)
    }

    /// Writer configuration derived from this config
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            unknown_tag: self.unknown_tag.clone(),
            slot_count: self.do_tags.len(),
            do_tags: self.do_tags.clone(),
        }
    }
}

/// Optional settings loaded from TOML
///
/// ```toml
/// do_word_segmentation = true
/// do_tags = [true, false]
/// unknown_tag = "UNK"
/// input_format = "raw"
/// output_format = "full"
/// word_bound = "\t"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Word delimiter, a single character
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_bound: Option<String>,
    /// Word segmentation switch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_word_segmentation: Option<bool>,
    /// Switches for the leading slots; slots past the end keep their value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_tags: Option<Vec<bool>>,
    /// Unknown-tag marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_tag: Option<String>,
    /// Input format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<CorpusFormat>,
    /// Output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<CorpusFormat>,
}

impl EngineSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| EngineError::Config(format!("failed to parse settings: {e}")))
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| EngineError::Config(format!("failed to render settings: {e}")))
    }

    /// The configured word delimiter, checked to be exactly one character
    pub fn word_bound_char(&self) -> Result<Option<char>> {
        let Some(bound) = &self.word_bound else {
            return Ok(None);
        };
        let mut chars = bound.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(c)),
            _ => Err(EngineError::Config(format!(
                "word_bound must be a single character, got {bound:?}"
            ))),
        }
    }
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            word_bound: Some(config.word_bound.to_string()),
            do_word_segmentation: Some(config.do_word_segmentation),
            do_tags: Some(config.do_tags.clone()),
            unknown_tag: Some(config.unknown_tag.clone()),
            input_format: Some(config.input_format),
            output_format: Some(config.output_format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tagseg_core::LexiconModel;
    use tempfile::NamedTempFile;

    #[test]
    fn test_for_model_defaults() {
        let model = LexiconModel::from_toml_str(
            r#"
            unknown_tag = "?"
            [[slots]]
            name = "pos"
            [[slots]]
            name = "reading"
            enabled = false
            "#,
        )
        .unwrap();
        let config = EngineConfig::for_model(&model);

        assert_eq!(config.word_bound, '\t');
        assert!(config.do_word_segmentation);
        assert_eq!(config.do_tags, vec![true, false]);
        assert_eq!(config.unknown_tag, "?");
        assert_eq!(config.input_format, CorpusFormat::Raw);
        assert_eq!(config.output_format, CorpusFormat::FullyTagged);
        assert!(config.any_tag_enabled());
        assert!(!config.resegments_input());

        let writer = config.writer_config();
        assert_eq!(writer.slot_count, 2);
        assert_eq!(writer.enabled_slots().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_with_settings() {
        let text = "[[slots]]\nname = \"a\"\n[[slots]]\nname = \"b\"";
        let model = LexiconModel::from_toml_str(text).unwrap();
        let config = EngineConfig::for_model(&model);
        let settings = EngineSettings {
            do_tags: Some(vec![false]),
            unknown_tag: Some("-".to_string()),
            output_format: Some(CorpusFormat::Json),
            ..Default::default()
        };

        let next = config.with_settings(&settings).unwrap();
        assert_eq!(next.do_tags, vec![false, true]);
        assert_eq!(next.unknown_tag, "-");
        assert_eq!(next.output_format, CorpusFormat::Json);
        assert_eq!(next.input_format, CorpusFormat::Raw);
    }

    #[test]
    fn test_resegments_input() {
        let model = LexiconModel::from_toml_str("").unwrap();
        let mut config = EngineConfig::for_model(&model);
        config
            .set_formats(CorpusFormat::FullyTagged, CorpusFormat::Raw)
            .unwrap();
        assert!(config.resegments_input());

        config.do_word_segmentation = false;
        assert!(!config.resegments_input());
    }

    #[test]
    fn test_with_settings_rejects_bad_values() {
        let model = LexiconModel::from_toml_str("[[slots]]\nname = \"a\"").unwrap();
        let config = EngineConfig::for_model(&model);

        let too_many = EngineSettings {
            do_tags: Some(vec![true, true]),
            ..Default::default()
        };
        let result = config.with_settings(&too_many);
        assert!(matches!(result, Err(EngineError::Config(_))));

        let json_input = EngineSettings {
            input_format: Some(CorpusFormat::Json),
            ..Default::default()
        };
        let result = config.with_settings(&json_input);
        assert!(matches!(result, Err(EngineError::Config(_))));

        let slash = EngineSettings {
            word_bound: Some("/".to_string()),
            ..Default::default()
        };
        let result = config.with_settings(&slash);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_set_do_tag_out_of_range() {
        let model = LexiconModel::from_toml_str("").unwrap();
        let mut config = EngineConfig::for_model(&model);
        assert!(matches!(
            config.set_do_tag(0, true),
            Err(EngineError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_parse_settings() {
        let settings = EngineSettings::from_toml_str(
            r#"
            do_word_segmentation = false
            do_tags = [false, true]
            input_format = "tok"
            output_format = "json"
            word_bound = " "
            "#,
        )
        .unwrap();

        assert_eq!(settings.do_word_segmentation, Some(false));
        assert_eq!(settings.do_tags, Some(vec![false, true]));
        assert_eq!(settings.input_format, Some(CorpusFormat::WordBoundary));
        assert_eq!(settings.output_format, Some(CorpusFormat::Json));
        assert_eq!(settings.word_bound_char().unwrap(), Some(' '));
        assert_eq!(settings.unknown_tag, None);
    }

    #[test]
    fn test_empty_settings() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.to_toml_string().unwrap().trim(), "");
    }

    #[test]
    fn test_settings_from_config_round_trip() {
        let model = LexiconModel::from_toml_str("[[slots]]\nname = \"a\"").unwrap();
        let config = EngineConfig::for_model(&model);
        let settings = EngineSettings::from(&config);

        let text = settings.to_toml_string().unwrap();
        assert!(text.contains("output_format = \"full\""));
        let parsed = EngineSettings::from_toml_str(&text).unwrap();
        assert_eq!(parsed, settings);
        assert_eq!(config.with_settings(&parsed).unwrap(), config);
    }

    #[test]
    fn test_reject_unknown_field() {
        let err = EngineSettings::from_toml_str("threads = 4").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_reject_long_word_bound() {
        let settings = EngineSettings {
            word_bound: Some("ab".to_string()),
            ..Default::default()
        };
        let result = settings.word_bound_char();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "unknown_tag = \"N/A\"").unwrap();
        let settings = EngineSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.unknown_tag.as_deref(), Some("N/A"));

        let err = EngineSettings::from_file("/nonexistent/settings.toml").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
