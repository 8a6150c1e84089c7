//! Corpus format identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Textual encoding used to read input sentences or write output sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CorpusFormat {
    /// Unsegmented text, one sentence per line
    #[default]
    #[serde(rename = "raw")]
    Raw,
    /// Words separated by the word-bound marker
    #[serde(rename = "tok", alias = "tokenized", alias = "word_boundary")]
    WordBoundary,
    /// Words with their tags: `surface/tag0/tag1`
    #[serde(rename = "full", alias = "fully_tagged")]
    FullyTagged,
    /// One JSON object per sentence (output only)
    #[serde(rename = "json")]
    Json,
}

impl CorpusFormat {
    /// All known formats
    pub const ALL: [CorpusFormat; 4] = [
        CorpusFormat::Raw,
        CorpusFormat::WordBoundary,
        CorpusFormat::FullyTagged,
        CorpusFormat::Json,
    ];

    /// Short name used in configuration files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            CorpusFormat::Raw => "raw",
            CorpusFormat::WordBoundary => "tok",
            CorpusFormat::FullyTagged => "full",
            CorpusFormat::Json => "json",
        }
    }

    /// Whether a reader exists for this format
    pub fn is_readable(self) -> bool {
        !matches!(self, CorpusFormat::Json)
    }

    /// Whether sentences read in this format are already segmented
    pub fn is_presegmented(self) -> bool {
        matches!(self, CorpusFormat::WordBoundary | CorpusFormat::FullyTagged)
    }

    /// Stable integer code used across the C boundary
    pub fn code(self) -> u32 {
        match self {
            CorpusFormat::Raw => 0,
            CorpusFormat::WordBoundary => 1,
            CorpusFormat::FullyTagged => 2,
            CorpusFormat::Json => 3,
        }
    }

    /// Inverse of [`CorpusFormat::code`]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }
}

impl fmt::Display for CorpusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorpusFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(CorpusFormat::Raw),
            "tok" | "tokenized" | "word_boundary" => Ok(CorpusFormat::WordBoundary),
            "full" | "fully_tagged" => Ok(CorpusFormat::FullyTagged),
            "json" => Ok(CorpusFormat::Json),
            other => Err(format!("unknown corpus format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("raw".parse(), Ok(CorpusFormat::Raw));
        assert_eq!("TOK".parse(), Ok(CorpusFormat::WordBoundary));
        assert_eq!("fully_tagged".parse(), Ok(CorpusFormat::FullyTagged));
        assert!("mecab".parse::<CorpusFormat>().is_err());
    }

    #[test]
    fn test_format_codes_are_stable() {
        for format in CorpusFormat::ALL {
            assert_eq!(CorpusFormat::from_code(format.code()), Some(format));
        }
        assert_eq!(CorpusFormat::from_code(42), None);
    }

    #[test]
    fn test_json_is_write_only() {
        assert!(!CorpusFormat::Json.is_readable());
        assert!(CorpusFormat::Raw.is_readable());
        assert!(!CorpusFormat::Raw.is_presegmented());
    }
}
