//! Sentence model, segmentation/tagging capability and corpus formats
//!
//! This crate holds everything the tagging pipeline passes around:
//! - [`Sentence`] and [`Word`]: the per-iteration unit of work
//! - [`Model`]: the opaque "segment" and "tag slot N" capability, with
//!   [`LexiconModel`] as a concrete rule/lexicon implementation
//! - [`corpus`]: format-specific readers and writers
//! - [`parser`]: escape-aware, zero-copy parsing of tagged output
//! - [`tokenizer`]: token streams with byte offsets over tagged output
//!
//! # Example
//!
//! ```rust
//! use tagseg_core::{LexiconModel, Model, Sentence};
//!
//! let mut model = LexiconModel::from_toml_str(
//!     r#"
//!     [[slots]]
//!     name = "upper"
//!     fallback = "upper"
//!     "#,
//! )
//! .unwrap();
//!
//! let mut sentence = Sentence::from_raw("ab cd");
//! model.segment(&mut sentence).unwrap();
//! model.tag(&mut sentence, 0).unwrap();
//!
//! assert_eq!(sentence.words[1].tag(0), Some("CD"));
//! ```

#![warn(missing_docs)]

pub mod corpus;
pub mod error;
pub mod format;
pub mod model;
pub mod parser;
pub mod sentence;
pub mod tokenizer;

/// Default delimiter between words in segmented formats
pub const WORD_DELIM: char = '\t';
/// Delimiter between a surface and its tags
pub const TAG_DELIM: char = '/';
/// Escape character for delimiters inside surfaces and tags
pub const ESCAPE: char = '\\';

// Re-export key types
pub use corpus::{CorpusReader, CorpusWriter, WriterConfig};
pub use error::{CorpusError, ModelError};
pub use format::CorpusFormat;
pub use model::{LexiconModel, Model};
pub use parser::{Parsed, Surface, Tags, WordIterator};
pub use sentence::{Sentence, Word};
pub use tokenizer::{FilteredTokens, ParsedTokens, Token, TokenStream};
