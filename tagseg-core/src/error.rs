//! Core error types

use thiserror::Error;

/// Errors raised by a [`Model`](crate::Model)
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model could not be loaded
    #[error("failed to load model from {path}: {reason}")]
    Load {
        /// Where the model was loaded from
        path: String,
        /// Why loading failed
        reason: String,
    },

    /// A segmentation or tagging call failed
    #[error("model capability failed: {0}")]
    Capability(String),
}

/// Errors raised by corpus readers and writers
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input could not be parsed in the configured format
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// A sentence was written before the writer was configured
    #[error("writer received a sentence before its configuration")]
    Unconfigured,

    /// The writer configuration was pushed more than once
    #[error("writer configuration pushed more than once")]
    AlreadyConfigured,

    /// The format does not support this role
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// JSON serialization failure
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for corpus operations
pub type CorpusResult<T> = std::result::Result<T, CorpusError>;
