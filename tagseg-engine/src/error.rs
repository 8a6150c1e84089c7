//! Layered error types
//!
//! Collaborator failures (model, corpus format, I/O) keep the phase they
//! happened in. Caller bugs are reported as [`EngineError::ContractViolation`]
//! instead of being allowed to corrupt state.

use std::fmt;
use std::path::PathBuf;
use tagseg_core::{CorpusError, ModelError};
use thiserror::Error;

/// Pipeline phase a failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pulling a sentence from the reader
    Read,
    /// Word segmentation
    Segment,
    /// Tagging of one slot
    Tag,
    /// Serializing a sentence or configuring the writer
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Read => "read",
            Phase::Segment => "segment",
            Phase::Tag => "tag",
            Phase::Write => "write",
        };
        f.write_str(name)
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Model could not be loaded; no engine was created
    #[error("failed to load model from {path}: {reason}")]
    ModelLoadFailed {
        /// Model location
        path: String,
        /// Why loading failed
        reason: String,
    },

    /// A file-backed stream could not be opened, read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the stream is bound to
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A run was aborted
    #[error("{phase} phase failed: {reason}")]
    Phase {
        /// Where the run stopped
        phase: Phase,
        /// Collaborator error message
        reason: String,
    },

    /// The caller broke a usage contract
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Invalid settings
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    /// Wrap a corpus reader/writer error raised during `phase`
    pub fn corpus(phase: Phase, err: CorpusError) -> Self {
        match err {
            CorpusError::Unconfigured
            | CorpusError::AlreadyConfigured
            | CorpusError::Unsupported(_) => EngineError::ContractViolation(err.to_string()),
            other => EngineError::Phase {
                phase,
                reason: other.to_string(),
            },
        }
    }

    /// Wrap a model capability error raised during `phase`
    pub fn model(phase: Phase, err: ModelError) -> Self {
        match err {
            ModelError::Load { path, reason } => EngineError::ModelLoadFailed { path, reason },
            other => EngineError::Phase {
                phase,
                reason: other.to_string(),
            },
        }
    }

    /// Phase of a run failure, if this is one
    pub fn phase(&self) -> Option<Phase> {
        match self {
            EngineError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
