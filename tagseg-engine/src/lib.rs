//! Engine handle and read-process-write pipeline
//!
//! The [`Engine`] owns a loaded [`Model`](tagseg_core::Model) and its
//! configuration. Each job binds an input [`Source`] and an output [`Sink`]
//! (memory buffers or files), runs the [`Pipeline`] and leaves the result in
//! the sink. Memory output lands in an [`OutputBuffer`], whose contents are
//! read back through [`OutputBuffer::freeze`].
//!
//! ```rust
//! use tagseg_core::LexiconModel;
//! use tagseg_engine::{Engine, InputBuffer, OutputBuffer};
//!
//! let model = LexiconModel::from_toml_str(
//!     r#"
//!     [[slots]]
//!     name = "upper"
//!     fallback = "upper"
//!     "#,
//! )
//! .unwrap();
//! let mut engine = Engine::with_model(Box::new(model));
//!
//! let input = InputBuffer::from_bytes(b"ab cd");
//! let mut output = OutputBuffer::new();
//! engine.run_memory_to_memory(&input, &mut output).unwrap();
//!
//! assert_eq!(output.freeze(), b"ab/AB\tcd/CD\n");
//! ```

#![warn(missing_docs)]

pub mod bridge;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod stream;

// Re-export key types
pub use bridge::CorpusBridge;
pub use buffer::{BufferState, InputBuffer, OutputBuffer};
pub use config::{EngineConfig, EngineSettings};
pub use engine::Engine;
pub use error::{EngineError, Phase, Result};
pub use pipeline::{Pipeline, RunStats};
pub use stream::{Sink, Source};

// Re-export from core for convenience
pub use tagseg_core::{CorpusFormat, LexiconModel, Model, Sentence, Word};
