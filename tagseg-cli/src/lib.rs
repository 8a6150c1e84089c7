//! tagseg CLI library
//!
//! Command implementations behind the `tagseg` binary.

pub mod commands;
pub mod error;
pub mod input;
pub mod progress;

pub use error::{CliError, CliResult};
