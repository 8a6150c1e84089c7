//! Status codes and the thread-local last-error message

use std::cell::RefCell;
use std::ffi::{c_char, CString};
use tagseg_engine::{EngineError, Phase};
use thiserror::Error;

/// Outcome of every C entry point
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsStatus {
    /// Success
    Ok = 0,
    /// Null pointer, bad format code, non-UTF-8 path or invalid settings
    InvalidArgument = 1,
    /// The model could not be loaded
    ModelLoadFailed = 2,
    /// A file stream could not be opened, read or written
    IoError = 3,
    /// Stale or wrong-kind handle, frozen output, busy engine, bad slot
    ContractViolation = 4,
    /// Reading a sentence failed
    ReadFailed = 5,
    /// Word segmentation failed
    SegmentFailed = 6,
    /// Tagging failed
    TagFailed = 7,
    /// Writing a sentence failed
    WriteFailed = 8,
    /// A panic was caught at the boundary
    Panic = 9,
}

/// Errors raised inside the boundary layer
#[derive(Error, Debug)]
pub enum FfiError {
    /// Bad argument from the caller
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Handle is zero, stale or of the wrong kind
    #[error("invalid handle {handle:#x}: {reason}")]
    InvalidHandle {
        /// Raw handle value
        handle: u64,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Engine error
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl FfiError {
    /// Status reported for this error
    pub fn status(&self) -> TsStatus {
        match self {
            FfiError::InvalidArgument(_) => TsStatus::InvalidArgument,
            FfiError::InvalidHandle { .. } => TsStatus::ContractViolation,
            FfiError::Engine(e) => match e {
                EngineError::ModelLoadFailed { .. } => TsStatus::ModelLoadFailed,
                EngineError::Io { .. } => TsStatus::IoError,
                EngineError::Phase { phase, .. } => match phase {
                    Phase::Read => TsStatus::ReadFailed,
                    Phase::Segment => TsStatus::SegmentFailed,
                    Phase::Tag => TsStatus::TagFailed,
                    Phase::Write => TsStatus::WriteFailed,
                },
                EngineError::ContractViolation(_) => TsStatus::ContractViolation,
                EngineError::Config(_) => TsStatus::InvalidArgument,
            },
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record `message` as this thread's last error
pub fn set_last_error(message: &str) {
    let message = CString::new(message.replace('\0', " ")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

/// Forget this thread's last error
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Pointer to this thread's last error, or null if the last call succeeded
///
/// Valid until the next `ts_*` call on the same thread.
pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |message| message.as_ptr())
    })
}
