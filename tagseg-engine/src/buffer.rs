//! In-memory byte buffers
//!
//! An [`InputBuffer`] is an immutable copy of caller bytes. An
//! [`OutputBuffer`] is a two-state resource: while `Open` it accepts
//! writes, once `Frozen` it exposes a read-only view of what was written
//! since the last rewind.

use crate::error::{EngineError, Result};
use std::fmt;
use std::io;

/// Immutable copy of caller-supplied input bytes
#[derive(Clone, PartialEq, Eq)]
pub struct InputBuffer {
    data: Box<[u8]>,
}

impl InputBuffer {
    /// Copy `bytes` into a new buffer
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { data: bytes.into() }
    }

    /// Take ownership of `bytes`
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            data: bytes.into_boxed_slice(),
        }
    }

    /// Buffer contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InputBuffer")
            .field(&format!("<{} bytes>", self.data.len()))
            .finish()
    }
}

impl From<Vec<u8>> for InputBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&str> for InputBuffer {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

/// Lifecycle state of an [`OutputBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// Accepting writes
    Open,
    /// Read-only view handed out
    Frozen,
}

/// Growable output buffer with a write cursor
///
/// The frozen view covers `[0, cursor)`. [`rewind`](Self::rewind) moves the
/// cursor back to 0 without truncating storage, so bytes from an earlier,
/// longer write stay behind the cursor but never appear in a view.
#[derive(Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    data: Vec<u8>,
    cursor: usize,
    state: BufferState,
}

impl OutputBuffer {
    /// Create an empty, open buffer
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty, open buffer with preallocated storage
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cursor: 0,
            state: BufferState::Open,
        }
    }

    /// Current state
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Whether the buffer has been frozen
    pub fn is_frozen(&self) -> bool {
        self.state == BufferState::Frozen
    }

    /// Bytes written since the last rewind
    pub fn len(&self) -> usize {
        self.cursor
    }

    /// Whether nothing was written since the last rewind
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Bytes held in storage, including stale bytes past the cursor
    pub fn stored_len(&self) -> usize {
        self.data.len()
    }

    /// Write `bytes` at the cursor, overwriting stale storage first
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if self.is_frozen() {
            return Err(EngineError::ContractViolation(
                "write to a frozen output buffer".to_string(),
            ));
        }

        // cursor never passes the end of storage
        let overlap = (self.data.len() - self.cursor).min(bytes.len());
        self.data[self.cursor..self.cursor + overlap].copy_from_slice(&bytes[..overlap]);
        self.data.extend_from_slice(&bytes[overlap..]);
        self.cursor += bytes.len();
        Ok(())
    }

    /// Freeze the buffer and return the view of the bytes written
    ///
    /// Freezing again returns the identical view.
    pub fn freeze(&mut self) -> &[u8] {
        self.state = BufferState::Frozen;
        &self.data[..self.cursor]
    }

    /// The frozen view, or `None` while the buffer is open
    pub fn frozen(&self) -> Option<&[u8]> {
        match self.state {
            BufferState::Frozen => Some(&self.data[..self.cursor]),
            BufferState::Open => None,
        }
    }

    /// Move the cursor to 0 and re-open the buffer
    ///
    /// Invalidates any view returned by an earlier freeze.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.state = BufferState::Open;
    }

    /// Copy of the bytes written since the last rewind
    pub fn to_vec(&self) -> Vec<u8> {
        self.data[..self.cursor].to_vec()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputBuffer")
            .field("state", &self.state)
            .field("len", &self.cursor)
            .field("stored", &self.data.len())
            .finish()
    }
}

impl io::Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
