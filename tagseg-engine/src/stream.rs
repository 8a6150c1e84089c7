//! Stream adapters binding the pipeline to memory buffers or files
//!
//! Memory variants borrow their buffer, so an adapter can never outlive the
//! buffer it reads from or writes to.

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::{EngineError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Readable input positioned at its start
#[derive(Debug)]
pub enum Source<'a> {
    /// Borrowed input buffer
    Memory(Cursor<&'a [u8]>),
    /// Owned file handle
    File {
        /// File location, kept for error messages
        path: PathBuf,
        /// Buffered handle
        reader: BufReader<File>,
    },
}

impl<'a> Source<'a> {
    /// Read from an input buffer
    pub fn memory(input: &'a InputBuffer) -> Self {
        Source::Memory(Cursor::new(input.as_bytes()))
    }

    /// Open `path` for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Source::File {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
        })
    }

    /// Short description for log records
    pub fn describe(&self) -> String {
        match self {
            Source::Memory(cursor) => format!("memory ({} bytes)", cursor.get_ref().len()),
            Source::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Read for Source<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Memory(cursor) => cursor.read(buf),
            Source::File { reader, .. } => reader.read(buf),
        }
    }
}

impl BufRead for Source<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Source::Memory(cursor) => cursor.fill_buf(),
            Source::File { reader, .. } => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Source::Memory(cursor) => cursor.consume(amt),
            Source::File { reader, .. } => reader.consume(amt),
        }
    }
}

/// Writable output
#[derive(Debug)]
pub enum Sink<'a> {
    /// Borrowed output buffer
    Memory(&'a mut OutputBuffer),
    /// Owned file handle
    File {
        /// File location, kept for error messages
        path: PathBuf,
        /// Buffered handle
        writer: BufWriter<File>,
    },
}

impl<'a> Sink<'a> {
    /// Write into an output buffer
    ///
    /// Fails if the buffer is frozen.
    pub fn memory(output: &'a mut OutputBuffer) -> Result<Self> {
        if output.is_frozen() {
            return Err(EngineError::ContractViolation(
                "output buffer is frozen; rewind it before running into it".to_string(),
            ));
        }
        Ok(Sink::Memory(output))
    }

    /// Create or truncate `path` for writing
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Sink::File {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Short description for log records
    pub fn describe(&self) -> String {
        match self {
            Sink::Memory(_) => "memory".to_string(),
            Sink::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Write for Sink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Memory(output) => output.write(buf),
            Sink::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Memory(output) => output.flush(),
            Sink::File { writer, .. } => writer.flush(),
        }
    }
}
