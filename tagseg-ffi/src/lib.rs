//! C ABI for the tagseg engine
//!
//! Every object crossing the boundary is an opaque [`TsHandle`]; every
//! function returns a [`TsStatus`]. On failure the message is available
//! from [`ts_last_error_message`] on the same thread. Panics are caught and
//! reported as [`TsStatus::Panic`].
//!
//! A typical memory-to-memory job:
//!
//! ```c
//! TsHandle engine, input, output;
//! ts_engine_create("model.toml", &engine);
//! ts_input_stream_create(text, text_len, &input);
//! ts_output_stream_create(&output);
//! ts_run_memory_to_memory(engine, input, output);
//! TsStr view;
//! ts_output_stream_freeze(output, &view);
//! /* view.ptr[0..view.len] stays valid until output is rewound or destroyed */
//! ```
//!
//! # Safety
//! Pointer arguments must be null or valid for the access the function
//! documents. Strings must be NUL-terminated.

use std::any::Any;
use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use tagseg_core::CorpusFormat;
use tagseg_engine::{Engine, EngineError, InputBuffer, OutputBuffer};

mod error;
mod registry;

pub use error::{clear_last_error, set_last_error, FfiError, TsStatus};
pub use registry::{Entry, TsHandle};

use registry::registry;

/// Borrowed view of a frozen output buffer
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TsStr {
    /// First byte, or a dangling non-null pointer when `len` is 0
    pub ptr: *const u8,
    /// Length in bytes
    pub len: i32,
}

type FfiResult<T> = Result<T, FfiError>;

/// Run `body`, turning errors and panics into a status
fn guard<F>(function: &'static str, body: F) -> TsStatus
where
    F: FnOnce() -> FfiResult<()>,
{
    clear_last_error();
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => TsStatus::Ok,
        Ok(Err(err)) => {
            let status = err.status();
            if status == TsStatus::ContractViolation {
                tracing::warn!(function, error = %err, "call rejected");
            } else {
                tracing::debug!(function, error = %err, "call failed");
            }
            set_last_error(&err.to_string());
            status
        }
        Err(payload) => {
            let message = format!("panic in {function}: {}", panic_message(payload.as_ref()));
            tracing::error!("{message}");
            set_last_error(&message);
            TsStatus::Panic
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(&message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}

/// # Safety
/// `ptr` must be null or valid for writes.
unsafe fn out_arg<'a, T>(ptr: *mut T) -> FfiResult<&'a mut T> {
    ptr.as_mut()
        .ok_or_else(|| FfiError::InvalidArgument("null output pointer".to_string()))
}

/// # Safety
/// `ptr` must be null or a NUL-terminated string.
unsafe fn path_arg(ptr: *const c_char) -> FfiResult<PathBuf> {
    if ptr.is_null() {
        return Err(FfiError::InvalidArgument("null path".to_string()));
    }
    let path = CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| FfiError::InvalidArgument("path is not valid UTF-8".to_string()))?;
    Ok(PathBuf::from(path))
}

fn format_arg(code: u32) -> FfiResult<CorpusFormat> {
    CorpusFormat::from_code(code)
        .ok_or_else(|| FfiError::InvalidArgument(format!("unknown format code {code}")))
}

fn try_lock<'a, T>(lock: &'a Mutex<T>, what: &str) -> FfiResult<MutexGuard<'a, T>> {
    lock.try_lock().map_err(|e| {
        let reason = match e {
            TryLockError::WouldBlock => format!("{what} busy"),
            TryLockError::Poisoned(_) => format!("{what} unusable after an earlier panic"),
        };
        FfiError::Engine(EngineError::ContractViolation(reason))
    })
}

fn with_engine<T>(handle: TsHandle, f: impl FnOnce(&mut Engine) -> FfiResult<T>) -> FfiResult<T> {
    // Registry lock is released before the engine lock is taken
    let engine = registry().engine(handle)?;
    let mut engine = try_lock(&engine, "engine")?;
    f(&mut engine)
}

fn with_output<T>(
    handle: TsHandle,
    f: impl FnOnce(&mut OutputBuffer) -> FfiResult<T>,
) -> FfiResult<T> {
    let output = registry().output(handle)?;
    let mut output = try_lock(&output, "output stream")?;
    f(&mut output)
}

// Engine

/// Load the model at `model_path` and create an engine
///
/// # Safety
/// `model_path` must be a NUL-terminated string; `out` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ts_engine_create(
    model_path: *const c_char,
    out: *mut TsHandle,
) -> TsStatus {
    guard("ts_engine_create", || {
        let out = out_arg(out)?;
        let path = path_arg(model_path)?;
        let engine = Engine::load(&path)?;
        *out = registry().insert(Entry::Engine(Arc::new(Mutex::new(engine))));
        Ok(())
    })
}

/// Destroy an engine; the handle becomes invalid
#[no_mangle]
pub extern "C" fn ts_engine_destroy(engine: TsHandle) -> TsStatus {
    guard("ts_engine_destroy", || {
        registry().remove_kind(engine, |e| matches!(e, Entry::Engine(_)))?;
        Ok(())
    })
}

/// Turn word segmentation on or off for later runs
#[no_mangle]
pub extern "C" fn ts_engine_set_word_segmentation(engine: TsHandle, on: bool) -> TsStatus {
    guard("ts_engine_set_word_segmentation", || {
        with_engine(engine, |engine| {
            engine.set_do_word_segmentation(on);
            Ok(())
        })
    })
}

/// Turn tagging of `slot` on or off for later runs
#[no_mangle]
pub extern "C" fn ts_engine_set_tag(engine: TsHandle, slot: u32, on: bool) -> TsStatus {
    guard("ts_engine_set_tag", || {
        with_engine(engine, |engine| Ok(engine.set_do_tag(slot as usize, on)?))
    })
}

/// Select the input and output formats by code
///
/// Codes: 0 raw, 1 word boundary, 2 fully tagged, 3 json (output only).
#[no_mangle]
pub extern "C" fn ts_engine_set_formats(engine: TsHandle, input: u32, output: u32) -> TsStatus {
    guard("ts_engine_set_formats", || {
        let input = format_arg(input)?;
        let output = format_arg(output)?;
        with_engine(engine, |engine| Ok(engine.set_formats(input, output)?))
    })
}

/// Number of tag slots the engine's model provides
///
/// # Safety
/// `out` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ts_engine_tag_slot_count(engine: TsHandle, out: *mut u32) -> TsStatus {
    guard("ts_engine_tag_slot_count", || {
        let out = out_arg(out)?;
        let count = with_engine(engine, |engine| Ok(engine.tag_slot_count()))?;
        *out = u32::try_from(count)
            .map_err(|_| FfiError::InvalidArgument(format!("{count} slots do not fit in u32")))?;
        Ok(())
    })
}

// Streams

/// Copy `len` bytes at `bytes` into a new input stream
///
/// # Safety
/// `bytes` must be valid for `len` reads (it may be null when `len` is 0);
/// `out` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ts_input_stream_create(
    bytes: *const u8,
    len: usize,
    out: *mut TsHandle,
) -> TsStatus {
    guard("ts_input_stream_create", || {
        let out = out_arg(out)?;
        let data = if len == 0 {
            &[][..]
        } else if bytes.is_null() {
            return Err(FfiError::InvalidArgument("null input bytes".to_string()));
        } else {
            std::slice::from_raw_parts(bytes, len)
        };
        let input = InputBuffer::from_bytes(data);
        *out = registry().insert(Entry::Input(Arc::new(input)));
        Ok(())
    })
}

/// Destroy an input stream
#[no_mangle]
pub extern "C" fn ts_input_stream_destroy(input: TsHandle) -> TsStatus {
    guard("ts_input_stream_destroy", || {
        registry().remove_kind(input, |e| matches!(e, Entry::Input(_)))?;
        Ok(())
    })
}

/// Create an empty, open output stream
///
/// # Safety
/// `out` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ts_output_stream_create(out: *mut TsHandle) -> TsStatus {
    guard("ts_output_stream_create", || {
        let out = out_arg(out)?;
        *out = registry().insert(Entry::Output(Arc::new(Mutex::new(OutputBuffer::new()))));
        Ok(())
    })
}

/// Destroy an output stream, invalidating any frozen view of it
#[no_mangle]
pub extern "C" fn ts_output_stream_destroy(output: TsHandle) -> TsStatus {
    guard("ts_output_stream_destroy", || {
        registry().remove_kind(output, |e| matches!(e, Entry::Output(_)))?;
        Ok(())
    })
}

/// Reset the write position to 0 and re-open the stream
///
/// Any view from an earlier freeze is invalidated.
#[no_mangle]
pub extern "C" fn ts_output_stream_rewind(output: TsHandle) -> TsStatus {
    guard("ts_output_stream_rewind", || {
        with_output(output, |output| {
            output.rewind();
            Ok(())
        })
    })
}

/// Freeze `output` once its length is known to fit in `max_len`
fn freeze_view(output: &mut OutputBuffer, max_len: i32) -> FfiResult<TsStr> {
    let len = i32::try_from(output.len())
        .ok()
        .filter(|&len| len <= max_len)
        .ok_or_else(|| {
            FfiError::Engine(EngineError::ContractViolation(format!(
                "frozen output of {} bytes does not fit in an i32 length",
                output.len()
            )))
        })?;
    let view = output.freeze();
    Ok(TsStr {
        ptr: view.as_ptr(),
        len,
    })
}

/// Freeze the stream and expose the bytes written since the last rewind
///
/// Freezing again yields the same pointer and length. The view stays valid
/// until the stream is rewound or destroyed.
///
/// # Safety
/// `out` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ts_output_stream_freeze(output: TsHandle, out: *mut TsStr) -> TsStatus {
    guard("ts_output_stream_freeze", || {
        let out = out_arg(out)?;
        *out = with_output(output, |output| freeze_view(output, i32::MAX))?;
        Ok(())
    })
}

// Runs

fn run_memory_to_memory(engine: TsHandle, input: TsHandle, output: TsHandle) -> FfiResult<()> {
    let (input, output) = {
        let registry = registry();
        (registry.input(input)?, registry.output(output)?)
    };
    let mut output = try_lock(&output, "output stream")?;
    with_engine(engine, |engine| {
        engine.run_memory_to_memory(&input, &mut output)?;
        Ok(())
    })
}

/// Run the pipeline from an input stream into an output stream
#[no_mangle]
pub extern "C" fn ts_run_memory_to_memory(
    engine: TsHandle,
    input: TsHandle,
    output: TsHandle,
) -> TsStatus {
    guard("ts_run_memory_to_memory", || {
        run_memory_to_memory(engine, input, output)
    })
}

/// Run the pipeline from a file into an output stream
///
/// # Safety
/// `input_path` must be a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ts_run_file_to_memory(
    engine: TsHandle,
    input_path: *const c_char,
    output: TsHandle,
) -> TsStatus {
    guard("ts_run_file_to_memory", || {
        let path = path_arg(input_path)?;
        let output = registry().output(output)?;
        let mut output = try_lock(&output, "output stream")?;
        with_engine(engine, |engine| {
            engine.run_file_to_memory(&path, &mut output)?;
            Ok(())
        })
    })
}

/// Run the pipeline from an input stream into a file
///
/// # Safety
/// `output_path` must be a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ts_run_memory_to_file(
    engine: TsHandle,
    input: TsHandle,
    output_path: *const c_char,
) -> TsStatus {
    guard("ts_run_memory_to_file", || {
        let path = path_arg(output_path)?;
        let input = registry().input(input)?;
        with_engine(engine, |engine| {
            engine.run_memory_to_file(&input, &path)?;
            Ok(())
        })
    })
}

/// Run the pipeline from one file into another
///
/// # Safety
/// Both paths must be NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn ts_run_file_to_file(
    engine: TsHandle,
    input_path: *const c_char,
    output_path: *const c_char,
) -> TsStatus {
    guard("ts_run_file_to_file", || {
        let input = path_arg(input_path)?;
        let output = path_arg(output_path)?;
        with_engine(engine, |engine| {
            engine.run_file_to_file(&input, &output)?;
            Ok(())
        })
    })
}

/// Message of the last failed call on this thread, or null
///
/// The string is owned by the library and valid until the next `ts_*`
/// call on the same thread.
#[no_mangle]
pub extern "C" fn ts_last_error_message() -> *const c_char {
    error::last_error_ptr()
}
