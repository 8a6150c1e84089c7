//! Generational handle registry
//!
//! Handles are `u64` values with the slot generation in the high 32 bits and
//! the slot index in the low 32 bits. Generations start at 1, so `0` is
//! never a valid handle, and removing an entry bumps its slot's generation
//! so stale copies of the handle stop resolving.

use crate::error::FfiError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tagseg_engine::{Engine, InputBuffer, OutputBuffer};

/// Opaque handle passed across the boundary
pub type TsHandle = u64;

/// What a handle refers to
#[derive(Clone)]
pub enum Entry {
    /// Engine with its per-handle run lock
    Engine(Arc<Mutex<Engine>>),
    /// Immutable input buffer
    Input(Arc<InputBuffer>),
    /// Output buffer with its write lock
    Output(Arc<Mutex<OutputBuffer>>),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Engine(_) => "engine",
            Entry::Input(_) => "input stream",
            Entry::Output(_) => "output stream",
        }
    }
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Arena of live entries
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

fn encode(index: u32, generation: u32) -> TsHandle {
    (u64::from(generation) << 32) | u64::from(index)
}

fn decode(handle: TsHandle) -> (u32, u32) {
    ((handle & 0xFFFF_FFFF) as u32, (handle >> 32) as u32)
}

impl Registry {
    /// Empty registry
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `entry` and return its handle
    pub fn insert(&mut self, entry: Entry) -> TsHandle {
        let kind = entry.kind();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                encode(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 1,
                    entry: Some(entry),
                });
                encode(index, 1)
            }
        };
        tracing::trace!(handle, kind, live = self.len(), "handle issued");
        handle
    }

    /// Entry behind `handle`
    pub fn get(&self, handle: TsHandle) -> Result<&Entry, FfiError> {
        if handle == 0 {
            return Err(FfiError::InvalidHandle {
                handle,
                reason: "zero handle",
            });
        }
        let (index, generation) = decode(handle);
        self.slots
            .get(index as usize)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(FfiError::InvalidHandle {
                handle,
                reason: "unknown or destroyed handle",
            })
    }

    /// Remove the entry behind `handle`, invalidating the handle
    pub fn remove(&mut self, handle: TsHandle) -> Result<Entry, FfiError> {
        self.get(handle)?;
        let (index, _) = decode(handle);
        let slot = &mut self.slots[index as usize];
        let entry = slot.entry.take().ok_or(FfiError::InvalidHandle {
            handle,
            reason: "unknown or destroyed handle",
        })?;
        slot.generation = match slot.generation.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        self.free.push(index);
        let kind = entry.kind();
        tracing::trace!(handle, kind, live = self.len(), "handle released");
        Ok(entry)
    }

    /// Remove `handle` only if it refers to the kind `expect` accepts
    pub fn remove_kind(
        &mut self,
        handle: TsHandle,
        expect: fn(&Entry) -> bool,
    ) -> Result<Entry, FfiError> {
        if !expect(self.get(handle)?) {
            return Err(FfiError::InvalidHandle {
                handle,
                reason: "handle refers to a different kind of object",
            });
        }
        self.remove(handle)
    }

    /// Engine behind `handle`
    pub fn engine(&self, handle: TsHandle) -> Result<Arc<Mutex<Engine>>, FfiError> {
        match self.get(handle)? {
            Entry::Engine(engine) => Ok(Arc::clone(engine)),
            other => Err(wrong_kind(handle, other)),
        }
    }

    /// Input buffer behind `handle`
    pub fn input(&self, handle: TsHandle) -> Result<Arc<InputBuffer>, FfiError> {
        match self.get(handle)? {
            Entry::Input(input) => Ok(Arc::clone(input)),
            other => Err(wrong_kind(handle, other)),
        }
    }

    /// Output buffer behind `handle`
    pub fn output(&self, handle: TsHandle) -> Result<Arc<Mutex<OutputBuffer>>, FfiError> {
        match self.get(handle)? {
            Entry::Output(output) => Ok(Arc::clone(output)),
            other => Err(wrong_kind(handle, other)),
        }
    }

    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn wrong_kind(handle: TsHandle, found: &Entry) -> FfiError {
    tracing::warn!(handle, found = found.kind(), "handle of the wrong kind");
    FfiError::InvalidHandle {
        handle,
        reason: "handle refers to a different kind of object",
    }
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry::new());

/// Lock the process-wide registry
///
/// Entries hold no invariants a panic could break, so poisoning is ignored.
pub fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}
