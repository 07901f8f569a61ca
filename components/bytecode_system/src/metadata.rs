//! Interpreter metadata for property reads.
//!
//! Each profiled read owns one [`GetByIdModeMetadata`]. The interpreter
//! thread rewrites it as it executes while compiler threads take racy
//! snapshots, so every field is an atomic. A snapshot may mix fields from
//! two updates; readers treat it as a hint and validate against the shape.

use std::sync::atomic::{AtomicI32, AtomicU32, AtomicU8, Ordering};

use core_types::{PropertyOffset, ShapeId};

/// How the interpreter currently caches a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GetByIdMode {
    /// Self load from a single cached shape
    Default = 0,
    /// Load from a fixed prototype object
    ProtoLoad = 1,
    /// Read of a property known to be absent
    Unset = 2,
    /// `length` of an array
    ArrayLength = 3,
}

impl GetByIdMode {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => GetByIdMode::ProtoLoad,
            2 => GetByIdMode::Unset,
            3 => GetByIdMode::ArrayLength,
            _ => GetByIdMode::Default,
        }
    }
}

/// A point-in-time copy of a read's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSnapshot {
    /// Cache mode
    pub mode: GetByIdMode,
    /// Cached shape in [`GetByIdMode::Default`] mode
    pub structure: Option<ShapeId>,
    /// Cached offset in [`GetByIdMode::Default`] mode
    pub offset: PropertyOffset,
}

/// Single-shape cache of one property read.
#[derive(Debug)]
pub struct GetByIdModeMetadata {
    mode: AtomicU8,
    /// Shape id plus one; zero means no shape
    structure: AtomicU32,
    offset: AtomicI32,
}

impl GetByIdModeMetadata {
    /// Metadata in default mode with nothing cached yet.
    pub fn new() -> Self {
        Self {
            mode: AtomicU8::new(GetByIdMode::Default as u8),
            structure: AtomicU32::new(0),
            offset: AtomicI32::new(PropertyOffset::INVALID.raw()),
        }
    }

    /// Caches a self load of `offset` on `structure`.
    pub fn cache_self_load(&self, structure: ShapeId, offset: PropertyOffset) {
        self.offset.store(offset.raw(), Ordering::Relaxed);
        self.structure.store(structure.0 + 1, Ordering::Relaxed);
        self.mode.store(GetByIdMode::Default as u8, Ordering::Release);
    }

    /// Switches to another mode, dropping the cached shape.
    pub fn set_mode(&self, mode: GetByIdMode) {
        self.structure.store(0, Ordering::Relaxed);
        self.offset
            .store(PropertyOffset::INVALID.raw(), Ordering::Relaxed);
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Forgets everything, back to the initial state.
    pub fn clear(&self) {
        self.set_mode(GetByIdMode::Default);
    }

    /// Current mode.
    pub fn mode(&self) -> GetByIdMode {
        GetByIdMode::from_raw(self.mode.load(Ordering::Acquire))
    }

    /// Takes a racy snapshot.
    pub fn snapshot(&self) -> MetadataSnapshot {
        let mode = self.mode();
        let structure = match self.structure.load(Ordering::Relaxed) {
            0 => None,
            raw => Some(ShapeId(raw - 1)),
        };
        let offset = PropertyOffset::from_raw(self.offset.load(Ordering::Relaxed));
        MetadataSnapshot {
            mode,
            structure,
            offset,
        }
    }
}

impl Default for GetByIdModeMetadata {
    fn default() -> Self {
        Self::new()
    }
}
