//! Property and scope storage offsets.

use std::fmt;

/// Storage slot of a property inside an object.
///
/// [`PropertyOffset::INVALID`] marks properties that are not plain stored
/// values: misses, custom accessors and getters resolved through a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyOffset(i32);

impl PropertyOffset {
    /// The "not a stored value" sentinel.
    pub const INVALID: PropertyOffset = PropertyOffset(-1);

    /// A valid storage offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset` does not fit the offset range.
    pub fn new(offset: u32) -> Self {
        assert!(offset <= i32::MAX as u32, "property offset {offset} out of range");
        PropertyOffset(offset as i32)
    }

    /// Whether this offset names a real storage slot.
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// The slot index, if valid.
    pub fn index(self) -> Option<u32> {
        if self.is_valid() {
            Some(self.0 as u32)
        } else {
            None
        }
    }

    /// The raw encoding, for storing in an atomic.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Decodes [`PropertyOffset::raw`]; negative values are invalid.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            PropertyOffset::INVALID
        } else {
            PropertyOffset(raw)
        }
    }
}

impl Default for PropertyOffset {
    fn default() -> Self {
        PropertyOffset::INVALID
    }
}

impl fmt::Display for PropertyOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "{index}"),
            None => f.write_str("invalid"),
        }
    }
}

/// Slot of a binding inside a module environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeOffset(pub u32);
