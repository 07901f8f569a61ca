//! Property identifiers.
//!
//! Identifiers are uniqued: two identifiers compare equal exactly when they
//! name the same property key. A string key and a symbol with the same
//! description are different keys.

use std::fmt;
use std::sync::Arc;

use crate::{CellRef, ObjectId};

/// What kind of property key an [`Identifier`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UidKind {
    /// Ordinary string-named property
    String,
    /// Symbol-keyed property (the name is the symbol's description)
    Symbol,
    /// Class private name (`#x`)
    PrivateName,
}

/// A uniqued property key.
///
/// # Examples
///
/// ```
/// use core_types::Identifier;
///
/// let a = Identifier::new("length");
/// let b = Identifier::new("length");
/// assert_eq!(a, b);
/// assert_ne!(a, Identifier::symbol("length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    name: Arc<str>,
    kind: UidKind,
}

impl Identifier {
    /// A string-named property key.
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            kind: UidKind::String,
        }
    }

    /// A symbol-keyed property, described by `description`.
    pub fn symbol(description: &str) -> Self {
        Self {
            name: Arc::from(description),
            kind: UidKind::Symbol,
        }
    }

    /// A class private name.
    pub fn private_name(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            kind: UidKind::PrivateName,
        }
    }

    /// The property name or symbol description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of key.
    pub fn kind(&self) -> UidKind {
        self.kind
    }

    /// Whether this key is a symbol.
    pub fn is_symbol(&self) -> bool {
        self.kind == UidKind::Symbol
    }

    /// Parse this key as an array index.
    ///
    /// Only canonical decimal strings below `u32::MAX` are indices: `"0"`
    /// and `"42"` are, `"042"`, `"-1"` and `"4294967295"` are not.
    pub fn parse_index(&self) -> Option<u32> {
        if self.kind != UidKind::String {
            return None;
        }
        let bytes = self.name.as_bytes();
        if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
            return None;
        }
        if !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        match self.name.parse::<u64>() {
            Ok(value) if value < u32::MAX as u64 => Some(value as u32),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            UidKind::String => f.write_str(&self.name),
            UidKind::Symbol => write!(f, "Symbol({})", self.name),
            UidKind::PrivateName => write!(f, "#{}", self.name),
        }
    }
}

/// An identifier that may be owned by a heap cell.
///
/// Identifiers that come from a symbol or string cell keep that cell alive
/// for as long as a compiler structure refers to them, so the cell has to be
/// reported to the collector.
#[derive(Debug, Clone)]
pub struct CacheableIdentifier {
    uid: Identifier,
    cell: Option<ObjectId>,
}

impl CacheableIdentifier {
    /// An identifier with no owning cell.
    pub fn from_uid(uid: Identifier) -> Self {
        Self { uid, cell: None }
    }

    /// An identifier owned by the heap cell `cell`.
    pub fn from_cell(cell: ObjectId, uid: Identifier) -> Self {
        Self {
            uid,
            cell: Some(cell),
        }
    }

    /// The uniqued key.
    pub fn uid(&self) -> &Identifier {
        &self.uid
    }

    /// The owning cell, if any.
    pub fn cell(&self) -> Option<CellRef> {
        self.cell.map(CellRef::Object)
    }
}

impl PartialEq for CacheableIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for CacheableIdentifier {}

impl PartialEq<Identifier> for CacheableIdentifier {
    fn eq(&self, other: &Identifier) -> bool {
        &self.uid == other
    }
}

impl From<Identifier> for CacheableIdentifier {
    fn from(uid: Identifier) -> Self {
        Self::from_uid(uid)
    }
}

impl fmt::Display for CacheableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uid.fmt(f)
    }
}

/// Property names the runtime refers to implicitly.
#[derive(Debug, Clone)]
pub struct CommonIdentifiers {
    /// `length`
    pub length: Identifier,
    /// `next`, read by the iterator protocol
    pub next: Identifier,
    /// `done`, read from iterator results
    pub done: Identifier,
    /// `value`, read from iterator results
    pub value: Identifier,
    /// `prototype`, read by `instanceof`
    pub prototype: Identifier,
    /// `Symbol.hasInstance`, read by `instanceof`
    pub has_instance: Identifier,
}

impl CommonIdentifiers {
    /// Create the standard set of names.
    pub fn new() -> Self {
        Self {
            length: Identifier::new("length"),
            next: Identifier::new("next"),
            done: Identifier::new("done"),
            value: Identifier::new("value"),
            prototype: Identifier::new("prototype"),
            has_instance: Identifier::symbol("Symbol.hasInstance"),
        }
    }
}

impl Default for CommonIdentifiers {
    fn default() -> Self {
        Self::new()
    }
}
