//! Handles to garbage-collected heap cells.
//!
//! The heap owns every hidden class and object; everything else refers to
//! them through these copyable handles and asks the heap whether the cell is
//! still alive.

use std::fmt;

/// Handle to a hidden class (object shape) registered with the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u32);

/// Handle to an object allocated on the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// Any heap cell the garbage collector can mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellRef {
    /// A hidden class
    Shape(ShapeId),
    /// An ordinary, function, namespace or environment object
    Object(ObjectId),
}

impl From<ShapeId> for CellRef {
    fn from(id: ShapeId) -> Self {
        CellRef::Shape(id)
    }
}

impl From<ObjectId> for CellRef {
    fn from(id: ObjectId) -> Self {
        CellRef::Object(id)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRef::Shape(id) => id.fmt(f),
            CellRef::Object(id) => id.fmt(f),
        }
    }
}
