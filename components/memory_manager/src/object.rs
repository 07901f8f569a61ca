//! JavaScript object representation
//!
//! Objects only carry what property-access analysis needs: their hidden
//! class and what kind of cell they are.

use core_types::{ObjectId, ShapeId};

/// Built-in functions the optimizing tier recognises by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    /// `%TypedArray%.prototype.length` getter
    TypedArrayLength,
    /// `%TypedArray%.prototype.byteLength` getter
    TypedArrayByteLength,
    /// `%TypedArray%.prototype.byteOffset` getter
    TypedArrayByteOffset,
    /// `DataView.prototype.byteLength` getter
    DataViewByteLength,
    /// `Object.prototype.__proto__` getter
    UnderscoreProtoGetter,
    /// `Map.prototype.size` getter
    MapSize,
    /// `Set.prototype.size` getter
    SetSize,
}

/// What kind of cell an object is.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Plain object
    Ordinary,
    /// A function, possibly a recognised built-in
    Function {
        /// Intrinsic identity, if any
        intrinsic: Option<Intrinsic>,
    },
    /// A global object
    GlobalObject,
    /// The proxy that forwards to a global object
    GlobalProxy {
        /// The global object it forwards to
        target: ObjectId,
    },
    /// A module namespace object
    ModuleNamespace {
        /// Environment holding the module's bindings
        environment: ObjectId,
    },
    /// A module environment record
    ModuleEnvironment,
    /// A `Proxy` exotic object
    Proxy,
    /// A symbol or string cell backing an identifier
    Symbol,
}

/// JavaScript object with hidden class-based property storage
#[derive(Debug, Clone, PartialEq)]
pub struct JSObject {
    /// Hidden class describing this object's layout
    pub class: ShapeId,
    /// Cell kind
    pub kind: ObjectKind,
}

impl JSObject {
    /// Create a new object with the given hidden class
    pub fn new(class: ShapeId, kind: ObjectKind) -> Self {
        Self { class, kind }
    }

    /// The intrinsic this object implements, if it is a recognised built-in
    /// function.
    pub fn intrinsic(&self) -> Option<Intrinsic> {
        match self.kind {
            ObjectKind::Function { intrinsic } => intrinsic,
            _ => None,
        }
    }

    /// Whether this object is a function.
    pub fn is_function(&self) -> bool {
        matches!(self.kind, ObjectKind::Function { .. })
    }
}
