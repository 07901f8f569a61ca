//! Bytecode opcodes for JavaScript runtime
//!
//! Defines the instructions the profiling tiers care about: every form of
//! property read, plus a handful of ordinary instructions that carry no
//! property-read profile.

use std::fmt;

/// Index into a chunk's identifier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentifierIndex(pub u32);

/// Checkpoints of `iterator_open`.
pub mod iterator_open {
    /// Call `[Symbol.iterator]`
    pub const SYMBOL_CALL: u8 = 0;
    /// Read `next` from the iterator
    pub const GET_NEXT: u8 = 1;
}

/// Checkpoints of `iterator_next`.
pub mod iterator_next {
    /// Call `next`
    pub const COMPUTE_NEXT: u8 = 0;
    /// Read `done` from the result
    pub const GET_DONE: u8 = 1;
    /// Read `value` from the result
    pub const GET_VALUE: u8 = 2;
}

/// Checkpoints of `instanceof`.
pub mod instance_of {
    /// Read `Symbol.hasInstance` from the constructor
    pub const GET_HAS_INSTANCE: u8 = 0;
    /// Read `prototype` from the constructor
    pub const GET_PROTOTYPE: u8 = 1;
    /// Walk the prototype chain of the value
    pub const INSTANCEOF: u8 = 2;
}

/// Bytecode opcodes for JavaScript execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // Property reads
    /// `base.property`
    GetById {
        /// Property name
        property: IdentifierIndex,
    },
    /// `base?.property`, never invokes getters
    TryGetById {
        /// Property name
        property: IdentifierIndex,
    },
    /// Own-property read used by builtins
    GetByIdDirect {
        /// Property name
        property: IdentifierIndex,
    },
    /// `base.length`
    GetLength,
    /// `super.property`, reading from one object with another as `this`
    GetByIdWithThis {
        /// Property name
        property: IdentifierIndex,
    },
    /// `base[key]`
    GetByVal,
    /// `super[key]`
    GetByValWithThis,
    /// `base[key]` inside a `for-in` loop
    EnumeratorGetByVal,
    /// `base.#name`
    GetPrivateName,
    /// Start the iterator protocol
    IteratorOpen,
    /// Step the iterator protocol
    IteratorNext,
    /// `value instanceof constructor`
    InstanceOf,

    // Other instructions
    /// Load undefined value
    LoadUndefined,
    /// Store property by name
    PutById {
        /// Property name
        property: IdentifierIndex,
    },
    /// Call with arguments
    Call {
        /// Number of arguments
        argument_count: u8,
    },
    /// Unconditional jump to offset
    Jump(u32),
    /// Return from current function
    Return,
}

impl Opcode {
    /// Mnemonic for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::GetById { .. } => "get_by_id",
            Opcode::TryGetById { .. } => "try_get_by_id",
            Opcode::GetByIdDirect { .. } => "get_by_id_direct",
            Opcode::GetLength => "get_length",
            Opcode::GetByIdWithThis { .. } => "get_by_id_with_this",
            Opcode::GetByVal => "get_by_val",
            Opcode::GetByValWithThis => "get_by_val_with_this",
            Opcode::EnumeratorGetByVal => "enumerator_get_by_val",
            Opcode::GetPrivateName => "get_private_name",
            Opcode::IteratorOpen => "iterator_open",
            Opcode::IteratorNext => "iterator_next",
            Opcode::InstanceOf => "instanceof",
            Opcode::LoadUndefined => "load_undefined",
            Opcode::PutById { .. } => "put_by_id",
            Opcode::Call { .. } => "call",
            Opcode::Jump(_) => "jump",
            Opcode::Return => "ret",
        }
    }

    /// Number of checkpoints the instruction executes in.
    pub fn checkpoint_count(&self) -> u8 {
        match self {
            Opcode::IteratorOpen => 2,
            Opcode::IteratorNext | Opcode::InstanceOf => 3,
            _ => 1,
        }
    }

    /// Whether any checkpoint of this instruction reads a property.
    pub fn reads_property(&self) -> bool {
        !matches!(
            self,
            Opcode::LoadUndefined
                | Opcode::PutById { .. }
                | Opcode::Call { .. }
                | Opcode::Jump(_)
                | Opcode::Return
        )
    }

    /// Which interpreter metadata slot profiles the read performed at
    /// `checkpoint`, if that checkpoint has a single-shape cache.
    pub fn profiled_slot(&self, checkpoint: u8) -> Option<usize> {
        match (self, checkpoint) {
            (
                Opcode::GetById { .. }
                | Opcode::TryGetById { .. }
                | Opcode::GetByIdDirect { .. }
                | Opcode::GetLength,
                0,
            ) => Some(0),
            (Opcode::IteratorOpen, iterator_open::GET_NEXT) => Some(0),
            (Opcode::IteratorNext, iterator_next::GET_DONE) => Some(0),
            (Opcode::IteratorNext, iterator_next::GET_VALUE) => Some(1),
            (Opcode::InstanceOf, instance_of::GET_HAS_INSTANCE) => Some(0),
            (Opcode::InstanceOf, instance_of::GET_PROTOTYPE) => Some(1),
            _ => None,
        }
    }

    /// Number of interpreter metadata slots the instruction owns.
    pub fn metadata_slots(&self) -> usize {
        match self {
            Opcode::GetById { .. }
            | Opcode::TryGetById { .. }
            | Opcode::GetByIdDirect { .. }
            | Opcode::GetLength
            | Opcode::IteratorOpen => 1,
            Opcode::IteratorNext | Opcode::InstanceOf => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
