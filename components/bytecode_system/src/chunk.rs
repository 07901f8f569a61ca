//! Bytecode chunk - compiled bytecode container
//!
//! Contains instructions and the identifier table they index into.

use core_types::{BytecodeIndex, Identifier};

use crate::instruction::Instruction;
use crate::opcode::{IdentifierIndex, Opcode};

/// A compiled bytecode chunk containing instructions and identifiers
///
/// Instructions are addressed by their position; a [`BytecodeIndex`]'s
/// offset is that position.
///
/// # Example
///
/// ```
/// use bytecode_system::{BytecodeChunk, Opcode};
/// use core_types::Identifier;
///
/// let mut chunk = BytecodeChunk::new();
/// let x = chunk.add_identifier(Identifier::new("x"));
/// let index = chunk.emit(Opcode::GetById { property: x });
///
/// assert_eq!(chunk.instruction_at(index).map(|i| i.opcode), Some(Opcode::GetById { property: x }));
/// assert_eq!(chunk.identifier(x), Some(&Identifier::new("x")));
/// ```
#[derive(Debug, Default)]
pub struct BytecodeChunk {
    /// Sequence of bytecode instructions
    pub instructions: Vec<Instruction>,
    /// Identifier table, deduplicated
    pub identifiers: Vec<Identifier>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an instruction and return its index
    pub fn emit(&mut self, opcode: Opcode) -> BytecodeIndex {
        let index = BytecodeIndex::new(self.instructions.len() as u32);
        self.instructions.push(Instruction::new(opcode));
        index
    }

    /// Add an identifier to the table and return its index
    pub fn add_identifier(&mut self, identifier: Identifier) -> IdentifierIndex {
        if let Some(pos) = self.identifiers.iter().position(|id| *id == identifier) {
            return IdentifierIndex(pos as u32);
        }
        self.identifiers.push(identifier);
        IdentifierIndex(self.identifiers.len() as u32 - 1)
    }

    /// Look up an identifier
    pub fn identifier(&self, index: IdentifierIndex) -> Option<&Identifier> {
        self.identifiers.get(index.0 as usize)
    }

    /// The instruction at `index`; the checkpoint is ignored
    pub fn instruction_at(&self, index: BytecodeIndex) -> Option<&Instruction> {
        self.instructions.get(index.offset as usize)
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}
