//! Bytecode instruction representation
//!
//! Contains the instruction structure and the interpreter metadata slots
//! its property reads own.

use crate::metadata::GetByIdModeMetadata;
use crate::opcode::Opcode;

/// A single bytecode instruction with its profiling metadata
#[derive(Debug)]
pub struct Instruction {
    /// The opcode for this instruction
    pub opcode: Opcode,
    metadata: Box<[GetByIdModeMetadata]>,
}

impl Instruction {
    /// Create a new instruction with fresh metadata
    pub fn new(opcode: Opcode) -> Self {
        let metadata = (0..opcode.metadata_slots())
            .map(|_| GetByIdModeMetadata::new())
            .collect();
        Self { opcode, metadata }
    }

    /// Metadata slot `slot`, see [`Opcode::profiled_slot`]
    pub fn metadata(&self, slot: usize) -> Option<&GetByIdModeMetadata> {
        self.metadata.get(slot)
    }

    /// Metadata profiling the read at `checkpoint`
    pub fn metadata_for_checkpoint(&self, checkpoint: u8) -> Option<&GetByIdModeMetadata> {
        self.opcode
            .profiled_slot(checkpoint)
            .and_then(|slot| self.metadata(slot))
    }
}
