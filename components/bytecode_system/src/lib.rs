//! Bytecode system for JavaScript runtime
//!
//! This crate provides the bytecode instructions that read properties,
//! the interpreter's per-instruction profiling metadata, and the chunk
//! that holds both.
//!
//! # Features
//!
//! - Property-read opcodes, including multi-checkpoint instructions
//! - Single-shape interpreter caches safe to read from compiler threads
//! - Deduplicated identifier table
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BytecodeChunk, GetByIdMode, Opcode};
//! use core_types::{Identifier, PropertyOffset, ShapeId};
//!
//! let mut chunk = BytecodeChunk::new();
//! let x = chunk.add_identifier(Identifier::new("x"));
//! let index = chunk.emit(Opcode::GetById { property: x });
//!
//! // The interpreter caches the shape it saw.
//! let instruction = chunk.instruction_at(index).unwrap();
//! let metadata = instruction.metadata_for_checkpoint(0).unwrap();
//! metadata.cache_self_load(ShapeId(1), PropertyOffset::new(0));
//!
//! let snapshot = metadata.snapshot();
//! assert_eq!(snapshot.mode, GetByIdMode::Default);
//! assert_eq!(snapshot.structure, Some(ShapeId(1)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod chunk;
pub mod instruction;
pub mod metadata;
pub mod opcode;

// Re-export main types at crate root
pub use chunk::BytecodeChunk;
pub use instruction::Instruction;
pub use metadata::{GetByIdMode, GetByIdModeMetadata, MetadataSnapshot};
pub use opcode::{instance_of, iterator_next, iterator_open, IdentifierIndex, Opcode};
