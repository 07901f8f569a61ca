//! Tests for BytecodeChunk struct

use bytecode_system::{iterator_next, BytecodeChunk, Opcode};
use core_types::{BytecodeIndex, Identifier};

#[test]
fn test_chunk_emit_multiple_instructions() {
    let mut chunk = BytecodeChunk::new();
    chunk.emit(Opcode::LoadUndefined);
    chunk.emit(Opcode::IteratorNext);
    chunk.emit(Opcode::Return);
    assert_eq!(chunk.instruction_count(), 3);
    assert!(matches!(chunk.instructions[1].opcode, Opcode::IteratorNext));
}

#[test]
fn test_chunk_checkpoint_metadata_lookup() {
    let mut chunk = BytecodeChunk::new();
    let index = chunk.emit(Opcode::IteratorNext);

    let at_done = BytecodeIndex::with_checkpoint(index.offset, iterator_next::GET_DONE);
    let instruction = chunk.instruction_at(at_done).unwrap();
    assert!(instruction.metadata_for_checkpoint(at_done.checkpoint).is_some());
    assert!(instruction
        .metadata_for_checkpoint(iterator_next::COMPUTE_NEXT)
        .is_none());
}

#[test]
fn test_chunk_identifier_lookup() {
    let mut chunk = BytecodeChunk::new();
    let sym = chunk.add_identifier(Identifier::symbol("tag"));
    let name = chunk.add_identifier(Identifier::new("tag"));
    assert_ne!(sym, name);
    assert_eq!(chunk.identifier(sym), Some(&Identifier::symbol("tag")));
    assert_eq!(chunk.identifier(bytecode_system::IdentifierIndex(9)), None);
}

#[test]
fn test_chunk_is_shareable_across_threads() {
    fn assert_sync<T: Send + Sync>() {}
    assert_sync::<BytecodeChunk>();
}
