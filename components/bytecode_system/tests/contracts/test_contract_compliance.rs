//! Contract compliance tests for bytecode_system
//!
//! The profiling tiers rely on these guarantees when they decode a
//! property read.

use bytecode_system::{instance_of, iterator_next, BytecodeChunk, GetByIdMode, Opcode};
use core_types::{BytecodeIndex, Identifier, PropertyOffset, ShapeId};

/// Contract: every profiled checkpoint resolves to its own metadata cell
#[test]
fn contract_profiled_checkpoints_have_metadata() {
    let mut chunk = BytecodeChunk::new();
    let x = chunk.add_identifier(Identifier::new("x"));
    let cases = [
        (chunk.emit(Opcode::GetById { property: x }), 0),
        (chunk.emit(Opcode::GetLength), 0),
        (chunk.emit(Opcode::IteratorNext), iterator_next::GET_VALUE),
        (chunk.emit(Opcode::InstanceOf), instance_of::GET_HAS_INSTANCE),
    ];
    for (index, checkpoint) in cases {
        let at = BytecodeIndex::with_checkpoint(index.offset, checkpoint);
        let instruction = chunk.instruction_at(at).unwrap();
        assert!(instruction.metadata_for_checkpoint(at.checkpoint).is_some());
    }
}

/// Contract: metadata written through a shared chunk is visible to readers
#[test]
fn contract_metadata_shared_between_threads() {
    let mut chunk = BytecodeChunk::new();
    let index = chunk.emit(Opcode::GetLength);
    let chunk = std::sync::Arc::new(chunk);

    let writer = std::sync::Arc::clone(&chunk);
    std::thread::spawn(move || {
        let metadata = writer.instruction_at(index).unwrap().metadata(0).unwrap();
        metadata.cache_self_load(ShapeId(3), PropertyOffset::new(2));
    })
    .join()
    .unwrap();

    let snapshot = chunk.instruction_at(index).unwrap().metadata(0).unwrap().snapshot();
    assert_eq!(snapshot.mode, GetByIdMode::Default);
    assert_eq!(snapshot.structure, Some(ShapeId(3)));
}
