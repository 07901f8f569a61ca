//! Interpreter Feedback Integration Tests
//!
//! Tests the flow: bytecode -> interpreter cache -> GetByStatus for the
//! interpreter-only tier, including multi-checkpoint instructions.

use bytecode_system::{instance_of, iterator_next, iterator_open, BytecodeChunk, GetByIdMode, Opcode};
use core_types::{BytecodeIndex, PropertyOffset};
use ic_status::{CodeBlock, GetByState, GetByStatus};
use integration_tests::{interpreter_caches, Runtime};
use memory_manager::{HiddenClass, PropertyAttributes, Prototype};

/// Test: cached hit at offset 3 gives one plain variant
#[test]
fn test_interpreter_hit() {
    let mut rt = Runtime::new();
    let shape = rt.shape(&["a", "b", "c", "x"]);
    let (block, index) = rt.get_by_id_function("x");
    interpreter_caches(&block, index, shape, 3);

    let status = GetByStatus::compute_from_llint(&rt.vm, &block, index);
    assert!(status.is_simple());
    assert_eq!(status.num_variants(), 1);
    let variant = &status.variants()[0];
    assert_eq!(variant.structure_set().only_shape(), Some(shape));
    assert_eq!(variant.offset(), PropertyOffset::new(3));
    assert!(variant.call_link_status().is_none());
    assert!(!status.makes_calls());
}

/// Test: a custom accessor slot knows nothing
#[test]
fn test_interpreter_custom_accessor() {
    let mut rt = Runtime::new();
    let shape = rt.shape_with(
        Prototype::Null,
        &["a", "b", "c"],
        &[("x", PropertyAttributes::CUSTOM_ACCESSOR)],
    );
    let (block, index) = rt.get_by_id_function("x");
    interpreter_caches(&block, index, shape, 3);

    let status = GetByStatus::compute_from_llint(&rt.vm, &block, index);
    assert_eq!(status.state(), GetByState::NoInformation);
}

/// Test: a prototype load mode is not summarized
#[test]
fn test_interpreter_proto_load_mode() {
    let rt = Runtime::new();
    let (block, index) = rt.get_by_id_function("x");
    block
        .chunk()
        .instruction_at(index)
        .and_then(|i| i.metadata_for_checkpoint(0))
        .unwrap()
        .set_mode(GetByIdMode::ProtoLoad);

    let status = GetByStatus::compute_from_llint(&rt.vm, &block, index);
    assert_eq!(status.state(), GetByState::NoInformation);
}

/// Test: cache cleared after a shape change is back to nothing
#[test]
fn test_interpreter_cache_cleared() {
    let mut rt = Runtime::new();
    let shape = rt.shape(&["x"]);
    let (block, index) = rt.get_by_id_function("x");
    interpreter_caches(&block, index, shape, 0);
    assert!(GetByStatus::compute_from_llint(&rt.vm, &block, index).is_simple());

    block
        .chunk()
        .instruction_at(index)
        .and_then(|i| i.metadata_for_checkpoint(0))
        .unwrap()
        .clear();
    assert_eq!(
        GetByStatus::compute_from_llint(&rt.vm, &block, index).state(),
        GetByState::NoInformation
    );
}

/// Test: every checkpoint of the iterator protocol reads its own name
#[test]
fn test_iterator_protocol_checkpoints() {
    let mut rt = Runtime::new();
    let iterator = rt.shape(&["next"]);
    let result = rt.shape(&["value", "done"]);

    let mut chunk = BytecodeChunk::new();
    let open = chunk.emit(Opcode::IteratorOpen).offset;
    let next = chunk.emit(Opcode::IteratorNext).offset;
    let block = CodeBlock::new(chunk, rt.global);

    let get_next = BytecodeIndex::with_checkpoint(open, iterator_open::GET_NEXT);
    let get_done = BytecodeIndex::with_checkpoint(next, iterator_next::GET_DONE);
    let get_value = BytecodeIndex::with_checkpoint(next, iterator_next::GET_VALUE);
    interpreter_caches(&block, get_next, iterator, 0);
    interpreter_caches(&block, get_done, result, 1);
    interpreter_caches(&block, get_value, result, 0);

    for (index, offset) in [(get_next, 0), (get_done, 1), (get_value, 0)] {
        let status = GetByStatus::compute_from_llint(&rt.vm, &block, index);
        assert!(status.is_simple(), "{index}");
        assert_eq!(status.variants()[0].offset(), PropertyOffset::new(offset));
    }
}

/// Test: `instanceof` reads `Symbol.hasInstance` and `prototype`
#[test]
fn test_instanceof_checkpoints() {
    let mut rt = Runtime::new();
    let has_instance = rt.vm.names.has_instance.clone();
    let constructor = rt.shape(&["prototype"]);
    let with_symbol = rt.vm.heap.register_class(
        HiddenClass::new().add_property(has_instance, PropertyAttributes::empty()),
    );

    let mut chunk = BytecodeChunk::new();
    let offset = chunk.emit(Opcode::InstanceOf).offset;
    let block = CodeBlock::new(chunk, rt.global);

    let get_has_instance = BytecodeIndex::with_checkpoint(offset, instance_of::GET_HAS_INSTANCE);
    let get_prototype = BytecodeIndex::with_checkpoint(offset, instance_of::GET_PROTOTYPE);
    interpreter_caches(&block, get_has_instance, with_symbol, 0);
    interpreter_caches(&block, get_prototype, constructor, 0);

    assert!(GetByStatus::compute_from_llint(&rt.vm, &block, get_has_instance).is_simple());
    assert!(GetByStatus::compute_from_llint(&rt.vm, &block, get_prototype).is_simple());

    // A shape lacking `Symbol.hasInstance` gives nothing.
    interpreter_caches(&block, get_has_instance, constructor, 0);
    assert_eq!(
        GetByStatus::compute_from_llint(&rt.vm, &block, get_has_instance).state(),
        GetByState::NoInformation
    );
}
