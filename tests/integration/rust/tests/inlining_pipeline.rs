//! Inlining Pipeline Integration Tests
//!
//! Tests the flow a compilation goes through: interpreter profile ->
//! baseline stub -> optimized code that inlined the read -> proven shapes
//! -> garbage collection of the compiled plan.

use std::sync::Arc;

use bytecode_system::BytecodeChunk;
use core_types::{CodeOrigin, ExitKind, InlineCallFrameId, ShapeId};
use ic_status::{
    CodeBlock, ExitSiteData, FrequentExitSite, GetByState, GetByStatus, ICStatusContext,
    StatusOptions, VM,
};
use integration_tests::{id, interpreter_caches, load_stub, Runtime};
use memory_manager::{collect_garbage, ShapeSet};

struct Pipeline {
    rt: Runtime,
    baseline: CodeBlock,
    origin: CodeOrigin,
    /// { x }
    s1: ShapeId,
    /// { a, x }
    s2: ShapeId,
}

fn pipeline(vm: VM) -> Pipeline {
    let mut rt = Runtime::with_vm(vm);
    let s1 = rt.shape(&["x"]);
    let s2 = rt.shape(&["a", "x"]);
    let (baseline, index) = rt.get_by_id_function("x");
    interpreter_caches(&baseline, index, s1, 0);
    Pipeline {
        rt,
        baseline,
        origin: CodeOrigin::new(index),
        s1,
        s2,
    }
}

/// Optimized code of a caller, whose stub for the inlined read saw `shape`.
fn optimized_caller(
    p: &Pipeline,
    origin: CodeOrigin,
    shape: ShapeId,
    offset: u32,
) -> ICStatusContext {
    let optimized = Arc::new(CodeBlock::new(BytecodeChunk::new(), p.rt.global));
    let stub = optimized.add_stub_info(load_stub(origin, "x", &[(shape, offset)]));
    let mut context = ICStatusContext::new(optimized, None);
    context.record_stub_info(origin, stub);
    context
}

fn call_site(p: &Pipeline, contexts: &[ICStatusContext], origin: CodeOrigin) -> GetByStatus {
    let map = p.baseline.ic_status_map();
    GetByStatus::compute_for_call_site(&p.rt.vm, &p.baseline, &map, contexts, origin)
}

/// Test: each tier refines the status the previous one produced
#[test]
fn test_tiers_refine_status() {
    let p = pipeline(VM::new());

    // Interpreter only.
    let status = call_site(&p, &[], p.origin);
    assert!(status.is_simple());
    assert!(!status.was_seen_in_jit());

    // The baseline stub takes over once it has run.
    p.baseline.add_stub_info(load_stub(p.origin, "x", &[(p.s1, 0)]));
    let status = call_site(&p, &[], p.origin);
    assert!(status.is_simple());
    assert!(status.was_seen_in_jit());

    // Optimized code for the same frame adds what its own stub saw.
    let context = optimized_caller(&p, p.origin, p.s2, 1);
    let status = call_site(&p, &[context], p.origin);
    assert!(status.is_simple());
    assert_eq!(status.num_variants(), 2);
}

/// Test: an inlined copy trusts the optimized stub unless inlined copies
/// have exited
#[test]
fn test_inlined_read() {
    let p = pipeline(VM::new());
    p.baseline.add_stub_info(load_stub(p.origin, "x", &[(p.s1, 0)]));
    let inlined = CodeOrigin::inlined(p.origin.bytecode_index, InlineCallFrameId(3));

    let status = call_site(&p, &[optimized_caller(&p, inlined, p.s2, 1)], inlined);
    assert!(status.is_simple());
    assert_eq!(status.variants()[0].structure_set().only_shape(), Some(p.s2));

    p.baseline.add_exit_site(FrequentExitSite::new(
        p.origin.bytecode_index,
        ExitKind::BadCache,
        true,
    ));
    let status = call_site(&p, &[optimized_caller(&p, inlined, p.s2, 1)], inlined);
    assert_eq!(status.state(), GetByState::LikelyTakesSlowPath);
}

/// Test: with stub feedback configured off only the interpreter counts
#[test]
fn test_stub_feedback_configured_off() {
    let options = StatusOptions::from_json(r#"{ "use_stub_feedback": false }"#).unwrap();
    let p = pipeline(VM::with_options(options).unwrap());
    p.baseline.add_stub_info(load_stub(p.origin, "x", &[(p.s2, 1)]));

    let status = call_site(&p, &[optimized_caller(&p, p.origin, p.s2, 1)], p.origin);
    assert!(status.is_simple());
    assert!(!status.was_seen_in_jit());
    assert_eq!(status.variants()[0].structure_set().only_shape(), Some(p.s1));
}

/// Test: with exit feedback configured off exits are ignored
#[test]
fn test_exit_feedback_configured_off() {
    let mut vm = VM::new();
    vm.options.use_exit_site_feedback = false;
    let p = pipeline(vm);
    p.baseline.add_stub_info(load_stub(p.origin, "x", &[(p.s1, 0)]));
    p.baseline.add_exit_site(FrequentExitSite::new(
        p.origin.bytecode_index,
        ExitKind::BadCache,
        false,
    ));

    let status = call_site(&p, &[], p.origin);
    assert!(status.is_simple());

    // The baseline builder takes exit flags as given.
    let map = p.baseline.ic_status_map();
    let status = GetByStatus::compute_for(
        &p.rt.vm,
        &p.baseline,
        &map,
        p.origin.bytecode_index,
        p.baseline.has_bad_cache_exit_site(p.origin.bytecode_index),
        ExitSiteData::default(),
    );
    assert_eq!(status.state(), GetByState::LikelyTakesSlowPath);
}

/// Test: a status built from proven shapes agrees with the profiled one
#[test]
fn test_proven_shapes_agree_with_profile() {
    let p = pipeline(VM::new());
    p.baseline.add_stub_info(load_stub(p.origin, "x", &[(p.s1, 0), (p.s2, 1)]));
    let mut profiled = call_site(&p, &[], p.origin);

    let proven = ShapeSet::single(p.s2);
    let from_proof = GetByStatus::compute_for_shape_set(&p.rt.vm, p.rt.global, &proven, id("x"));
    profiled.filter(&proven);

    assert_eq!(profiled.num_variants(), 1);
    assert_eq!(from_proof.num_variants(), 1);
    assert_eq!(profiled.variants()[0].offset(), from_proof.variants()[0].offset());
}

/// Test: a compiled plan's statuses keep their shapes alive and go stale
/// once nothing roots them
#[test]
fn test_plan_survives_collection_while_rooted() {
    let mut p = pipeline(VM::new());
    p.baseline.add_stub_info(load_stub(p.origin, "x", &[(p.s1, 0), (p.s2, 1)]));
    let status = call_site(&p, &[], p.origin);
    assert_eq!(status.num_variants(), 2);

    collect_garbage(&mut p.rt.vm.heap, |visitor| status.visit_aggregate(visitor));
    assert!(status.finalize(&p.rt.vm.heap));

    collect_garbage(&mut p.rt.vm.heap, |_| {});
    assert!(!status.finalize(&p.rt.vm.heap));
}
