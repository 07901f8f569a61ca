//! Status Algebra Integration Tests
//!
//! Tests merging and filtering statuses built by different tiers for the
//! same read.

use core_types::{CodeOrigin, Identifier, PropertyOffset};
use ic_status::{GetByState, GetByStatus, GetByVariant};
use integration_tests::{id, load_stub, Runtime};
use memory_manager::ShapeSet;

fn simple(variants: Vec<GetByVariant>) -> GetByStatus {
    let mut status = GetByStatus::new(GetByState::Simple);
    for variant in variants {
        assert!(status.append_variant(variant));
    }
    status
}

/// Test: disjoint shapes reading the same slot merge into one variant
#[test]
fn test_merge_same_offset() {
    let mut rt = Runtime::new();
    let s1 = rt.shape(&["x"]);
    let s2 = rt.shape(&["x", "y"]);

    let mut status = simple(vec![GetByVariant::new(
        Some(id("x")),
        ShapeSet::single(s1),
        PropertyOffset::new(0),
    )]);
    status.merge(&simple(vec![GetByVariant::new(
        Some(id("x")),
        ShapeSet::single(s2),
        PropertyOffset::new(0),
    )]));

    assert!(status.is_simple());
    assert_eq!(status.num_variants(), 1);
    let set = status.variants()[0].structure_set();
    assert_eq!(set.len(), 2);
    assert!(set.contains(s1) && set.contains(s2));
}

/// Test: the same shape at different offsets cannot be merged
#[test]
fn test_merge_conflicting_offsets() {
    let mut rt = Runtime::new();
    let s1 = rt.shape(&["x", "y"]);

    let mut status = simple(vec![GetByVariant::new(
        Some(id("x")),
        ShapeSet::single(s1),
        PropertyOffset::new(0),
    )]);
    status.merge(&simple(vec![GetByVariant::new(
        Some(id("x")),
        ShapeSet::single(s1),
        PropertyOffset::new(1),
    )]));
    assert_eq!(status.state(), GetByState::LikelyTakesSlowPath);
}

/// Test: merging statuses from two stubs of one read
#[test]
fn test_merge_stub_statuses() {
    let mut rt = Runtime::new();
    let s1 = rt.shape(&["x"]);
    let s2 = rt.shape(&["a", "x"]);
    let (block, index) = rt.get_by_id_function("x");
    let origin = CodeOrigin::new(index);
    let first = block.add_stub_info(load_stub(origin, "x", &[(s1, 0)]));
    let second = block.add_stub_info(load_stub(origin, "x", &[(s2, 1)]));

    let locker = block.lock();
    let mut status = GetByStatus::compute_for_stub_info(&rt.vm, &block, &locker, first, origin);
    let other = GetByStatus::compute_for_stub_info(&rt.vm, &block, &locker, second, origin);
    status.merge(&other);

    assert!(status.is_simple());
    assert!(status.was_seen_in_jit());
    assert_eq!(status.num_variants(), 2);
    assert_eq!(
        status.to_string(),
        format!(
            "(Simple, [<id='x', [{s1}], [], offset = 0>, <id='x', [{s2}], [], offset = 1>], seenInJIT = true)"
        )
    );
}

/// Test: proving the receiver's shape narrows the status
#[test]
fn test_filter_by_proven_shapes() {
    let mut rt = Runtime::new();
    let s1 = rt.shape(&["x"]);
    let s2 = rt.shape(&["a", "x"]);
    let s3 = rt.shape(&["b", "c", "x"]);
    let (block, index) = rt.get_by_id_function("x");
    let origin = CodeOrigin::new(index);
    let stub = block.add_stub_info(load_stub(origin, "x", &[(s1, 0), (s2, 1)]));

    let locker = block.lock();
    let mut status = GetByStatus::compute_for_stub_info(&rt.vm, &block, &locker, stub, origin);
    drop(locker);

    status.filter(&[s2, s3].into_iter().collect());
    assert_eq!(status.num_variants(), 1);
    assert_eq!(status.variants()[0].structure_set().only_shape(), Some(s2));

    status.filter(&ShapeSet::single(s3));
    assert_eq!(status.state(), GetByState::NoInformation);
}

/// Test: narrowing a keyed read to the identifier the compiler proved
#[test]
fn test_filter_by_identifier() {
    let mut rt = Runtime::new();
    let s1 = rt.shape(&["x", "y"]);
    let s2 = rt.shape(&["y"]);

    let mut status = simple(vec![
        GetByVariant::new(Some(id("x")), ShapeSet::single(s1), PropertyOffset::new(0)),
        GetByVariant::new(Some(id("y")), ShapeSet::single(s2), PropertyOffset::new(0)),
    ]);
    status.filter_by_id(&Identifier::new("y"));
    assert_eq!(status.num_variants(), 1);
    assert_eq!(status.single_identifier(), Some(id("y")));

    // Filtering to a name no variant reads keeps the status intact.
    status.filter_by_id(&Identifier::new("z"));
    assert_eq!(status.num_variants(), 1);
}

/// Test: a megamorphic status yields to a precise one from another tier
#[test]
fn test_megamorphic_yields_to_simple() {
    let mut rt = Runtime::new();
    let s1 = rt.shape(&["x"]);
    let precise = simple(vec![GetByVariant::new(
        Some(id("x")),
        ShapeSet::single(s1),
        PropertyOffset::new(0),
    )]);

    let mut status = GetByStatus::new(GetByState::Megamorphic);
    status.merge(&precise);
    assert_eq!(status, precise);

    let mut status = GetByStatus::new(GetByState::Megamorphic);
    status.merge(&GetByStatus::new(GetByState::ProxyObject));
    assert!(status.takes_slow_path());
}
