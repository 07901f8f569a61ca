//! Contract compliance tests for ic_status
//!
//! The optimizing compiler relies on these guarantees whatever feedback a
//! read collected.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{CodeOrigin, Identifier, ObjectId, PropertyOffset, ShapeId};
use ic_status::{
    AccessCase, CodeBlock, ConfigError, GetByState, GetByStatus, GetByVariant, StatusOptions,
    StubInfo, MAX_VARIANTS, VM,
};
use memory_manager::{collect_garbage, HiddenClass, PropertyAttributes, ShapeSet};

const ALL_STATES: [GetByState; 10] = [
    GetByState::NoInformation,
    GetByState::Simple,
    GetByState::CustomAccessor,
    GetByState::Megamorphic,
    GetByState::ModuleNamespace,
    GetByState::ProxyObject,
    GetByState::LikelyTakesSlowPath,
    GetByState::ObservedTakesSlowPath,
    GetByState::MakesCalls,
    GetByState::ObservedSlowPathAndMakesCalls,
];

fn variant(name: &str, shape: u32, offset: u32) -> GetByVariant {
    GetByVariant::new(
        Some(Identifier::new(name).into()),
        ShapeSet::single(ShapeId(shape)),
        PropertyOffset::new(offset),
    )
}

fn simple(variants: Vec<GetByVariant>) -> GetByStatus {
    let mut status = GetByStatus::new(GetByState::Simple);
    for v in variants {
        assert!(status.append_variant(v));
    }
    status
}

/// Contract: `NoInformation` is neutral for merge on either side
#[test]
fn contract_merge_identity() {
    for state in ALL_STATES {
        let status = GetByStatus::from_state(state, true);
        let mut left = status.clone();
        left.merge(&GetByStatus::default());
        assert_eq!(left, status);

        let mut right = GetByStatus::default();
        right.merge(&status);
        assert_eq!(right, status);
    }
}

/// Contract: the slow version takes the slow path and is a fixed point
#[test]
fn contract_slow_version_is_idempotent() {
    for state in ALL_STATES {
        let slow = GetByStatus::from_state(state, false).slow_version();
        assert!(slow.takes_slow_path());
        assert_eq!(slow.slow_version(), slow);
    }
}

/// Contract: a merged status never holds two variants for one shape
#[test]
fn contract_merge_keeps_variants_disjoint() {
    let mut status = simple(vec![variant("x", 1, 0), variant("x", 2, 1)]);
    status.merge(&simple(vec![variant("x", 3, 0), variant("x", 2, 1)]));
    assert!(status.is_simple());

    let variants = status.variants();
    for (i, a) in variants.iter().enumerate() {
        for b in &variants[i + 1..] {
            assert!(!a.structure_set().overlaps(b.structure_set()));
        }
    }
    // Shapes 1 and 3 read the same slot and collapse into one variant.
    assert_eq!(status.num_variants(), 2);
}

/// Contract: a status never grows past the variant limit
#[test]
fn contract_variant_capacity() {
    let mut status = GetByStatus::new(GetByState::Simple);
    for i in 0..MAX_VARIANTS as u32 {
        assert!(status.append_variant(variant("x", i, i)));
    }
    let full = status.clone();
    assert!(!status.append_variant(variant("x", 100, 100)));
    assert_eq!(status, full);

    let mut merged = full.clone();
    merged.merge(&simple(vec![variant("x", 100, 100)]));
    assert!(merged.takes_slow_path());
}

/// Contract: filtering only leaves shapes from the filter set
#[test]
fn contract_filter_soundness() {
    let mut status = simple(vec![
        GetByVariant::new(
            Some(Identifier::new("x").into()),
            [ShapeId(1), ShapeId(2)].into_iter().collect(),
            PropertyOffset::new(0),
        ),
        variant("x", 3, 1),
    ]);
    let filter: ShapeSet = [ShapeId(2), ShapeId(3), ShapeId(9)].into_iter().collect();
    status.filter(&filter);
    for v in status.variants() {
        assert!(v.structure_set().is_subset_of(&filter));
    }

    status.filter(&ShapeSet::single(ShapeId(42)));
    assert_eq!(status.state(), GetByState::NoInformation);
}

/// Contract: options out of range are rejected with a typed error
#[test]
fn contract_config_errors() {
    let err = StatusOptions::from_json(r#"{ "max_prototype_walk_depth": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { option: "max_prototype_walk_depth", .. }));

    let err = StatusOptions::from_json(r#"{ "no_such_option": true }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));

    let err = StatusOptions::from_lookup(|key| {
        (key == "IC_STATUS_DUMP_STATUSES").then(|| "maybe".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { option: "dump_statuses", .. }));
}

/// Contract: a status referring to a swept shape does not finalize
#[test]
fn contract_finalize_after_sweep() {
    let mut vm = VM::new();
    let shape = vm.heap.register_class(
        HiddenClass::new().add_property(Identifier::new("x"), PropertyAttributes::empty()),
    );
    let status = GetByStatus::compute_for_shape_set(
        &vm,
        ObjectId(0),
        &ShapeSet::single(shape),
        Identifier::new("x").into(),
    );
    assert!(status.is_simple());

    collect_garbage(&mut vm.heap, |visitor| status.visit_aggregate(visitor));
    assert!(status.finalize(&vm.heap));

    collect_garbage(&mut vm.heap, |_| {});
    assert!(!status.finalize(&vm.heap));
}

/// Contract: reading a stub under the lock sees a consistent record while
/// the executing thread rewrites it
#[test]
fn contract_stub_read_under_concurrent_updates() {
    let mut vm = VM::new();
    let x = Identifier::new("x");
    let shapes: Vec<ShapeId> = (0..4)
        .map(|i| {
            let mut class = HiddenClass::new();
            for pad in 0..i {
                class = class
                    .add_property(Identifier::new(&format!("p{pad}")), PropertyAttributes::empty());
            }
            vm.heap
                .register_class(class.add_property(x.clone(), PropertyAttributes::empty()))
        })
        .collect();

    let mut chunk = BytecodeChunk::new();
    let property = chunk.add_identifier(x.clone());
    let index = chunk.emit(Opcode::GetById { property });
    let block = CodeBlock::new(chunk, ObjectId(0));
    let origin = CodeOrigin::new(index);
    let stub = block.add_stub_info(StubInfo::new(origin));

    std::thread::scope(|s| {
        s.spawn(|| {
            for round in 0..200 {
                let mut locker = block.lock();
                let record = locker.stub_info_mut(stub).unwrap();
                let cases = shapes
                    .iter()
                    .take(round % shapes.len() + 1)
                    .map(|&shape| AccessCase::load(x.clone().into(), shape, PropertyOffset::INVALID))
                    .collect();
                record.cache_stub(Some(x.clone().into()), cases);
                if round == 150 {
                    record.record_slow_path();
                }
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let locker = block.lock();
                let status = GetByStatus::compute_for_stub_info(&vm, &block, &locker, stub, origin);
                match status.state() {
                    GetByState::NoInformation | GetByState::ObservedTakesSlowPath => {}
                    GetByState::Simple => {
                        assert!(status.num_variants() >= 1);
                        assert!(status.num_variants() <= shapes.len());
                    }
                    other => panic!("unexpected state {other}"),
                }
            }
        });
    });

    let locker = block.lock();
    let status = GetByStatus::compute_for_stub_info(&vm, &block, &locker, stub, origin);
    assert_eq!(status.state(), GetByState::ObservedTakesSlowPath);
}
