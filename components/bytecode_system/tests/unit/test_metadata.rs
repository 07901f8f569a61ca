//! Tests for interpreter property-read metadata

use bytecode_system::{GetByIdMode, GetByIdModeMetadata};
use core_types::{PropertyOffset, ShapeId};

#[test]
fn test_metadata_default_mode() {
    let metadata = GetByIdModeMetadata::default();
    assert_eq!(metadata.mode(), GetByIdMode::Default);
    assert!(metadata.snapshot().structure.is_none());
}

#[test]
fn test_metadata_every_mode_round_trips() {
    let metadata = GetByIdModeMetadata::new();
    for mode in [
        GetByIdMode::ProtoLoad,
        GetByIdMode::Unset,
        GetByIdMode::ArrayLength,
        GetByIdMode::Default,
    ] {
        metadata.set_mode(mode);
        assert_eq!(metadata.mode(), mode);
    }
}

#[test]
fn test_metadata_recache_replaces_shape() {
    let metadata = GetByIdModeMetadata::new();
    metadata.cache_self_load(ShapeId(1), PropertyOffset::new(0));
    metadata.cache_self_load(ShapeId(2), PropertyOffset::new(4));
    let snapshot = metadata.snapshot();
    assert_eq!(snapshot.structure, Some(ShapeId(2)));
    assert_eq!(snapshot.offset, PropertyOffset::new(4));
}
