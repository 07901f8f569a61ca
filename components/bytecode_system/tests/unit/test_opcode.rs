//! Tests for Opcode checkpoints and metadata slots

use bytecode_system::{instance_of, iterator_open, IdentifierIndex, Opcode};

#[test]
fn test_single_read_opcodes_profile_checkpoint_zero() {
    for opcode in [
        Opcode::GetById {
            property: IdentifierIndex(0),
        },
        Opcode::TryGetById {
            property: IdentifierIndex(0),
        },
        Opcode::GetByIdDirect {
            property: IdentifierIndex(0),
        },
        Opcode::GetLength,
    ] {
        assert_eq!(opcode.checkpoint_count(), 1);
        assert_eq!(opcode.profiled_slot(0), Some(0));
    }
}

#[test]
fn test_unprofiled_reads() {
    for opcode in [
        Opcode::GetByVal,
        Opcode::GetByValWithThis,
        Opcode::GetByIdWithThis {
            property: IdentifierIndex(0),
        },
        Opcode::EnumeratorGetByVal,
        Opcode::GetPrivateName,
    ] {
        assert!(opcode.reads_property());
        assert_eq!(opcode.metadata_slots(), 0);
        assert_eq!(opcode.profiled_slot(0), None);
    }
}

#[test]
fn test_multi_checkpoint_opcodes() {
    assert_eq!(Opcode::IteratorOpen.checkpoint_count(), 2);
    assert_eq!(Opcode::IteratorOpen.profiled_slot(iterator_open::GET_NEXT), Some(0));
    assert_eq!(Opcode::InstanceOf.checkpoint_count(), 3);
    assert_eq!(Opcode::InstanceOf.profiled_slot(instance_of::GET_PROTOTYPE), Some(1));
}
