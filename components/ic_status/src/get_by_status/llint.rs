//! Statuses from the interpreter's single-shape cache.

use bytecode_system::{instance_of, iterator_next, iterator_open, GetByIdMode, Opcode};
use core_types::{BytecodeIndex, Identifier};
use memory_manager::{PropertyAttributes, ShapeSet};
use tracing::trace;

use super::{GetByState, GetByStatus};
use crate::code_block::CodeBlock;
use crate::get_by_variant::GetByVariant;
use crate::vm::VM;

impl GetByStatus {
    /// Summarize what the interpreter cached for the read at `index`.
    ///
    /// Only a self load cached in default mode yields a `Simple` status;
    /// everything else knows nothing.
    ///
    /// # Panics
    ///
    /// Panics if there is no property read at `index`.
    pub fn compute_from_llint(vm: &VM, code_block: &CodeBlock, index: BytecodeIndex) -> Self {
        Self::compute_from_llint_impl(vm, code_block, index).traced(vm, "compute_from_llint")
    }

    fn compute_from_llint_impl(vm: &VM, code_block: &CodeBlock, index: BytecodeIndex) -> Self {
        let chunk = code_block.chunk();
        let instruction = chunk
            .instruction_at(index)
            .unwrap_or_else(|| panic!("no instruction at {index}"));

        let Some(uid) = read_identifier(vm, code_block, instruction.opcode, index) else {
            return GetByStatus::new(GetByState::NoInformation);
        };
        let Some(metadata) = instruction.metadata_for_checkpoint(index.checkpoint) else {
            return GetByStatus::new(GetByState::NoInformation);
        };

        let snapshot = metadata.snapshot();
        if snapshot.mode != GetByIdMode::Default {
            return GetByStatus::new(GetByState::NoInformation);
        }
        let Some(structure) = snapshot.structure else {
            return GetByStatus::new(GetByState::NoInformation);
        };
        let Some(class) = vm.heap.class(structure) else {
            trace!(%index, %structure, "interpreter cache names a dead shape");
            return GetByStatus::new(GetByState::NoInformation);
        };
        if class.takes_slow_path_for_impure_property() {
            return GetByStatus::new(GetByState::NoInformation);
        }

        let Some((offset, attributes)) = class.get_concurrently(uid) else {
            return GetByStatus::new(GetByState::NoInformation);
        };
        if attributes
            .intersects(PropertyAttributes::CUSTOM_ACCESSOR_OR_VALUE | PropertyAttributes::ACCESSOR)
        {
            return GetByStatus::new(GetByState::NoInformation);
        }

        let mut result = GetByStatus::new(GetByState::Simple);
        let appended =
            result.append_variant(GetByVariant::new(None, ShapeSet::single(structure), offset));
        debug_assert!(appended);
        result
    }
}

/// The property read at `index`, or `None` for reads the interpreter does
/// not profile by name.
fn read_identifier<'a>(
    vm: &'a VM,
    code_block: &'a CodeBlock,
    opcode: Opcode,
    index: BytecodeIndex,
) -> Option<&'a Identifier> {
    let names = &vm.names;
    let uid = match opcode {
        Opcode::GetById { property }
        | Opcode::TryGetById { property }
        | Opcode::GetByIdDirect { property } => code_block
            .chunk()
            .identifier(property)
            .unwrap_or_else(|| panic!("{} at {index} names a missing identifier", opcode.name())),
        Opcode::GetLength => &names.length,
        Opcode::IteratorOpen => match index.checkpoint {
            iterator_open::GET_NEXT => &names.next,
            checkpoint => panic!("iterator_open checkpoint {checkpoint} does not read a property"),
        },
        Opcode::IteratorNext => match index.checkpoint {
            iterator_next::GET_DONE => &names.done,
            iterator_next::GET_VALUE => &names.value,
            checkpoint => panic!("iterator_next checkpoint {checkpoint} does not read a property"),
        },
        Opcode::InstanceOf => match index.checkpoint {
            instance_of::GET_HAS_INSTANCE => &names.has_instance,
            instance_of::GET_PROTOTYPE => &names.prototype,
            instance_of::INSTANCEOF => return None,
            checkpoint => panic!("instanceof checkpoint {checkpoint} does not read a property"),
        },
        Opcode::GetByVal
        | Opcode::GetByValWithThis
        | Opcode::GetByIdWithThis { .. }
        | Opcode::EnumeratorGetByVal
        | Opcode::GetPrivateName => return None,
        other => panic!("{} at {index} is not a property read", other.name()),
    };
    Some(uid)
}
