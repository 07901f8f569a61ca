//! Integration test suite for the inline-cache status pipeline
//!
//! These helpers build the pieces the tiers would produce at run time
//! (shapes, bytecode, interpreter caches, baseline stubs) so the tests can
//! drive the status builders across component boundaries.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::{
    BytecodeIndex, CacheableIdentifier, CodeOrigin, Identifier, ObjectId, PropertyOffset, ShapeId,
};
use ic_status::{AccessCase, CodeBlock, StubInfo, VM};
use memory_manager::{HiddenClass, ObjectKind, PropertyAttributes, Prototype, TypeInfoFlags};

/// Re-export components for test convenience
pub mod components {
    pub use bytecode_system;
    pub use core_types;
    pub use ic_status;
    pub use memory_manager;
}

/// A VM with a global object to compile code in
pub struct Runtime {
    /// The VM the builders read
    pub vm: VM,
    /// Global object of all code blocks created here
    pub global: ObjectId,
}

impl Runtime {
    /// A runtime with default options.
    pub fn new() -> Self {
        Self::with_vm(VM::new())
    }

    /// A runtime around an already configured VM.
    pub fn with_vm(mut vm: VM) -> Self {
        let global_class = vm
            .heap
            .register_class(HiddenClass::new().with_flags(TypeInfoFlags::IS_GLOBAL_OBJECT));
        let global = vm.heap.allocate_object(global_class, ObjectKind::GlobalObject);
        Self { vm, global }
    }

    /// Register a shape with data properties `names`, in order, whose
    /// objects have no prototype.
    pub fn shape(&mut self, names: &[&str]) -> ShapeId {
        self.shape_with(Prototype::Null, names, &[])
    }

    /// Register a shape with data properties `names` followed by properties
    /// with explicit attributes.
    pub fn shape_with(
        &mut self,
        prototype: Prototype,
        names: &[&str],
        special: &[(&str, PropertyAttributes)],
    ) -> ShapeId {
        let mut class = HiddenClass::new()
            .with_prototype(prototype)
            .with_global_object(self.global);
        for name in names {
            class = class.add_property(Identifier::new(name), PropertyAttributes::empty());
        }
        for (name, attributes) in special {
            class = class.add_property(Identifier::new(name), *attributes);
        }
        self.vm.heap.register_class(class)
    }

    /// Allocate a plain object of `shape`.
    pub fn object(&mut self, shape: ShapeId) -> ObjectId {
        self.vm.heap.allocate_object(shape, ObjectKind::Ordinary)
    }

    /// A function whose only instruction reads `name` from its argument.
    pub fn get_by_id_function(&self, name: &str) -> (CodeBlock, BytecodeIndex) {
        let mut chunk = BytecodeChunk::new();
        let property = chunk.add_identifier(Identifier::new(name));
        let index = chunk.emit(Opcode::GetById { property });
        chunk.emit(Opcode::Return);
        (CodeBlock::new(chunk, self.global), index)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for an identifier without an owning cell.
pub fn id(name: &str) -> CacheableIdentifier {
    Identifier::new(name).into()
}

/// Have the interpreter cache a self load at `index` of `block`.
///
/// # Panics
///
/// Panics if `index` has no profiled read at its checkpoint.
pub fn interpreter_caches(block: &CodeBlock, index: BytecodeIndex, shape: ShapeId, offset: u32) {
    let metadata = block
        .chunk()
        .instruction_at(index)
        .and_then(|instruction| instruction.metadata_for_checkpoint(index.checkpoint))
        .unwrap_or_else(|| panic!("no profiled read at {index}"));
    metadata.cache_self_load(shape, PropertyOffset::new(offset));
}

/// A polymorphic baseline stub at `origin` with one load of `name` per
/// `(shape, offset)` pair.
pub fn load_stub(origin: CodeOrigin, name: &str, loads: &[(ShapeId, u32)]) -> StubInfo {
    let cases = loads
        .iter()
        .map(|&(shape, offset)| AccessCase::load(id(name), shape, PropertyOffset::new(offset)))
        .collect();
    let mut stub = StubInfo::new(origin);
    stub.cache_stub(Some(id(name)), cases);
    stub
}
