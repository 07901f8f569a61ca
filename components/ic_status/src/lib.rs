//! Inline-cache status summaries for property reads
//!
//! This crate turns the feedback the lower tiers collect at a property read
//! into a [`GetByStatus`] the optimizing compiler can act on:
//! - The interpreter's single-shape cache
//! - Baseline JIT stubs and their access cases, read under the code block lock
//! - Feedback from optimized code that inlined the read
//! - Shapes the compiler has already proven
//!
//! # Example
//!
//! ```
//! use bytecode_system::{BytecodeChunk, Opcode};
//! use core_types::{CodeOrigin, Identifier, ObjectId, PropertyOffset};
//! use ic_status::{AccessCase, CodeBlock, GetByStatus, StubInfo, VM};
//! use memory_manager::{HiddenClass, PropertyAttributes};
//!
//! let mut vm = VM::new();
//! let shape = vm.heap.register_class(
//!     HiddenClass::new().add_property(Identifier::new("x"), PropertyAttributes::empty()),
//! );
//!
//! let mut chunk = BytecodeChunk::new();
//! let x = chunk.add_identifier(Identifier::new("x"));
//! let index = chunk.emit(Opcode::GetById { property: x });
//! let block = CodeBlock::new(chunk, ObjectId(0));
//!
//! // The baseline JIT compiled a stub with one load case.
//! let origin = CodeOrigin::new(index);
//! let mut stub = StubInfo::new(origin);
//! let load = AccessCase::load(Identifier::new("x").into(), shape, PropertyOffset::new(0));
//! stub.cache_stub(Some(Identifier::new("x").into()), vec![load]);
//! let stub = block.add_stub_info(stub);
//!
//! let locker = block.lock();
//! let status = GetByStatus::compute_for_stub_info(&vm, &block, &locker, stub, origin);
//! assert!(status.is_simple());
//! assert_eq!(
//!     status.to_string(),
//!     "(Simple, [<id='x', [shape#0], [], offset = 0>], seenInJIT = true)"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod access_case;
pub mod call_link_status;
pub mod code_block;
pub mod complex_get_status;
pub mod config;
pub mod exit_profile;
pub mod get_by_status;
pub mod get_by_variant;
pub mod ic_context;
pub mod ic_status_utils;
pub mod stub_info;
pub mod vm;

// Re-export main types at crate root
pub use access_case::{
    AccessCase, AccessKind, CustomAccessorId, DomAttributeAnnotation, ModuleNamespaceData,
};
pub use call_link_status::{compute_exit_site_data, CallLinkInfo, CallLinkStatus, ExitSiteData};
pub use code_block::{CodeBlock, ConcurrentJsLocker, JitData};
pub use complex_get_status::ComplexGetStatus;
pub use config::{ConfigError, StatusOptions};
pub use exit_profile::{has_bad_cache_exit_site, ExitProfile, FrequentExitSite};
pub use get_by_status::{GetByState, GetByStatus};
pub use get_by_variant::GetByVariant;
pub use ic_context::{ICStatus, ICStatusContext, ICStatusContextStack, ICStatusMap};
pub use ic_status_utils::{StatusVariant, VariantList, MAX_VARIANTS};
pub use stub_info::{CacheType, StubInfo, StubInfoId, StubInfoSummary};
pub use vm::VM;
