//! Statuses from baseline JIT stubs.

use core_types::{CodeOrigin, PropertyOffset};
use memory_manager::{PropertyAttributes, ShapeSet};
use tracing::debug;

use super::{GetByState, GetByStatus};
use crate::access_case::{AccessCase, AccessKind};
use crate::call_link_status::{CallLinkStatus, ExitSiteData};
use crate::code_block::{CodeBlock, ConcurrentJsLocker};
use crate::complex_get_status::ComplexGetStatus;
use crate::get_by_variant::GetByVariant;
use crate::stub_info::{CacheType, StubInfo, StubInfoId};
use crate::vm::VM;

impl GetByStatus {
    /// Summarize the stub `stub_info` of `code_block`.
    ///
    /// A status that would otherwise be inlined is demoted to its slow
    /// version when the optimized code already exited at this read because
    /// of a bad cache.
    ///
    /// # Panics
    ///
    /// Panics if `locker` does not guard `code_block` or if `stub_info` is
    /// not a stub of `code_block`.
    pub fn compute_for_stub_info(
        vm: &VM,
        code_block: &CodeBlock,
        locker: &ConcurrentJsLocker<'_>,
        stub_info: StubInfoId,
        origin: CodeOrigin,
    ) -> Self {
        assert!(code_block.holds_lock(locker), "locker guards another code block");
        let stub = locker
            .stub_info(stub_info)
            .unwrap_or_else(|| panic!("unknown stub info {}", stub_info.0));
        let index = origin.bytecode_index;
        let (call_exit_site_data, did_exit) = if vm.options.use_exit_site_feedback {
            (
                code_block.call_exit_site_data(index),
                code_block.has_bad_cache_exit_site(index).is_set(),
            )
        } else {
            (ExitSiteData::default(), false)
        };

        let result = Self::compute_for_stub_info_without_exit_site_feedback(
            vm,
            code_block,
            stub,
            call_exit_site_data,
            origin,
        );
        let result = if !result.takes_slow_path() && did_exit {
            result.slow_version()
        } else {
            result
        };
        result.traced(vm, "compute_for_stub_info")
    }

    /// Summarize `stub` without consulting the exit profile of the read
    /// itself; `call_exit_site_data` still shapes the getter call summaries.
    ///
    /// `code_block` is the block the stub belongs to. Custom accessors are
    /// only inlined if they were resolved in its global object.
    pub(crate) fn compute_for_stub_info_without_exit_site_feedback(
        vm: &VM,
        code_block: &CodeBlock,
        stub: &StubInfo,
        call_exit_site_data: ExitSiteData,
        origin: CodeOrigin,
    ) -> Self {
        let summary = stub.summary();
        if !summary.is_inlineable() {
            return Self::from_stub_summary(summary, stub.took_slow_path);
        }

        let slow = |reason: &str| {
            debug!(%origin, reason, "stub cannot be summarized case by case");
            Self::from_stub_summary(summary.slow_version(), stub.took_slow_path)
        };
        let call_status = |case: &AccessCase| {
            case.call_link_info()
                .map(|info| CallLinkStatus::compute_for(vm, info, call_exit_site_data))
                .unwrap_or_default()
        };

        let heap = &vm.heap;
        let mut result = GetByStatus::from_state(GetByState::Simple, true);

        match stub.cache_type {
            CacheType::Unset => GetByStatus::new(GetByState::NoInformation),

            CacheType::GetByIdSelf => {
                let structure = stub
                    .inline_access_base_structure
                    .unwrap_or_else(|| panic!("self cache at {origin} without a shape"));
                let identifier = stub
                    .identifier
                    .clone()
                    .unwrap_or_else(|| panic!("self cache at {origin} without an identifier"));
                let Some(class) = heap.class(structure) else {
                    return slow("dead-shape");
                };
                if class.takes_slow_path_for_impure_property() {
                    return slow("impure-property");
                }
                let Some((offset, attributes)) = class.get_concurrently(identifier.uid()) else {
                    return slow("property-absent");
                };
                if attributes.intersects(PropertyAttributes::CUSTOM_ACCESSOR_OR_VALUE) {
                    return slow("custom-slot");
                }
                let appended = result.append_variant(GetByVariant::new(
                    Some(identifier),
                    ShapeSet::single(structure),
                    offset,
                ));
                debug_assert!(appended);
                result
            }

            CacheType::Stub => {
                if let [case] = stub.cases.as_slice() {
                    match &case.kind {
                        AccessKind::ModuleNamespaceLoad(data) => {
                            return GetByStatus::module_namespace(data.clone());
                        }
                        AccessKind::ProxyObjectLoad { .. }
                        | AccessKind::IndexedProxyObjectLoad { .. } => {
                            let mut result = GetByStatus::from_state(GetByState::ProxyObject, true);
                            let variant = GetByVariant::new(
                                Some(case.identifier.clone()),
                                ShapeSet::new(),
                                PropertyOffset::INVALID,
                            )
                            .with_call_link_status(call_status(case));
                            if !result.append_variant(variant) {
                                return slow("append-failed");
                            }
                            return result;
                        }
                        AccessKind::LoadMegamorphic | AccessKind::IndexedMegamorphicLoad
                            if !stub.took_slow_path =>
                        {
                            return GetByStatus::from_state(GetByState::Megamorphic, true);
                        }
                        _ => {}
                    }
                }

                for case in &stub.cases {
                    if case.uses_poly_proto {
                        return slow("poly-proto");
                    }
                    if !case.requires_identifier_name_match() {
                        return slow("keyed-case");
                    }
                    let Some(structure) = case.structure else {
                        return slow("no-shape");
                    };

                    if let AccessKind::CustomAccessorGetter {
                        getter,
                        dom_attribute,
                    } = &case.kind
                    {
                        let conditions = &case.condition_set;
                        if !conditions.is_empty() && !conditions.structures_ensure_validity(heap) {
                            continue;
                        }

                        let current = match case.alternate_base {
                            Some(base) => heap.structure_of(base),
                            None => Some(structure),
                        };
                        let global_object = current
                            .and_then(|shape| heap.class(shape))
                            .and_then(|class| class.global_object);
                        if global_object != Some(code_block.global_object()) {
                            return slow("cross-global-custom");
                        }
                        if result.state == GetByState::Simple && result.num_variants() > 0 {
                            return slow("mixed-custom-accessor");
                        }

                        let variant = GetByVariant::new(
                            Some(case.identifier.clone()),
                            ShapeSet::single(structure),
                            PropertyOffset::INVALID,
                        )
                        .with_via_global_proxy(case.via_global_proxy)
                        .with_conditions(conditions.clone())
                        .with_custom_accessor(*getter, dom_attribute.clone());
                        if !result.append_variant(variant) {
                            return slow("append-failed");
                        }

                        if dom_attribute.is_some() {
                            // A DOM getter call is specialized to one shape.
                            if result.num_variants() != 1 {
                                return slow("polymorphic-dom-getter");
                            }
                            result.contains_dom_getter = true;
                        } else if result.contains_dom_getter {
                            return slow("mixed-dom-getter");
                        }
                        result.state = GetByState::CustomAccessor;
                        continue;
                    }

                    let (offset, condition_set) = match ComplexGetStatus::compute_for(
                        heap,
                        structure,
                        &case.condition_set,
                        case.identifier.uid(),
                    ) {
                        ComplexGetStatus::ShouldSkip => continue,
                        ComplexGetStatus::TakesSlowPath => return slow("complex-get"),
                        ComplexGetStatus::Inlineable {
                            offset,
                            condition_set,
                        } => (offset, condition_set),
                    };

                    let variant = |offset| {
                        GetByVariant::new(
                            Some(case.identifier.clone()),
                            ShapeSet::single(structure),
                            offset,
                        )
                        .with_via_global_proxy(case.via_global_proxy)
                        .with_conditions(condition_set.clone())
                    };
                    // Calls read nothing from storage; the accessor slot offset
                    // only matters to `GetGetter`.
                    let variant = match &case.kind {
                        AccessKind::Load | AccessKind::GetGetter | AccessKind::Miss => {
                            variant(offset)
                        }
                        AccessKind::IntrinsicGetter { function } => {
                            variant(PropertyOffset::INVALID).with_intrinsic_function(*function)
                        }
                        AccessKind::Getter { .. } => variant(PropertyOffset::INVALID)
                            .with_call_link_status(call_status(case)),
                        _ => return slow("unsupported-case"),
                    };

                    if !result.append_variant(variant) {
                        return slow("append-failed");
                    }
                    if result.state == GetByState::CustomAccessor {
                        return slow("mixed-custom-accessor");
                    }
                }

                result
            }

            CacheType::GetByIdPrototype | CacheType::ArrayLength | CacheType::StringLength => {
                slow("cache-type")
            }
        }
    }
}
