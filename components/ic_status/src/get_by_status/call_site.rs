//! Statuses for a read as the optimizing tier sees it: the baseline
//! profile, plus whatever optimized code that inlined the read learned.

use core_types::{BytecodeIndex, CodeOrigin, ExitFlag};

use super::GetByStatus;
use crate::call_link_status::ExitSiteData;
use crate::code_block::CodeBlock;
use crate::ic_context::{ICStatusContext, ICStatusMap};
use crate::vm::VM;

impl GetByStatus {
    /// Summarize the baseline feedback for the read at `index`.
    ///
    /// The baseline stub is preferred; the interpreter cache is the
    /// fallback when the stub knows nothing. Any bad-cache exit in
    /// `did_exit` demotes a stub-based status to its slow version.
    pub fn compute_for(
        vm: &VM,
        profiled_block: &CodeBlock,
        map: &ICStatusMap,
        index: BytecodeIndex,
        did_exit: ExitFlag,
        call_exit_site_data: ExitSiteData,
    ) -> Self {
        Self::compute_for_baseline(vm, profiled_block, map, index, did_exit, call_exit_site_data)
            .traced(vm, "compute_for")
    }

    fn compute_for_baseline(
        vm: &VM,
        profiled_block: &CodeBlock,
        map: &ICStatusMap,
        index: BytecodeIndex,
        did_exit: ExitFlag,
        call_exit_site_data: ExitSiteData,
    ) -> Self {
        let origin = CodeOrigin::new(index);
        let mut result = GetByStatus::default();

        let stub_info = map.get(&origin).and_then(|status| status.stub_info);
        if let Some(stub_info) = stub_info.filter(|_| vm.options.use_stub_feedback) {
            {
                let locker = profiled_block.lock();
                let stub = locker
                    .stub_info(stub_info)
                    .unwrap_or_else(|| panic!("unknown stub info {} at {origin}", stub_info.0));
                result = Self::compute_for_stub_info_without_exit_site_feedback(
                    vm,
                    profiled_block,
                    stub,
                    call_exit_site_data,
                    origin,
                );
            }
            if did_exit.is_set() {
                return result.slow_version();
            }
        }

        if !result.is_set() {
            return Self::compute_from_llint(vm, profiled_block, index);
        }
        result
    }

    /// Summarize the read at `origin` for a compilation that inlines it.
    ///
    /// `context_stack` lists the feedback of optimized code that covered
    /// the read, innermost frame first. The first context with feedback for
    /// `origin` wins. A context whose own frame is the read's frame has
    /// that feedback joined with the baseline status; an inlined copy of
    /// the read is demoted if inlined copies have exited before.
    pub fn compute_for_call_site(
        vm: &VM,
        profiled_block: &CodeBlock,
        baseline_map: &ICStatusMap,
        context_stack: &[ICStatusContext],
        origin: CodeOrigin,
    ) -> Self {
        let index = origin.bytecode_index;
        let (call_exit_site_data, did_exit) = if vm.options.use_exit_site_feedback {
            (
                profiled_block.call_exit_site_data(index),
                profiled_block.has_bad_cache_exit_site(index),
            )
        } else {
            (ExitSiteData::default(), ExitFlag::empty())
        };
        let baseline = || {
            Self::compute_for_baseline(
                vm,
                profiled_block,
                baseline_map,
                index,
                did_exit,
                call_exit_site_data,
            )
        };

        for context in context_stack {
            let Some(status) = context.get(origin) else {
                continue;
            };

            let bless = |result: GetByStatus| {
                if !context.is_inlined(origin) {
                    // The baseline status covers exits of both inlined and
                    // machine-frame copies.
                    let mut merged = baseline();
                    merged.merge(&result);
                    return merged;
                }
                if did_exit.contains(ExitFlag::FROM_INLINED) {
                    return result.slow_version();
                }
                result
            };

            if let Some(stub_info) = status.stub_info.filter(|_| vm.options.use_stub_feedback) {
                let optimized = &context.optimized_code_block;
                let result = {
                    let locker = optimized.lock();
                    let stub = locker.stub_info(stub_info).unwrap_or_else(|| {
                        panic!("unknown stub info {} at {origin}", stub_info.0)
                    });
                    Self::compute_for_stub_info_without_exit_site_feedback(
                        vm,
                        optimized,
                        stub,
                        call_exit_site_data,
                        origin,
                    )
                };
                if result.is_set() {
                    return bless(result).traced(vm, "compute_for_call_site");
                }
            }

            if let Some(get_status) = &status.get_status {
                return bless(get_status.as_ref().clone()).traced(vm, "compute_for_call_site");
            }
        }

        baseline().traced(vm, "compute_for_call_site")
    }
}
