//! Summaries of how a property read behaves.
//!
//! A [`GetByStatus`] tells the optimizing tier what a property read at one
//! site has done so far: which receiver shapes it saw and where the value
//! lived for each, or why no such detail can be trusted. Statuses are built
//! from the interpreter's single-shape cache ([`GetByStatus::compute_from_llint`]),
//! from baseline JIT stubs ([`GetByStatus::compute_for_stub_info`]), across
//! the inline stack ([`GetByStatus::compute_for_call_site`]) or from shapes
//! the compiler has proven ([`GetByStatus::compute_for_shape_set`]).
//!
//! Missing or conflicting evidence never produces an error: it produces a
//! less precise state. `NoInformation` is the bottom of the lattice and the
//! four slow-path states are its top.

mod call_site;
mod llint;
mod shape_set;
mod stub;

use std::fmt;
use std::sync::Arc;

use core_types::{CacheableIdentifier, Identifier, ObjectId, ScopeOffset};
use memory_manager::{Heap, ShapeSet, SlotVisitor};
use tracing::{debug, trace};

use crate::access_case::ModuleNamespaceData;
use crate::get_by_variant::GetByVariant;
use crate::ic_status_utils::{
    append_ic_status_variant, filter_ic_status_variants, single_identifier_for_ic_status,
    VariantList,
};
use crate::stub_info::{CacheType, StubInfoSummary};
use crate::vm::VM;

/// What is known about a property read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GetByState {
    /// Nothing is known
    NoInformation,
    /// Plain loads, misses or getter calls, one variant per receiver shape
    Simple,
    /// Native custom accessor calls
    CustomAccessor,
    /// Lookups through the megamorphic cache
    Megamorphic,
    /// Import binding read through a module namespace object
    ModuleNamespace,
    /// `get` trap of a `Proxy`
    ProxyObject,
    /// The read will probably need the generic path
    LikelyTakesSlowPath,
    /// The read was seen taking the generic path
    ObservedTakesSlowPath,
    /// The read will probably need the generic path and may call out
    MakesCalls,
    /// The read was seen taking the generic path and may call out
    ObservedSlowPathAndMakesCalls,
}

impl fmt::Display for GetByState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GetByState::NoInformation => "NoInformation",
            GetByState::Simple => "Simple",
            GetByState::CustomAccessor => "CustomAccessor",
            GetByState::Megamorphic => "Megamorphic",
            GetByState::ModuleNamespace => "ModuleNamespace",
            GetByState::ProxyObject => "ProxyObject",
            GetByState::LikelyTakesSlowPath => "LikelyTakesSlowPath",
            GetByState::ObservedTakesSlowPath => "ObservedTakesSlowPath",
            GetByState::MakesCalls => "MakesCalls",
            GetByState::ObservedSlowPathAndMakesCalls => "ObservedSlowPathAndMakesCalls",
        };
        f.write_str(name)
    }
}

/// Summary of a property read site
///
/// # Example
///
/// ```
/// use core_types::{Identifier, PropertyOffset, ShapeId};
/// use ic_status::{GetByState, GetByStatus, GetByVariant};
/// use memory_manager::ShapeSet;
///
/// let x = || Some(Identifier::new("x").into());
/// let mut a = GetByStatus::new(GetByState::Simple);
/// a.append_variant(GetByVariant::new(x(), ShapeSet::single(ShapeId(1)), PropertyOffset::new(0)));
/// let mut b = GetByStatus::new(GetByState::Simple);
/// b.append_variant(GetByVariant::new(x(), ShapeSet::single(ShapeId(2)), PropertyOffset::new(0)));
///
/// a.merge(&b);
/// assert!(a.is_simple());
/// assert_eq!(a.num_variants(), 1);
/// assert_eq!(a.variants()[0].structure_set().len(), 2);
///
/// let slow = a.slow_version();
/// assert_eq!(slow.state(), GetByState::LikelyTakesSlowPath);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GetByStatus {
    state: GetByState,
    variants: VariantList<GetByVariant>,
    module_namespace_data: Option<Arc<ModuleNamespaceData>>,
    was_seen_in_jit: bool,
    contains_dom_getter: bool,
}

impl Default for GetByStatus {
    fn default() -> Self {
        Self::new(GetByState::NoInformation)
    }
}

impl GetByStatus {
    /// A status in `state` with no variants, not seen in the JIT.
    pub fn new(state: GetByState) -> Self {
        Self::from_state(state, false)
    }

    /// A status in `state` with no variants.
    pub fn from_state(state: GetByState, was_seen_in_jit: bool) -> Self {
        Self {
            state,
            variants: VariantList::new(),
            module_namespace_data: None,
            was_seen_in_jit,
            contains_dom_getter: false,
        }
    }

    /// Degraded status for a stub whose summary rules out per-case detail.
    ///
    /// # Panics
    ///
    /// Panics on an inlineable summary; those are summarized case by case.
    pub(crate) fn from_stub_summary(summary: StubInfoSummary, took_slow_path: bool) -> Self {
        let state = match summary {
            StubInfoSummary::NoInformation => GetByState::NoInformation,
            StubInfoSummary::Simple | StubInfoSummary::MakesCalls => {
                unreachable!("inlineable stub summary {summary:?} has no degraded status")
            }
            StubInfoSummary::Megamorphic if took_slow_path => GetByState::ObservedTakesSlowPath,
            StubInfoSummary::Megamorphic => GetByState::Megamorphic,
            StubInfoSummary::TakesSlowPath if took_slow_path => GetByState::ObservedTakesSlowPath,
            StubInfoSummary::TakesSlowPath => GetByState::LikelyTakesSlowPath,
            StubInfoSummary::TakesSlowPathAndMakesCalls if took_slow_path => {
                GetByState::ObservedSlowPathAndMakesCalls
            }
            StubInfoSummary::TakesSlowPathAndMakesCalls => GetByState::MakesCalls,
        };
        Self::from_state(state, true)
    }

    pub(crate) fn module_namespace(data: Arc<ModuleNamespaceData>) -> Self {
        Self {
            module_namespace_data: Some(data),
            ..Self::from_state(GetByState::ModuleNamespace, true)
        }
    }

    /// The state.
    pub fn state(&self) -> GetByState {
        self.state
    }

    /// Whether anything is known.
    pub fn is_set(&self) -> bool {
        self.state != GetByState::NoInformation
    }

    /// Whether the read is a set of per-shape loads or getter calls.
    pub fn is_simple(&self) -> bool {
        self.state == GetByState::Simple
    }

    /// Whether the read calls native custom accessors.
    pub fn is_custom_accessor(&self) -> bool {
        self.state == GetByState::CustomAccessor
    }

    /// Whether the read goes through the megamorphic cache.
    pub fn is_megamorphic(&self) -> bool {
        self.state == GetByState::Megamorphic
    }

    /// Whether the read is an import through a namespace object.
    pub fn is_module_namespace(&self) -> bool {
        self.state == GetByState::ModuleNamespace
    }

    /// Whether the read calls a proxy trap.
    pub fn is_proxy_object(&self) -> bool {
        self.state == GetByState::ProxyObject
    }

    /// Whether the read cannot be compiled to checked per-shape code.
    pub fn takes_slow_path(&self) -> bool {
        !matches!(self.state, GetByState::NoInformation | GetByState::Simple)
    }

    /// Whether the baseline stub was seen running its slow path.
    pub fn observed_structure_stub_info_slow_path(&self) -> bool {
        matches!(
            self.state,
            GetByState::ObservedTakesSlowPath | GetByState::ObservedSlowPathAndMakesCalls
        )
    }

    /// Whether the read may call out.
    pub fn makes_calls(&self) -> bool {
        match self.state {
            GetByState::NoInformation
            | GetByState::LikelyTakesSlowPath
            | GetByState::ObservedTakesSlowPath
            | GetByState::CustomAccessor
            | GetByState::ModuleNamespace => false,
            GetByState::Simple => self
                .variants
                .iter()
                .any(|variant| variant.call_link_status().is_some()),
            GetByState::ProxyObject
            | GetByState::Megamorphic
            | GetByState::MakesCalls
            | GetByState::ObservedSlowPathAndMakesCalls => true,
        }
    }

    /// Number of variants.
    pub fn num_variants(&self) -> usize {
        self.variants.len()
    }

    /// The variants.
    pub fn variants(&self) -> &[GetByVariant] {
        &self.variants
    }

    /// Whether a stub contributed to the status.
    pub fn was_seen_in_jit(&self) -> bool {
        self.was_seen_in_jit
    }

    /// Whether the custom accessor is a DOM attribute getter.
    pub fn contains_dom_getter(&self) -> bool {
        self.contains_dom_getter
    }

    /// The namespace object of a module namespace read.
    pub fn module_namespace_object(&self) -> Option<ObjectId> {
        self.module_namespace_data
            .as_ref()
            .map(|data| data.namespace_object)
    }

    /// The environment holding the imported binding.
    pub fn module_environment(&self) -> Option<ObjectId> {
        self.module_namespace_data.as_ref().map(|data| data.environment)
    }

    /// Slot of the imported binding.
    pub fn scope_offset(&self) -> Option<ScopeOffset> {
        self.module_namespace_data
            .as_ref()
            .map(|data| data.scope_offset)
    }

    /// The property every variant reads, if they agree on one.
    pub fn single_identifier(&self) -> Option<CacheableIdentifier> {
        if let Some(data) = &self.module_namespace_data {
            return Some(data.identifier.clone());
        }
        single_identifier_for_ic_status(&self.variants)
    }

    /// The inline cache the stub compiler should try first.
    pub fn preferred_cache_type(&self) -> CacheType {
        if !self.is_simple() {
            return CacheType::GetByIdSelf;
        }
        if self
            .variants
            .iter()
            .any(|variant| variant.condition_set().is_empty())
        {
            return CacheType::GetByIdSelf;
        }
        CacheType::GetByIdPrototype
    }

    /// Add a variant; false if it conflicts with an existing one or the
    /// list is full.
    pub fn append_variant(&mut self, variant: GetByVariant) -> bool {
        append_ic_status_variant(&mut self.variants, variant)
    }

    /// The status with all per-shape detail given up.
    pub fn slow_version(&self) -> Self {
        let state = match (self.observed_structure_stub_info_slow_path(), self.makes_calls()) {
            (true, true) => GetByState::ObservedSlowPathAndMakesCalls,
            (true, false) => GetByState::ObservedTakesSlowPath,
            (false, true) => GetByState::MakesCalls,
            (false, false) => GetByState::LikelyTakesSlowPath,
        };
        Self::from_state(state, self.was_seen_in_jit)
    }

    /// Join with `other`, another status of the same read.
    pub fn merge(&mut self, other: &GetByStatus) {
        if other.state == GetByState::NoInformation {
            return;
        }

        match self.state {
            GetByState::NoInformation => *self = other.clone(),
            GetByState::Megamorphic => {
                if self.state == other.state {
                    return;
                }
                if matches!(other.state, GetByState::Simple | GetByState::CustomAccessor) {
                    *self = other.clone();
                } else {
                    self.merge_slow(other);
                }
            }
            GetByState::Simple | GetByState::CustomAccessor | GetByState::ProxyObject => {
                if self.state != other.state {
                    return self.merge_slow(other);
                }
                for variant in other.variants.iter() {
                    if !self.append_variant(variant.clone()) {
                        return self.merge_slow(other);
                    }
                }
                // A DOM getter is never mixed with other accessors and is
                // specialized to a single variant.
                let dom = self.contains_dom_getter || other.contains_dom_getter;
                if dom
                    && (self.contains_dom_getter != other.contains_dom_getter
                        || self.num_variants() > 1)
                {
                    return self.merge_slow(other);
                }
                self.contains_dom_getter = dom;
            }
            GetByState::ModuleNamespace => {
                let same = other.state == GetByState::ModuleNamespace
                    && self.module_namespace_object() == other.module_namespace_object()
                    && self.module_environment() == other.module_environment()
                    && self.scope_offset() == other.scope_offset();
                if !same {
                    self.merge_slow(other);
                }
            }
            GetByState::LikelyTakesSlowPath
            | GetByState::ObservedTakesSlowPath
            | GetByState::MakesCalls
            | GetByState::ObservedSlowPathAndMakesCalls => self.merge_slow(other),
        }
    }

    fn merge_slow(&mut self, other: &GetByStatus) {
        let observed = self.observed_structure_stub_info_slow_path()
            || other.observed_structure_stub_info_slow_path();
        let makes_calls = self.makes_calls() || other.makes_calls();
        let state = match (observed, makes_calls) {
            (true, true) => GetByState::ObservedSlowPathAndMakesCalls,
            (true, false) => GetByState::ObservedTakesSlowPath,
            (false, true) => GetByState::MakesCalls,
            (false, false) => GetByState::LikelyTakesSlowPath,
        };
        *self = Self::new(state);
    }

    /// Keep only the receivers in `set`.
    ///
    /// Only simple statuses are narrowed; one left without variants knows
    /// nothing.
    pub fn filter(&mut self, set: &ShapeSet) {
        if !self.is_simple() {
            return;
        }
        filter_ic_status_variants(&mut self.variants, set);
        if self.variants.is_empty() {
            self.state = GetByState::NoInformation;
        }
    }

    /// Keep only the variants reading `uid`, unless that would keep none.
    pub fn filter_by_id(&mut self, uid: &Identifier) {
        if !self.is_simple() || self.variants.is_empty() {
            return;
        }
        let mut filtered = self.variants.clone();
        filtered.retain(|variant| variant.identifier().map_or(false, |id| id == uid));
        if filtered.is_empty() {
            return;
        }
        self.variants = filtered;
    }

    /// Report every heap reference as strong.
    pub fn visit_aggregate(&self, visitor: &mut dyn SlotVisitor) {
        if let Some(data) = &self.module_namespace_data {
            visitor.append(data.namespace_object.into());
            visitor.append(data.environment.into());
            if let Some(cell) = data.identifier.cell() {
                visitor.append(cell);
            }
        }
        for variant in self.variants.iter() {
            variant.visit_aggregate(visitor);
        }
    }

    /// Mark the shapes that cost nothing to keep alive.
    pub fn mark_if_cheap(&self, visitor: &mut dyn SlotVisitor) {
        for variant in self.variants.iter() {
            variant.mark_if_cheap(visitor);
        }
    }

    /// Whether everything the status refers to survives collection.
    ///
    /// A false result means the status must be discarded and recomputed.
    pub fn finalize(&self, heap: &Heap) -> bool {
        let alive = self.variants.iter().all(|variant| variant.finalize(heap))
            && self.module_namespace_data.as_ref().map_or(true, |data| {
                heap.survives_collection(data.namespace_object.into())
                    && heap.survives_collection(data.environment.into())
            });
        if !alive {
            debug!(status = %self, "get-by status did not survive collection");
        }
        alive
    }

    fn traced(self, vm: &VM, builder: &'static str) -> Self {
        if vm.options.dump_statuses {
            trace!(builder, status = %self, "computed get-by status");
        }
        self
    }
}

impl fmt::Display for GetByStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, [", self.state)?;
        for (i, variant) in self.variants.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variant}")?;
        }
        write!(f, "], seenInJIT = {})", self.was_seen_in_jit)
    }
}
