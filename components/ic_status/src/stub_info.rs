//! JIT inline-cache stub records
//!
//! A [`StubInfo`] is what the baseline JIT knows about one property read:
//! how it currently caches the access and every access case its
//! polymorphic stub handles. The executing thread rewrites it while the
//! program runs, so compiler threads only read it under the owning code
//! block's lock.

use core_types::{CacheableIdentifier, CodeOrigin, ShapeId};

use crate::access_case::AccessCase;

/// How the stub currently caches its access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheType {
    /// Nothing cached yet
    Unset,
    /// Inline self load from one shape
    GetByIdSelf,
    /// Inline load from a prototype
    GetByIdPrototype,
    /// Polymorphic stub with a list of access cases
    Stub,
    /// Array `length`
    ArrayLength,
    /// String `length`
    StringLength,
}

/// Handle to a stub owned by a [`crate::CodeBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StubInfoId(pub u32);

/// Coarse classification of a stub, computed before looking at its cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubInfoSummary {
    /// The stub was never considered for caching
    NoInformation,
    /// Only plain loads, no slow path
    Simple,
    /// Some case calls out, no slow path
    MakesCalls,
    /// The stub gave up into the megamorphic cache
    Megamorphic,
    /// The slow path ran
    TakesSlowPath,
    /// The slow path ran and some case calls out
    TakesSlowPathAndMakesCalls,
}

impl StubInfoSummary {
    /// Whether the stub's cases are worth inspecting one by one.
    pub fn is_inlineable(self) -> bool {
        matches!(self, StubInfoSummary::Simple | StubInfoSummary::MakesCalls)
    }

    /// The slow-path counterpart of this summary.
    pub fn slow_version(self) -> Self {
        match self {
            StubInfoSummary::NoInformation | StubInfoSummary::Simple => {
                StubInfoSummary::TakesSlowPath
            }
            StubInfoSummary::MakesCalls => StubInfoSummary::TakesSlowPathAndMakesCalls,
            other => other,
        }
    }
}

/// Baseline JIT inline-cache record of one property read
#[derive(Debug, Clone)]
pub struct StubInfo {
    /// Where the read lives
    pub code_origin: CodeOrigin,
    /// Current caching strategy
    pub cache_type: CacheType,
    /// Identifier the stub was compiled for
    pub identifier: Option<CacheableIdentifier>,
    /// Shape checked by an inline self load
    pub inline_access_base_structure: Option<ShapeId>,
    /// Cases of a polymorphic stub, in dispatch order
    pub cases: Vec<AccessCase>,
    /// The generic slow path ran at least once
    pub took_slow_path: bool,
    /// A non-cell base value was seen
    pub saw_non_cell: bool,
    /// The stub was ever considered for caching
    pub ever_considered: bool,
    /// The stub gave up on per-shape caching and uses the megamorphic cache
    pub gave_up_megamorphic: bool,
}

impl StubInfo {
    /// A fresh stub that has cached nothing.
    pub fn new(code_origin: CodeOrigin) -> Self {
        Self {
            code_origin,
            cache_type: CacheType::Unset,
            identifier: None,
            inline_access_base_structure: None,
            cases: Vec::new(),
            took_slow_path: false,
            saw_non_cell: false,
            ever_considered: false,
            gave_up_megamorphic: false,
        }
    }

    /// Cache an inline self load of `identifier` on `structure`.
    pub fn cache_self(&mut self, identifier: CacheableIdentifier, structure: ShapeId) {
        self.cache_type = CacheType::GetByIdSelf;
        self.identifier = Some(identifier);
        self.inline_access_base_structure = Some(structure);
        self.cases.clear();
        self.ever_considered = true;
    }

    /// Switch to a polymorphic stub holding `cases`.
    pub fn cache_stub(&mut self, identifier: Option<CacheableIdentifier>, cases: Vec<AccessCase>) {
        self.cache_type = CacheType::Stub;
        self.identifier = identifier;
        self.inline_access_base_structure = None;
        self.cases = cases;
        self.ever_considered = true;
    }

    /// Record that the generic slow path ran.
    pub fn record_slow_path(&mut self) {
        self.took_slow_path = true;
        self.ever_considered = true;
    }

    /// Classify the stub.
    ///
    /// A stub that gave up into the megamorphic cache is reported as such
    /// even if it also took the slow path; the status builder then decides
    /// between `Megamorphic` and an observed slow path.
    pub fn summary(&self) -> StubInfoSummary {
        let makes_calls =
            self.cache_type == CacheType::Stub && self.cases.iter().any(AccessCase::does_calls);
        let (simple, slow) = if makes_calls {
            (
                StubInfoSummary::MakesCalls,
                StubInfoSummary::TakesSlowPathAndMakesCalls,
            )
        } else {
            (StubInfoSummary::Simple, StubInfoSummary::TakesSlowPath)
        };

        if self.gave_up_megamorphic {
            return StubInfoSummary::Megamorphic;
        }
        if self.took_slow_path || self.saw_non_cell {
            return slow;
        }
        if !self.ever_considered {
            return StubInfoSummary::NoInformation;
        }
        simple
    }
}
