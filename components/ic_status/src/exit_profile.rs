//! Deoptimization exit-site profile
//!
//! Optimized code records each bytecode location it frequently exits from
//! back to a lower tier, and why. Status builders consult this history so
//! that a site whose speculation keeps failing is summarized conservatively.

use core_types::{BytecodeIndex, ExitFlag, ExitKind};

/// A location optimized code frequently exited from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequentExitSite {
    /// Where the exit happened
    pub bytecode_index: BytecodeIndex,
    /// Why it happened
    pub kind: ExitKind,
    /// Whether the exiting code was an inlined copy of the site
    pub inlined: bool,
}

impl FrequentExitSite {
    /// Create a new exit site
    pub fn new(bytecode_index: BytecodeIndex, kind: ExitKind, inlined: bool) -> Self {
        Self {
            bytecode_index,
            kind,
            inlined,
        }
    }
}

/// History of frequent exits of one code block
#[derive(Debug, Clone, Default)]
pub struct ExitProfile {
    sites: Vec<FrequentExitSite>,
}

impl ExitProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an exit site; returns false if it was already recorded
    pub fn add(&mut self, site: FrequentExitSite) -> bool {
        if self.sites.contains(&site) {
            return false;
        }
        self.sites.push(site);
        true
    }

    /// Check whether this exact site was recorded
    pub fn has_exit_site(&self, site: &FrequentExitSite) -> bool {
        self.sites.contains(site)
    }

    /// Fold every recorded exit at `index` whose kind is one of `kinds`
    pub fn exit_flag(&self, index: BytecodeIndex, kinds: &[ExitKind]) -> ExitFlag {
        self.sites
            .iter()
            .filter(|site| site.bytecode_index == index && kinds.contains(&site.kind))
            .fold(ExitFlag::empty(), |flag, site| {
                flag | ExitFlag::for_inlined(site.inlined)
            })
    }

    /// Number of recorded sites
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Exits showing that a cached property access at `index` saw an
/// unexpected structure or identifier.
pub fn has_bad_cache_exit_site(profile: &ExitProfile, index: BytecodeIndex) -> ExitFlag {
    profile.exit_flag(
        index,
        &[ExitKind::BadCache, ExitKind::BadConstantCache, ExitKind::BadIdent],
    )
}
