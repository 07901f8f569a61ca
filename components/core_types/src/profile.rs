//! Exit-site profiling vocabulary.
//!
//! Optimized code records why and from where it deoptimized. This module is
//! placed in core_types so the bytecode and status crates can share it.

use bitflags::bitflags;

/// Why optimized code exited back to a lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitKind {
    /// A structure check on a property access failed
    BadCache,
    /// A constant-folded property access saw a different structure
    BadConstantCache,
    /// A property access saw a different identifier
    BadIdent,
    /// A type speculation failed
    BadType,
    /// A call saw a different callee cell
    BadCell,
    /// A call saw a different executable
    BadExecutable,
    /// Any other reason
    Uncountable,
}

bitflags! {
    /// Which kinds of frames an exit was observed from.
    ///
    /// An exit from a copy of the site that was inlined into another
    /// function is tracked separately from an exit from the site compiled
    /// in its own machine frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExitFlag: u8 {
        /// Exit from the site compiled in its own frame
        const FROM_NOT_INLINED = 1 << 0;
        /// Exit from an inlined copy of the site
        const FROM_INLINED = 1 << 1;
    }
}

impl ExitFlag {
    /// Flag for an exit with the given inlining state.
    pub fn for_inlined(inlined: bool) -> Self {
        if inlined {
            ExitFlag::FROM_INLINED
        } else {
            ExitFlag::FROM_NOT_INLINED
        }
    }

    /// Whether any exit was observed at all.
    pub fn is_set(self) -> bool {
        !self.is_empty()
    }
}
