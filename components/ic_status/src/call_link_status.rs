//! Call summaries for getters and proxy traps
//!
//! A property read that invokes a getter is also a call site. The stub
//! keeps a [`CallLinkInfo`] for it, and [`CallLinkStatus`] summarizes that
//! record together with the exit history of the site.

use std::fmt;

use core_types::{BytecodeIndex, ExitFlag, ExitKind, ObjectId};
use memory_manager::{Heap, SlotVisitor};

use crate::exit_profile::ExitProfile;
use crate::vm::VM;

/// Runtime record of the callees a call site linked to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLinkInfo {
    /// Functions the site was linked to, in link order
    pub callees: Vec<ObjectId>,
    /// Times the unlinked slow path ran
    pub slow_path_count: u32,
    /// The site was relinked to a polymorphic call stub
    pub has_polymorphic_stub: bool,
}

impl CallLinkInfo {
    /// A site linked to one callee.
    pub fn monomorphic(callee: ObjectId) -> Self {
        Self {
            callees: vec![callee],
            ..Self::default()
        }
    }
}

/// Exit history relevant to a call site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitSiteData {
    /// Exits caused by an unexpected argument type or executable
    pub takes_slow_path: ExitFlag,
    /// Exits caused by an unexpected callee cell
    pub bad_function: ExitFlag,
}

/// Fold the exit history of the call at `index`.
pub fn compute_exit_site_data(profile: &ExitProfile, index: BytecodeIndex) -> ExitSiteData {
    ExitSiteData {
        takes_slow_path: profile.exit_flag(index, &[ExitKind::BadType, ExitKind::BadExecutable]),
        bad_function: profile.exit_flag(index, &[ExitKind::BadCell]),
    }
}

/// Summary of what a call site calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLinkStatus {
    callees: Vec<ObjectId>,
    could_take_slow_path: bool,
    is_based_on_stub: bool,
    is_closure_call: bool,
}

impl CallLinkStatus {
    /// A status that could only take the slow path.
    pub fn slow_path() -> Self {
        Self {
            could_take_slow_path: true,
            ..Self::default()
        }
    }

    /// Summarize `info`, then account for the site's exits.
    pub fn compute_for(vm: &VM, info: &CallLinkInfo, exit_site_data: ExitSiteData) -> Self {
        let mut callees = info.callees.clone();
        callees.sort_unstable();
        callees.dedup();
        let mut status = Self {
            could_take_slow_path: info.slow_path_count
                >= vm.options.could_take_slow_case_minimum_count,
            is_based_on_stub: info.has_polymorphic_stub,
            is_closure_call: false,
            callees,
        };
        status.account_for_exits(exit_site_data);
        status
    }

    fn account_for_exits(&mut self, exit_site_data: ExitSiteData) {
        if exit_site_data.bad_function.is_set() {
            if self.is_based_on_stub {
                // Different cells of one executable: keep the callees but
                // only trust the code they share.
                self.is_closure_call = true;
            } else {
                self.could_take_slow_path = true;
            }
        }
        if exit_site_data.takes_slow_path.is_set() {
            self.could_take_slow_path = true;
        }
    }

    /// Whether anything is known about the site.
    pub fn is_set(&self) -> bool {
        !self.callees.is_empty() || self.could_take_slow_path
    }

    /// Observed callees in ascending order.
    pub fn callees(&self) -> &[ObjectId] {
        &self.callees
    }

    /// Whether the call may go through the generic path.
    pub fn could_take_slow_path(&self) -> bool {
        self.could_take_slow_path
    }

    /// Whether the summary came from a polymorphic call stub.
    pub fn is_based_on_stub(&self) -> bool {
        self.is_based_on_stub
    }

    /// Whether only the callees' shared executable is trusted.
    pub fn is_closure_call(&self) -> bool {
        self.is_closure_call
    }

    /// Join with another summary of the same call.
    pub fn merge(&mut self, other: &CallLinkStatus) {
        for &callee in &other.callees {
            if let Err(pos) = self.callees.binary_search(&callee) {
                self.callees.insert(pos, callee);
            }
        }
        self.could_take_slow_path |= other.could_take_slow_path;
        self.is_based_on_stub |= other.is_based_on_stub;
        self.is_closure_call |= other.is_closure_call;
    }

    /// Report the callees as strong references.
    pub fn visit_aggregate(&self, visitor: &mut dyn SlotVisitor) {
        for &callee in &self.callees {
            visitor.append(callee.into());
        }
    }

    /// Whether every callee survives collection.
    pub fn finalize(&self, heap: &Heap) -> bool {
        self.callees
            .iter()
            .all(|&callee| heap.survives_collection(callee.into()))
    }
}

impl fmt::Display for CallLinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_set() {
            return f.write_str("Not Set");
        }
        f.write_str("[")?;
        for (i, callee) in self.callees.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{callee}")?;
        }
        f.write_str("]")?;
        if self.could_take_slow_path {
            f.write_str(", Could Take Slow Path")?;
        }
        if self.is_based_on_stub {
            f.write_str(", Based On Stub")?;
        }
        if self.is_closure_call {
            f.write_str(", Closure Call")?;
        }
        Ok(())
    }
}
