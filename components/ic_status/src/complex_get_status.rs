//! Resolution of one stub case against the current heap.
//!
//! A case was compiled against conditions that held at the time. Before the
//! optimizing tier trusts it, the conditions must still be guaranteed by
//! the shapes of the objects they name.

use core_types::{Identifier, PropertyOffset, ShapeId};
use memory_manager::{Heap, ObjectPropertyConditionSet};

/// Outcome of resolving a stub case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexGetStatus {
    /// The case can no longer be reached; ignore it
    ShouldSkip,
    /// The case cannot be summarized; the access must stay generic
    TakesSlowPath,
    /// The case can be compiled inline
    Inlineable {
        /// Slot holding the value, invalid for a miss
        offset: PropertyOffset,
        /// Conditions the inline code must watch
        condition_set: ObjectPropertyConditionSet,
    },
}

impl ComplexGetStatus {
    /// Resolve a read of `uid` on receivers of shape `head` that relies on
    /// `condition_set`.
    ///
    /// # Panics
    ///
    /// Panics if `condition_set` has more than one presence condition.
    pub fn compute_for(
        heap: &Heap,
        head: ShapeId,
        condition_set: &ObjectPropertyConditionSet,
        uid: &Identifier,
    ) -> Self {
        let Some(head_class) = heap.class(head) else {
            return ComplexGetStatus::TakesSlowPath;
        };
        if head_class.takes_slow_path_for_impure_property() {
            return ComplexGetStatus::TakesSlowPath;
        }

        let offset = if condition_set.is_empty() {
            head_class
                .get_concurrently(uid)
                .map_or(PropertyOffset::INVALID, |(offset, _)| offset)
        } else {
            if !condition_set.structures_ensure_validity(heap) {
                return ComplexGetStatus::ShouldSkip;
            }
            let slot_bases = condition_set.number_of_slot_base_conditions();
            assert!(slot_bases <= 1, "condition set with {slot_bases} slot bases");
            match condition_set.slot_base_condition() {
                None => {
                    return ComplexGetStatus::Inlineable {
                        offset: PropertyOffset::INVALID,
                        condition_set: condition_set.clone(),
                    }
                }
                Some(base) => base.offset(),
            }
        };

        if !offset.is_valid() {
            return ComplexGetStatus::TakesSlowPath;
        }
        ComplexGetStatus::Inlineable {
            offset,
            condition_set: condition_set.clone(),
        }
    }
}
