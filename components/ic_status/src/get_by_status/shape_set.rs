//! Statuses for receivers whose shapes the compiler has proven.

use core_types::{CacheableIdentifier, ObjectId, ShapeId};
use memory_manager::{
    generate_conditions_for_prototype_property_hit, HiddenClass, PropertyAttributes, Prototype,
    ShapeSet,
};
use tracing::debug;

use super::{GetByState, GetByStatus};
use crate::get_by_variant::GetByVariant;
use crate::vm::VM;

impl GetByStatus {
    /// Summarize a read of `identifier` from a receiver known to have one
    /// of the shapes in `set`, in code running in `global_object`.
    ///
    /// Only own data properties are summarized, except that a single shape
    /// whose prototype chain provides the property is folded into one
    /// variant guarded by prototype conditions.
    pub fn compute_for_shape_set(
        vm: &VM,
        global_object: ObjectId,
        set: &ShapeSet,
        identifier: CacheableIdentifier,
    ) -> Self {
        Self::compute_for_shape_set_impl(vm, global_object, set, identifier)
            .traced(vm, "compute_for_shape_set")
    }

    fn compute_for_shape_set_impl(
        vm: &VM,
        global_object: ObjectId,
        set: &ShapeSet,
        identifier: CacheableIdentifier,
    ) -> Self {
        if set.is_empty() {
            return GetByStatus::new(GetByState::NoInformation);
        }
        if identifier.uid().parse_index().is_some() {
            return GetByStatus::new(GetByState::LikelyTakesSlowPath);
        }

        if let Some(head) = set.only_shape() {
            if let Some(status) = fold_prototype_hit(vm, head, &identifier) {
                return status;
            }
        }

        let slow = |shape: ShapeId, reason: &str| {
            debug!(%global_object, %shape, %identifier, reason, "proven shapes need the generic path");
            GetByStatus::new(GetByState::LikelyTakesSlowPath)
        };

        let heap = &vm.heap;
        let mut result = GetByStatus::new(GetByState::Simple);
        for shape in set.iter() {
            let Some(class) = heap.class(shape) else {
                return slow(shape, "dead-shape");
            };
            if !cacheable(class) {
                return slow(shape, "uncacheable");
            }
            let Some((offset, attributes)) = class.get_concurrently(identifier.uid()) else {
                return slow(shape, "property-absent");
            };
            if attributes.contains(PropertyAttributes::ACCESSOR) {
                return GetByStatus::new(GetByState::MakesCalls);
            }
            if attributes.intersects(PropertyAttributes::CUSTOM_ACCESSOR_OR_VALUE) {
                return slow(shape, "custom-slot");
            }
            if !result.append_variant(GetByVariant::new(None, ShapeSet::single(shape), offset)) {
                return slow(shape, "append-failed");
            }
        }
        result
    }
}

fn cacheable(class: &HiddenClass) -> bool {
    (!class.overrides_get_own_property_slot() || class.is_global_object())
        && class.property_accesses_are_cacheable()
}

/// A `Simple` status for a read that misses on `head` and hits a plain data
/// property on one of its prototypes.
fn fold_prototype_hit(
    vm: &VM,
    head: ShapeId,
    identifier: &CacheableIdentifier,
) -> Option<GetByStatus> {
    let heap = &vm.heap;
    let max_depth = vm.options.max_prototype_walk_depth;
    let uid = identifier.uid();

    let mut current = head;
    let mut holder = None;
    for _ in 0..=max_depth {
        let class = heap.class(current)?;
        // Condition generation has no global-object exemption.
        if class.overrides_get_own_property_slot() || !class.property_accesses_are_cacheable() {
            return None;
        }

        if let Some((_, attributes)) = class.get_concurrently(uid) {
            let holder = holder?;
            if attributes
                .intersects(PropertyAttributes::ACCESSOR | PropertyAttributes::CUSTOM_ACCESSOR_OR_VALUE)
            {
                return None;
            }
            let conditions =
                generate_conditions_for_prototype_property_hit(heap, head, holder, uid, max_depth);
            if !conditions.is_valid() {
                return None;
            }
            let last = conditions.last()?;
            if !last.is_presence() {
                return None;
            }
            let offset = last.offset();

            let mut result = GetByStatus::new(GetByState::Simple);
            let variant = GetByVariant::new(Some(identifier.clone()), ShapeSet::single(head), offset)
                .with_conditions(conditions);
            if !result.append_variant(variant) {
                return None;
            }
            return Some(result);
        }

        match class.prototype {
            Prototype::Object(proto) => {
                holder = Some(proto);
                current = heap.structure_of(proto)?;
            }
            Prototype::Null | Prototype::Poly => return None,
        }
    }
    None
}
