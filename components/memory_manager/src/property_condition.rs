//! Object property conditions.
//!
//! A condition states something about a property of one specific object,
//! usually a prototype: the property is present at a known offset, or it is
//! absent. Cached accesses that look past the receiver's own shape are only
//! correct while every such condition along the prototype chain holds.
//!
//! Hidden classes are immutable, so a condition is ensured by the current
//! class of its object alone. Transitioning the object to another class is
//! what invalidates it.

use std::fmt;
use std::sync::Arc;

use core_types::{Identifier, ObjectId, PropertyOffset, ShapeId};
use tracing::trace;

use crate::gc::SlotVisitor;
use crate::heap::Heap;
use crate::hidden_class::{HiddenClass, PropertyAttributes, Prototype};

/// What a condition requires of its property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// The property exists at `offset` with exactly these attributes
    Presence {
        /// Slot offset on the object
        offset: PropertyOffset,
        /// Slot attributes
        attributes: PropertyAttributes,
    },
    /// The property does not exist on the object
    Absence,
}

/// A requirement on one property of one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPropertyCondition {
    /// The object the condition is about
    pub object: ObjectId,
    /// The property key
    pub uid: Identifier,
    /// Presence or absence
    pub kind: ConditionKind,
}

impl ObjectPropertyCondition {
    /// The property is present at `offset`.
    pub fn presence(
        object: ObjectId,
        uid: Identifier,
        offset: PropertyOffset,
        attributes: PropertyAttributes,
    ) -> Self {
        Self {
            object,
            uid,
            kind: ConditionKind::Presence { offset, attributes },
        }
    }

    /// The property is absent.
    pub fn absence(object: ObjectId, uid: Identifier) -> Self {
        Self {
            object,
            uid,
            kind: ConditionKind::Absence,
        }
    }

    /// Whether this is a presence condition.
    pub fn is_presence(&self) -> bool {
        matches!(self.kind, ConditionKind::Presence { .. })
    }

    /// Offset of a presence condition, invalid for an absence.
    pub fn offset(&self) -> PropertyOffset {
        match self.kind {
            ConditionKind::Presence { offset, .. } => offset,
            ConditionKind::Absence => PropertyOffset::INVALID,
        }
    }

    /// Whether the object's current class guarantees the condition.
    pub fn structure_ensures_validity(&self, heap: &Heap) -> bool {
        let Some(class) = heap.structure_of(self.object).and_then(|id| heap.class(id)) else {
            return false;
        };
        if class.overrides_get_own_property_slot() && !class.is_global_object() {
            return false;
        }
        match (self.kind, class.get_concurrently(&self.uid)) {
            (ConditionKind::Absence, None) => true,
            (ConditionKind::Presence { offset, attributes }, Some((found, found_attributes))) => {
                offset == found && attributes == found_attributes
            }
            _ => false,
        }
    }

    /// Whether the object has not been collected.
    pub fn is_still_live(&self, heap: &Heap) -> bool {
        heap.is_live(self.object.into())
    }

    /// Whether the object survives the current collection cycle.
    pub fn is_marked(&self, visitor: &dyn SlotVisitor) -> bool {
        visitor.is_marked(self.object.into())
    }
}

impl fmt::Display for ObjectPropertyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConditionKind::Presence { offset, .. } => {
                write!(f, "Presence of {} at {} on {}", self.uid, offset, self.object)
            }
            ConditionKind::Absence => write!(f, "Absence of {} on {}", self.uid, self.object),
        }
    }
}

/// An ordered set of conditions, or the invalid set.
///
/// The invalid set means "no set of conditions can make this access
/// cacheable" and absorbs every merge. Sets are shared, cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPropertyConditionSet {
    conditions: Option<Arc<[ObjectPropertyCondition]>>,
}

impl ObjectPropertyConditionSet {
    /// The invalid set.
    pub fn invalid() -> Self {
        Self { conditions: None }
    }

    /// The valid set with no conditions.
    pub fn empty() -> Self {
        Self {
            conditions: Some(Arc::from(Vec::new())),
        }
    }

    /// A valid set holding `conditions`.
    ///
    /// Two contradicting conditions on the same property of the same object
    /// make the set invalid.
    pub fn from_conditions(conditions: Vec<ObjectPropertyCondition>) -> Self {
        let mut result: Vec<ObjectPropertyCondition> = Vec::with_capacity(conditions.len());
        for condition in conditions {
            match result
                .iter()
                .find(|c| c.object == condition.object && c.uid == condition.uid)
            {
                Some(existing) if existing.kind != condition.kind => return Self::invalid(),
                Some(_) => {}
                None => result.push(condition),
            }
        }
        Self {
            conditions: Some(Arc::from(result)),
        }
    }

    /// Whether the set is valid.
    pub fn is_valid(&self) -> bool {
        self.conditions.is_some()
    }

    /// Whether the set is valid and holds no condition.
    pub fn is_empty(&self) -> bool {
        self.conditions.as_ref().map_or(false, |c| c.is_empty())
    }

    /// Number of conditions; zero for the invalid set.
    pub fn len(&self) -> usize {
        self.conditions.as_ref().map_or(0, |c| c.len())
    }

    /// Iterates the conditions in order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectPropertyCondition> + '_ {
        self.conditions.iter().flat_map(|c| c.iter())
    }

    /// The last condition of the set.
    pub fn last(&self) -> Option<&ObjectPropertyCondition> {
        self.conditions.as_ref().and_then(|c| c.last())
    }

    /// Union of both sets; invalid if either is invalid or they contradict.
    pub fn merged_with(&self, other: &Self) -> Self {
        match (&self.conditions, &other.conditions) {
            (Some(a), Some(b)) => Self::from_conditions(a.iter().chain(b.iter()).cloned().collect()),
            _ => Self::invalid(),
        }
    }

    /// Number of presence conditions. The holder of the property read is the
    /// object of the presence condition, the "slot base".
    pub fn number_of_slot_base_conditions(&self) -> usize {
        self.iter().filter(|c| c.is_presence()).count()
    }

    /// Whether exactly one presence condition exists.
    pub fn has_one_slot_base_condition(&self) -> bool {
        self.number_of_slot_base_conditions() == 1
    }

    /// The presence condition, if exactly one exists.
    pub fn slot_base_condition(&self) -> Option<&ObjectPropertyCondition> {
        if !self.has_one_slot_base_condition() {
            return None;
        }
        self.iter().find(|c| c.is_presence())
    }

    /// Whether the set is valid and every condition is guaranteed by its
    /// object's current class.
    pub fn structures_ensure_validity(&self, heap: &Heap) -> bool {
        self.is_valid() && self.iter().all(|c| c.structure_ensures_validity(heap))
    }

    /// Whether every condition's object is still allocated.
    pub fn are_still_live(&self, heap: &Heap) -> bool {
        self.iter().all(|c| c.is_still_live(heap))
    }

    /// Whether every condition's object survives the current cycle.
    pub fn are_marked(&self, visitor: &dyn SlotVisitor) -> bool {
        self.iter().all(|c| c.is_marked(visitor))
    }

    /// Reports every condition's object as a strong reference.
    pub fn visit_aggregate(&self, visitor: &mut dyn SlotVisitor) {
        for condition in self.iter() {
            visitor.append(condition.object.into());
        }
    }
}

impl Default for ObjectPropertyConditionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ObjectPropertyConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(conditions) = &self.conditions else {
            return f.write_str("<invalid>");
        };
        f.write_str("[")?;
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{condition}")?;
        }
        f.write_str("]")
    }
}

/// Where the prototype walk stops.
#[derive(Clone, Copy)]
enum WalkTarget {
    /// Walk to the end of the chain, every prototype must miss
    Miss,
    /// Walk until this object, which must hold the property
    Holder(ObjectId),
    /// Walk until the first prototype that holds the property
    FirstHolder,
}

fn cacheable_for_conditions(class: &HiddenClass) -> bool {
    class.property_accesses_are_cacheable()
        && !class.has_poly_proto()
        && (!class.overrides_get_own_property_slot() || class.is_global_object())
}

fn generate_conditions(
    heap: &Heap,
    head: ShapeId,
    uid: &Identifier,
    target: WalkTarget,
    max_depth: usize,
) -> ObjectPropertyConditionSet {
    let Some(head_class) = heap.class(head) else {
        return ObjectPropertyConditionSet::invalid();
    };
    if !cacheable_for_conditions(head_class) {
        trace!(%head, %uid, "head shape not cacheable for conditions");
        return ObjectPropertyConditionSet::invalid();
    }

    let mut conditions = Vec::new();
    let mut prototype = head_class.prototype;
    for _ in 0..max_depth {
        let object = match prototype {
            Prototype::Object(object) => object,
            Prototype::Null => {
                return match target {
                    WalkTarget::Miss => ObjectPropertyConditionSet::from_conditions(conditions),
                    WalkTarget::Holder(_) | WalkTarget::FirstHolder => {
                        ObjectPropertyConditionSet::invalid()
                    }
                };
            }
            Prototype::Poly => return ObjectPropertyConditionSet::invalid(),
        };
        let Some(class) = heap.structure_of(object).and_then(|id| heap.class(id)) else {
            return ObjectPropertyConditionSet::invalid();
        };
        if !cacheable_for_conditions(class) {
            trace!(%object, %uid, "prototype not cacheable for conditions");
            return ObjectPropertyConditionSet::invalid();
        }

        let found = class.get_concurrently(uid);
        let is_holder = match target {
            WalkTarget::Miss => false,
            WalkTarget::Holder(holder) => holder == object,
            WalkTarget::FirstHolder => found.is_some(),
        };
        if is_holder {
            let Some((offset, attributes)) = found else {
                return ObjectPropertyConditionSet::invalid();
            };
            conditions.push(ObjectPropertyCondition::presence(
                object,
                uid.clone(),
                offset,
                attributes,
            ));
            return ObjectPropertyConditionSet::from_conditions(conditions);
        }
        if found.is_some() {
            // Shadowed before reaching the target.
            return ObjectPropertyConditionSet::invalid();
        }
        conditions.push(ObjectPropertyCondition::absence(object, uid.clone()));
        prototype = class.prototype;
    }
    trace!(%head, %uid, max_depth, "prototype walk too deep");
    ObjectPropertyConditionSet::invalid()
}

/// Conditions under which reading `uid` from an object of class `head`
/// misses along the whole prototype chain.
///
/// The head itself is not covered: the caller checks it by shape.
pub fn generate_conditions_for_property_miss(
    heap: &Heap,
    head: ShapeId,
    uid: &Identifier,
    max_depth: usize,
) -> ObjectPropertyConditionSet {
    generate_conditions(heap, head, uid, WalkTarget::Miss, max_depth)
}

/// Conditions under which reading `uid` from an object of class `head`
/// finds the property on `holder`, a prototype of the head.
pub fn generate_conditions_for_prototype_property_hit(
    heap: &Heap,
    head: ShapeId,
    holder: ObjectId,
    uid: &Identifier,
    max_depth: usize,
) -> ObjectPropertyConditionSet {
    generate_conditions(heap, head, uid, WalkTarget::Holder(holder), max_depth)
}

/// Conditions under which reading `uid` from an object of class `head`
/// finds the property on the nearest prototype that has it.
pub fn generate_conditions_for_prototype_access(
    heap: &Heap,
    head: ShapeId,
    uid: &Identifier,
    max_depth: usize,
) -> ObjectPropertyConditionSet {
    generate_conditions(heap, head, uid, WalkTarget::FirstHolder, max_depth)
}
