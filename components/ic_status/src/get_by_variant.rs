//! One way a property read can be satisfied.

use std::fmt;

use core_types::{CacheableIdentifier, ObjectId, PropertyOffset};
use memory_manager::{
    mark_structure_if_cheap, Heap, Intrinsic, ObjectPropertyConditionSet, ShapeSet, SlotVisitor,
};

use crate::access_case::{CustomAccessorId, DomAttributeAnnotation};
use crate::call_link_status::CallLinkStatus;

/// A concrete access strategy for a set of receiver shapes
///
/// A variant is exactly one of:
/// - a plain load (valid offset, nothing else)
/// - a miss (invalid offset, only absence conditions)
/// - a getter call (call summary, invalid offset)
/// - an intrinsic getter (intrinsic function, invalid offset)
/// - a custom accessor (custom getter, invalid offset)
///
/// # Example
///
/// ```
/// use core_types::{Identifier, PropertyOffset, ShapeId};
/// use ic_status::GetByVariant;
/// use memory_manager::ShapeSet;
///
/// let mut a = GetByVariant::new(
///     Some(Identifier::new("x").into()),
///     ShapeSet::single(ShapeId(1)),
///     PropertyOffset::new(0),
/// );
/// let b = GetByVariant::new(
///     Some(Identifier::new("x").into()),
///     ShapeSet::single(ShapeId(2)),
///     PropertyOffset::new(0),
/// );
/// assert!(a.attempt_to_merge(&b));
/// assert_eq!(a.structure_set().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GetByVariant {
    identifier: Option<CacheableIdentifier>,
    structure_set: ShapeSet,
    condition_set: ObjectPropertyConditionSet,
    offset: PropertyOffset,
    via_global_proxy: bool,
    call_link_status: Option<Box<CallLinkStatus>>,
    intrinsic_function: Option<ObjectId>,
    custom_accessor_getter: Option<CustomAccessorId>,
    dom_attribute: Option<DomAttributeAnnotation>,
}

impl GetByVariant {
    /// A variant reading `offset` from receivers in `structure_set`.
    pub fn new(
        identifier: Option<CacheableIdentifier>,
        structure_set: ShapeSet,
        offset: PropertyOffset,
    ) -> Self {
        debug_assert!(
            !structure_set.is_empty() || !offset.is_valid(),
            "a load needs a receiver shape"
        );
        Self {
            identifier,
            structure_set,
            condition_set: ObjectPropertyConditionSet::empty(),
            offset,
            via_global_proxy: false,
            call_link_status: None,
            intrinsic_function: None,
            custom_accessor_getter: None,
            dom_attribute: None,
        }
    }

    /// Returns this variant relying on `condition_set`.
    pub fn with_conditions(mut self, condition_set: ObjectPropertyConditionSet) -> Self {
        self.condition_set = condition_set;
        self
    }

    /// Returns this variant with the given proxy flag.
    pub fn with_via_global_proxy(mut self, via_global_proxy: bool) -> Self {
        self.via_global_proxy = via_global_proxy;
        self
    }

    /// Returns this variant calling a getter summarized by `status`.
    pub fn with_call_link_status(mut self, status: CallLinkStatus) -> Self {
        self.call_link_status = Some(Box::new(status));
        self
    }

    /// Returns this variant calling the built-in getter `function`.
    pub fn with_intrinsic_function(mut self, function: ObjectId) -> Self {
        self.intrinsic_function = Some(function);
        self
    }

    /// Returns this variant calling a native accessor.
    pub fn with_custom_accessor(
        mut self,
        getter: CustomAccessorId,
        dom_attribute: Option<DomAttributeAnnotation>,
    ) -> Self {
        self.custom_accessor_getter = Some(getter);
        self.dom_attribute = dom_attribute;
        self
    }

    /// Property this variant answers for, if known.
    pub fn identifier(&self) -> Option<&CacheableIdentifier> {
        self.identifier.as_ref()
    }

    /// Receiver shapes.
    pub fn structure_set(&self) -> &ShapeSet {
        &self.structure_set
    }

    pub(crate) fn structure_set_mut(&mut self) -> &mut ShapeSet {
        &mut self.structure_set
    }

    /// Prototype conditions.
    pub fn condition_set(&self) -> &ObjectPropertyConditionSet {
        &self.condition_set
    }

    /// Slot holding the value, invalid when the value is not a stored one.
    pub fn offset(&self) -> PropertyOffset {
        self.offset
    }

    /// Whether the read goes through a global proxy.
    pub fn via_global_proxy(&self) -> bool {
        self.via_global_proxy
    }

    /// Summary of the getter call, if the variant calls one.
    pub fn call_link_status(&self) -> Option<&CallLinkStatus> {
        self.call_link_status.as_deref()
    }

    /// The built-in getter function, if any.
    pub fn intrinsic_function(&self) -> Option<ObjectId> {
        self.intrinsic_function
    }

    /// What the built-in getter computes.
    pub fn intrinsic(&self, heap: &Heap) -> Option<Intrinsic> {
        self.intrinsic_function
            .and_then(|function| heap.object(function))
            .and_then(|object| object.intrinsic())
    }

    /// The native accessor, if any.
    pub fn custom_accessor_getter(&self) -> Option<CustomAccessorId> {
        self.custom_accessor_getter
    }

    /// DOM annotation of the native accessor.
    pub fn dom_attribute(&self) -> Option<&DomAttributeAnnotation> {
        self.dom_attribute.as_ref()
    }

    /// Whether the read produces no stored value.
    pub fn is_property_unset(&self) -> bool {
        !self.offset.is_valid()
    }

    /// Fold `other` into this variant if both describe the same access.
    ///
    /// Returns false, leaving this variant untouched, if they differ in
    /// anything but receiver shapes and mergeable conditions.
    pub fn attempt_to_merge(&mut self, other: &GetByVariant) -> bool {
        if self.identifier.is_some() != other.identifier.is_some() {
            return false;
        }
        if self.identifier.is_some() && self.identifier != other.identifier {
            return false;
        }
        if self.offset != other.offset || self.via_global_proxy != other.via_global_proxy {
            return false;
        }
        if self.call_link_status.is_some() != other.call_link_status.is_some() {
            return false;
        }
        if self.intrinsic_function != other.intrinsic_function
            || self.custom_accessor_getter != other.custom_accessor_getter
            || self.dom_attribute != other.dom_attribute
        {
            return false;
        }
        if self.condition_set.is_empty() != other.condition_set.is_empty() {
            return false;
        }

        let merged_conditions = if self.condition_set.is_empty() {
            ObjectPropertyConditionSet::empty()
        } else {
            let merged = self.condition_set.merged_with(&other.condition_set);
            if !merged.is_valid() {
                return false;
            }
            // A hit reads from exactly one holder; a miss has none.
            if !self.is_property_unset() && !merged.has_one_slot_base_condition() {
                return false;
            }
            merged
        };

        self.condition_set = merged_conditions;
        self.structure_set.merge(&other.structure_set);
        if let (Some(mine), Some(theirs)) = (&mut self.call_link_status, &other.call_link_status) {
            mine.merge(theirs);
        }
        true
    }

    /// Whether both variants could claim the same receiver.
    pub fn overlaps(&self, other: &GetByVariant) -> bool {
        if self.identifier.is_some() != other.identifier.is_some() {
            return true;
        }
        if self.identifier.is_some() && self.identifier != other.identifier {
            return false;
        }
        self.structure_set.overlaps(&other.structure_set)
    }

    /// Report every heap reference as strong.
    pub fn visit_aggregate(&self, visitor: &mut dyn SlotVisitor) {
        if let Some(cell) = self.identifier.as_ref().and_then(CacheableIdentifier::cell) {
            visitor.append(cell);
        }
        for shape in self.structure_set.iter() {
            visitor.append(shape.into());
        }
        self.condition_set.visit_aggregate(visitor);
        if let Some(status) = &self.call_link_status {
            status.visit_aggregate(visitor);
        }
        if let Some(function) = self.intrinsic_function {
            visitor.append(function.into());
        }
    }

    /// Mark the shapes that cost nothing to keep alive.
    pub fn mark_if_cheap(&self, visitor: &mut dyn SlotVisitor) {
        for shape in self.structure_set.iter() {
            mark_structure_if_cheap(visitor, shape);
        }
    }

    /// Whether everything the variant refers to survives collection.
    pub fn finalize(&self, heap: &Heap) -> bool {
        if !self
            .structure_set
            .iter()
            .all(|shape| heap.survives_collection(shape.into()))
        {
            return false;
        }
        if !self
            .condition_set
            .iter()
            .all(|condition| heap.survives_collection(condition.object.into()))
        {
            return false;
        }
        if let Some(status) = &self.call_link_status {
            if !status.finalize(heap) {
                return false;
            }
        }
        self.intrinsic_function
            .map_or(true, |function| heap.survives_collection(function.into()))
    }
}

impl fmt::Display for GetByVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(identifier) => write!(f, "<id='{identifier}', ")?,
            None => f.write_str("<id=none, ")?,
        }
        write!(
            f,
            "{}, {}, offset = {}",
            self.structure_set, self.condition_set, self.offset
        )?;
        if self.via_global_proxy {
            f.write_str(", viaGlobalProxy")?;
        }
        if let Some(status) = &self.call_link_status {
            write!(f, ", call = {status}")?;
        }
        if let Some(function) = self.intrinsic_function {
            write!(f, ", intrinsic = {function}")?;
        }
        if let Some(getter) = self.custom_accessor_getter {
            write!(f, ", customAccessorGetter = {getter}")?;
        }
        if let Some(dom) = &self.dom_attribute {
            write!(f, ", domClass = {}", dom.class_name)?;
        }
        f.write_str(">")
    }
}
