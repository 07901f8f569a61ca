//! Memory Manager - heap, hidden classes and garbage collection
//!
//! This component provides:
//! - Hidden classes describing object shapes, and sets of them
//! - Heap allocation of classes and objects behind copyable handles
//! - Mark-and-sweep collection driven by a visitor protocol
//! - Object property conditions and prototype-chain condition generation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod gc;
pub mod heap;
pub mod hidden_class;
pub mod object;
pub mod property_condition;

// Re-export main types
pub use gc::{collect_garbage, mark_structure_if_cheap, MarkingVisitor, SlotVisitor};
pub use heap::{GcStats, Heap};
pub use hidden_class::{
    HiddenClass, PropertyAttributes, PropertyDescriptor, Prototype, ShapeSet, TypeInfoFlags,
};
pub use object::{Intrinsic, JSObject, ObjectKind};
pub use property_condition::{
    generate_conditions_for_property_miss, generate_conditions_for_prototype_access,
    generate_conditions_for_prototype_property_hit, ConditionKind, ObjectPropertyCondition,
    ObjectPropertyConditionSet,
};
