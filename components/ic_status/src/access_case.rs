//! Access cases of a polymorphic stub
//!
//! Each case handles the read for one receiver shape (or one family of
//! receivers) and records how the value was found.

use std::fmt;
use std::sync::Arc;

use core_types::{CacheableIdentifier, Identifier, ObjectId, PropertyOffset, ScopeOffset, ShapeId};
use memory_manager::ObjectPropertyConditionSet;

use crate::call_link_status::CallLinkInfo;

/// Handle to a native getter or value function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomAccessorId(pub u32);

impl fmt::Display for CustomAccessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "custom#{}", self.0)
    }
}

/// Marks a custom getter as a DOM attribute the compiler can call directly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomAttributeAnnotation {
    /// Interface the attribute belongs to
    pub class_name: Arc<str>,
}

impl DomAttributeAnnotation {
    /// Annotation for an attribute of `class_name`.
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: Arc::from(class_name),
        }
    }
}

/// Resolution of an import read through a module namespace object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNamespaceData {
    /// The namespace object
    pub namespace_object: ObjectId,
    /// Environment holding the binding
    pub environment: ObjectId,
    /// Slot of the binding in the environment
    pub scope_offset: ScopeOffset,
    /// The imported name
    pub identifier: CacheableIdentifier,
}

/// How a case produces its value
#[derive(Debug, Clone, PartialEq)]
pub enum AccessKind {
    /// Plain data load
    Load,
    /// Property is absent; the result is `undefined`
    Miss,
    /// Load of the getter/setter pair itself
    GetGetter,
    /// Call a JavaScript getter
    Getter {
        /// Link record of the getter call
        call_link_info: Option<CallLinkInfo>,
    },
    /// Call a native accessor
    CustomAccessorGetter {
        /// The native function
        getter: CustomAccessorId,
        /// DOM attribute annotation
        dom_attribute: Option<DomAttributeAnnotation>,
    },
    /// Read a native custom value
    CustomValueGetter {
        /// The native function
        getter: CustomAccessorId,
    },
    /// Call a recognised built-in getter
    IntrinsicGetter {
        /// The getter function object
        function: ObjectId,
    },
    /// Load an import binding through a namespace object
    ModuleNamespaceLoad(Arc<ModuleNamespaceData>),
    /// Call a `Proxy`'s `get` trap
    ProxyObjectLoad {
        /// Link record of the trap call
        call_link_info: Option<CallLinkInfo>,
    },
    /// Call a `Proxy`'s `get` trap with an index key
    IndexedProxyObjectLoad {
        /// Link record of the trap call
        call_link_info: Option<CallLinkInfo>,
    },
    /// Look the property up in the megamorphic cache
    LoadMegamorphic,
    /// Look an index up in the megamorphic cache
    IndexedMegamorphicLoad,
    /// Load an int32 element
    IndexedInt32Load,
    /// Array `length`
    ArrayLength,
    /// String `length`
    StringLength,
}

/// One case of a polymorphic stub
#[derive(Debug, Clone, PartialEq)]
pub struct AccessCase {
    /// How the value is produced
    pub kind: AccessKind,
    /// The property read
    pub identifier: CacheableIdentifier,
    /// Receiver shape the case checks
    pub structure: Option<ShapeId>,
    /// Prototype conditions the case relies on
    pub condition_set: ObjectPropertyConditionSet,
    /// Slot read on the holder, when the case reads a slot
    pub offset: PropertyOffset,
    /// The receiver is a global proxy and the read goes to its target
    pub via_global_proxy: bool,
    /// The case checks a per-object prototype
    pub uses_poly_proto: bool,
    /// Object whose shape the custom accessor was resolved on, if not the
    /// receiver
    pub alternate_base: Option<ObjectId>,
}

impl AccessCase {
    fn new(
        kind: AccessKind,
        identifier: CacheableIdentifier,
        structure: Option<ShapeId>,
        offset: PropertyOffset,
    ) -> Self {
        Self {
            kind,
            identifier,
            structure,
            condition_set: ObjectPropertyConditionSet::empty(),
            offset,
            via_global_proxy: false,
            uses_poly_proto: false,
            alternate_base: None,
        }
    }

    /// Plain load of `offset` from `structure`.
    pub fn load(identifier: CacheableIdentifier, structure: ShapeId, offset: PropertyOffset) -> Self {
        Self::new(AccessKind::Load, identifier, Some(structure), offset)
    }

    /// The property is absent from `structure` and its prototypes.
    pub fn miss(
        identifier: CacheableIdentifier,
        structure: ShapeId,
        conditions: ObjectPropertyConditionSet,
    ) -> Self {
        Self::new(AccessKind::Miss, identifier, Some(structure), PropertyOffset::INVALID)
            .with_conditions(conditions)
    }

    /// Load of the accessor pair itself.
    pub fn get_getter(
        identifier: CacheableIdentifier,
        structure: ShapeId,
        offset: PropertyOffset,
    ) -> Self {
        Self::new(AccessKind::GetGetter, identifier, Some(structure), offset)
    }

    /// Call of a JavaScript getter.
    pub fn getter(
        identifier: CacheableIdentifier,
        structure: ShapeId,
        call_link_info: Option<CallLinkInfo>,
    ) -> Self {
        Self::new(
            AccessKind::Getter { call_link_info },
            identifier,
            Some(structure),
            PropertyOffset::INVALID,
        )
    }

    /// Call of a native accessor.
    pub fn custom_accessor_getter(
        identifier: CacheableIdentifier,
        structure: ShapeId,
        getter: CustomAccessorId,
        dom_attribute: Option<DomAttributeAnnotation>,
    ) -> Self {
        Self::new(
            AccessKind::CustomAccessorGetter {
                getter,
                dom_attribute,
            },
            identifier,
            Some(structure),
            PropertyOffset::INVALID,
        )
    }

    /// Read of a native custom value.
    pub fn custom_value_getter(
        identifier: CacheableIdentifier,
        structure: ShapeId,
        getter: CustomAccessorId,
    ) -> Self {
        Self::new(
            AccessKind::CustomValueGetter { getter },
            identifier,
            Some(structure),
            PropertyOffset::INVALID,
        )
    }

    /// Call of a recognised built-in getter.
    pub fn intrinsic_getter(
        identifier: CacheableIdentifier,
        structure: ShapeId,
        function: ObjectId,
    ) -> Self {
        Self::new(
            AccessKind::IntrinsicGetter { function },
            identifier,
            Some(structure),
            PropertyOffset::INVALID,
        )
    }

    /// Load of an import through a namespace object of `structure`.
    pub fn module_namespace_load(structure: ShapeId, data: ModuleNamespaceData) -> Self {
        let identifier = data.identifier.clone();
        Self::new(
            AccessKind::ModuleNamespaceLoad(Arc::new(data)),
            identifier,
            Some(structure),
            PropertyOffset::INVALID,
        )
    }

    /// `get` trap call of a `Proxy`.
    pub fn proxy_object_load(
        identifier: CacheableIdentifier,
        call_link_info: Option<CallLinkInfo>,
    ) -> Self {
        Self::new(
            AccessKind::ProxyObjectLoad { call_link_info },
            identifier,
            None,
            PropertyOffset::INVALID,
        )
    }

    /// Indexed `get` trap call of a `Proxy`.
    pub fn indexed_proxy_object_load(
        identifier: CacheableIdentifier,
        call_link_info: Option<CallLinkInfo>,
    ) -> Self {
        Self::new(
            AccessKind::IndexedProxyObjectLoad { call_link_info },
            identifier,
            None,
            PropertyOffset::INVALID,
        )
    }

    /// Megamorphic cache lookup.
    pub fn load_megamorphic(identifier: CacheableIdentifier) -> Self {
        Self::new(AccessKind::LoadMegamorphic, identifier, None, PropertyOffset::INVALID)
    }

    /// Megamorphic cache lookup of an index.
    pub fn indexed_megamorphic_load(identifier: CacheableIdentifier) -> Self {
        Self::new(
            AccessKind::IndexedMegamorphicLoad,
            identifier,
            None,
            PropertyOffset::INVALID,
        )
    }

    /// Int32 element load from arrays of `structure`.
    pub fn indexed_int32_load(structure: ShapeId) -> Self {
        Self::new(
            AccessKind::IndexedInt32Load,
            Identifier::new("").into(),
            Some(structure),
            PropertyOffset::INVALID,
        )
    }

    /// Array `length`.
    pub fn array_length(identifier: CacheableIdentifier) -> Self {
        Self::new(AccessKind::ArrayLength, identifier, None, PropertyOffset::INVALID)
    }

    /// String `length`.
    pub fn string_length(identifier: CacheableIdentifier) -> Self {
        Self::new(AccessKind::StringLength, identifier, None, PropertyOffset::INVALID)
    }

    /// Returns this case relying on `conditions`.
    pub fn with_conditions(mut self, conditions: ObjectPropertyConditionSet) -> Self {
        self.condition_set = conditions;
        self
    }

    /// Returns this case reading `offset`.
    pub fn with_offset(mut self, offset: PropertyOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Returns this case going through a global proxy.
    pub fn via_global_proxy(mut self) -> Self {
        self.via_global_proxy = true;
        self
    }

    /// Returns this case checking a per-object prototype.
    pub fn with_poly_proto(mut self) -> Self {
        self.uses_poly_proto = true;
        self
    }

    /// Returns this case resolved on `base` rather than the receiver.
    pub fn with_alternate_base(mut self, base: ObjectId) -> Self {
        self.alternate_base = Some(base);
        self
    }

    /// Whether the case only applies when the key equals its identifier.
    pub fn requires_identifier_name_match(&self) -> bool {
        !matches!(
            self.kind,
            AccessKind::IndexedProxyObjectLoad { .. }
                | AccessKind::IndexedMegamorphicLoad
                | AccessKind::IndexedInt32Load
        )
    }

    /// Whether running the case may call out of the stub.
    pub fn does_calls(&self) -> bool {
        matches!(
            self.kind,
            AccessKind::Getter { .. }
                | AccessKind::CustomAccessorGetter { .. }
                | AccessKind::CustomValueGetter { .. }
                | AccessKind::ProxyObjectLoad { .. }
                | AccessKind::IndexedProxyObjectLoad { .. }
        )
    }

    /// Whether the case calls a native custom function.
    pub fn is_custom(&self) -> bool {
        matches!(
            self.kind,
            AccessKind::CustomAccessorGetter { .. } | AccessKind::CustomValueGetter { .. }
        )
    }

    /// Link record of the call this case makes, if it keeps one.
    pub fn call_link_info(&self) -> Option<&CallLinkInfo> {
        match &self.kind {
            AccessKind::Getter { call_link_info }
            | AccessKind::ProxyObjectLoad { call_link_info }
            | AccessKind::IndexedProxyObjectLoad { call_link_info } => call_link_info.as_ref(),
            _ => None,
        }
    }
}
