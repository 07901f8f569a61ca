//! Hidden class system describing object shapes.
//!
//! Hidden classes enable fast property access by tracking object shape
//! and using offset-based lookups instead of hash table lookups. Classes are
//! immutable once registered with the heap; adding a property produces a new
//! class.

use std::fmt;

use bitflags::bitflags;
use core_types::{Identifier, ObjectId, PropertyOffset, ShapeId};

use crate::gc::SlotVisitor;

bitflags! {
    /// Attributes of a property slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyAttributes: u8 {
        /// Value cannot be changed
        const READ_ONLY = 1 << 0;
        /// Skipped by enumeration
        const DONT_ENUM = 1 << 1;
        /// Cannot be deleted
        const DONT_DELETE = 1 << 2;
        /// Slot holds a getter/setter pair
        const ACCESSOR = 1 << 3;
        /// Slot holds a native custom accessor
        const CUSTOM_ACCESSOR = 1 << 4;
        /// Slot holds a native custom value
        const CUSTOM_VALUE = 1 << 5;
        /// Either kind of native custom slot
        const CUSTOM_ACCESSOR_OR_VALUE = Self::CUSTOM_ACCESSOR.bits() | Self::CUSTOM_VALUE.bits();
    }
}

bitflags! {
    /// Behavioural flags of a hidden class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeInfoFlags: u8 {
        /// Own-property lookup is overridden by the object type
        const OVERRIDES_GET_OWN_PROPERTY_SLOT = 1 << 0;
        /// Property reads may observe impure, exotic behaviour
        const TAKES_SLOW_PATH_FOR_IMPURE_PROPERTY = 1 << 1;
        /// Property accesses on this class may not be cached at all
        const UNCACHEABLE_PROPERTY_ACCESS = 1 << 2;
        /// The class describes a global object
        const IS_GLOBAL_OBJECT = 1 << 3;
    }
}

/// Where a class finds its prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prototype {
    /// `null` prototype, the end of the chain
    Null,
    /// A prototype object stored on the class
    Object(ObjectId),
    /// The prototype is stored per object, not on the class
    Poly,
}

/// A property descriptor for a hidden class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Key of the property
    pub name: Identifier,
    /// Offset in the properties storage
    pub offset: PropertyOffset,
    /// Slot attributes
    pub attributes: PropertyAttributes,
}

/// Hidden class for JavaScript objects.
///
/// Objects with the same properties in the same order share a hidden class,
/// enabling fast property access through offset-based lookups.
///
/// # Example
///
/// ```
/// use core_types::{Identifier, PropertyOffset};
/// use memory_manager::{HiddenClass, PropertyAttributes};
///
/// let class = HiddenClass::new()
///     .add_property(Identifier::new("x"), PropertyAttributes::empty())
///     .add_property(Identifier::new("y"), PropertyAttributes::empty());
///
/// let (offset, _) = class.get_concurrently(&Identifier::new("y")).unwrap();
/// assert_eq!(offset, PropertyOffset::new(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenClass {
    /// Properties in this class with their offsets
    pub properties: Vec<PropertyDescriptor>,
    /// Prototype lookup policy
    pub prototype: Prototype,
    /// Global object the class was created in
    pub global_object: Option<ObjectId>,
    /// Behavioural flags
    pub flags: TypeInfoFlags,
}

impl HiddenClass {
    /// Creates a new empty hidden class with a `null` prototype.
    pub fn new() -> Self {
        HiddenClass {
            properties: Vec::new(),
            prototype: Prototype::Null,
            global_object: None,
            flags: TypeInfoFlags::empty(),
        }
    }

    /// Returns this class with a different prototype.
    pub fn with_prototype(mut self, prototype: Prototype) -> Self {
        self.prototype = prototype;
        self
    }

    /// Returns this class bound to a global object.
    pub fn with_global_object(mut self, global_object: ObjectId) -> Self {
        self.global_object = Some(global_object);
        self
    }

    /// Returns this class with additional flags.
    pub fn with_flags(mut self, flags: TypeInfoFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Adds a property at the next free offset, producing the transitioned
    /// class.
    pub fn add_property(&self, name: Identifier, attributes: PropertyAttributes) -> HiddenClass {
        let offset = PropertyOffset::new(self.properties.len() as u32);
        let mut next = self.clone();
        next.properties.push(PropertyDescriptor {
            name,
            offset,
            attributes,
        });
        next
    }

    /// Looks up a property on this class only, without walking prototypes.
    ///
    /// Safe to call from a compiler thread: classes are immutable.
    pub fn get_concurrently(&self, uid: &Identifier) -> Option<(PropertyOffset, PropertyAttributes)> {
        self.properties
            .iter()
            .find(|prop| &prop.name == uid)
            .map(|prop| (prop.offset, prop.attributes))
    }

    /// Whether the optimizing tiers must not speculate on impure properties.
    pub fn takes_slow_path_for_impure_property(&self) -> bool {
        self.flags
            .contains(TypeInfoFlags::TAKES_SLOW_PATH_FOR_IMPURE_PROPERTY)
    }

    /// Whether own-property lookup is overridden by the object type.
    pub fn overrides_get_own_property_slot(&self) -> bool {
        self.flags
            .contains(TypeInfoFlags::OVERRIDES_GET_OWN_PROPERTY_SLOT)
    }

    /// Whether property accesses on this class may be cached.
    pub fn property_accesses_are_cacheable(&self) -> bool {
        !self.flags.contains(TypeInfoFlags::UNCACHEABLE_PROPERTY_ACCESS)
    }

    /// Whether this class describes a global object.
    pub fn is_global_object(&self) -> bool {
        self.flags.contains(TypeInfoFlags::IS_GLOBAL_OBJECT)
    }

    /// Whether the prototype is stored per object.
    pub fn has_poly_proto(&self) -> bool {
        self.prototype == Prototype::Poly
    }

    /// Whether marking this class costs nothing beyond setting its mark bit,
    /// because everything it references is already marked.
    pub fn is_cheap_during_gc(&self, visitor: &dyn SlotVisitor) -> bool {
        let global_marked = self
            .global_object
            .map_or(true, |global| visitor.is_marked(global.into()));
        let prototype_marked = match self.prototype {
            Prototype::Object(proto) => visitor.is_marked(proto.into()),
            Prototype::Null | Prototype::Poly => true,
        };
        global_marked && prototype_marked
    }
}

impl Default for HiddenClass {
    fn default() -> Self {
        Self::new()
    }
}

/// A small set of hidden classes.
///
/// Kept sorted so set operations are linear and equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShapeSet {
    shapes: Vec<ShapeId>,
}

impl ShapeSet {
    /// The empty set.
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// A set holding exactly `shape`.
    pub fn single(shape: ShapeId) -> Self {
        Self {
            shapes: vec![shape],
        }
    }

    /// Adds a shape; returns whether it was newly inserted.
    pub fn add(&mut self, shape: ShapeId) -> bool {
        match self.shapes.binary_search(&shape) {
            Ok(_) => false,
            Err(pos) => {
                self.shapes.insert(pos, shape);
                true
            }
        }
    }

    /// Adds every shape of `other`.
    pub fn merge(&mut self, other: &ShapeSet) {
        for &shape in &other.shapes {
            self.add(shape);
        }
    }

    /// Keeps only the shapes that are also in `other`.
    pub fn filter(&mut self, other: &ShapeSet) {
        self.shapes.retain(|shape| other.contains(*shape));
    }

    /// Whether `shape` is in the set.
    pub fn contains(&self, shape: ShapeId) -> bool {
        self.shapes.binary_search(&shape).is_ok()
    }

    /// Whether the two sets share a shape.
    pub fn overlaps(&self, other: &ShapeSet) -> bool {
        self.shapes.iter().any(|shape| other.contains(*shape))
    }

    /// Whether every shape of this set is in `other`.
    pub fn is_subset_of(&self, other: &ShapeSet) -> bool {
        self.shapes.iter().all(|shape| other.contains(*shape))
    }

    /// The shape, if the set holds exactly one.
    pub fn only_shape(&self) -> Option<ShapeId> {
        match self.shapes.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates shapes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().copied()
    }
}

impl FromIterator<ShapeId> for ShapeSet {
    fn from_iter<I: IntoIterator<Item = ShapeId>>(iter: I) -> Self {
        let mut set = ShapeSet::new();
        for shape in iter {
            set.add(shape);
        }
        set
    }
}

impl fmt::Display for ShapeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, shape) in self.shapes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{shape}")?;
        }
        f.write_str("]")
    }
}
