//! Heap management with mark-and-sweep collection.
//!
//! The heap owns every hidden class and object and hands out copyable
//! handles to them. A collection cycle clears all mark bits, lets visitors
//! mark what is reachable, then sweeps everything left unmarked. Handles to
//! swept cells stay distinguishable from handles that were never issued.

use std::collections::HashSet;

use core_types::{CellRef, ObjectId, RuntimeError, ShapeId};
use tracing::debug;

use crate::hidden_class::{HiddenClass, Prototype};
use crate::object::{JSObject, ObjectKind};

/// Statistics about garbage collection cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GcStats {
    /// Number of completed collections
    pub collections: usize,
    /// Cells freed across all collections
    pub swept_cells: usize,
    /// Cells currently alive
    pub live_cells: usize,
}

/// The main heap structure.
#[derive(Debug, Default)]
pub struct Heap {
    /// Registered classes; `None` once swept
    classes: Vec<Option<HiddenClass>>,
    /// Allocated objects; `None` once swept
    objects: Vec<Option<JSObject>>,
    /// Cells marked during the current cycle
    marks: HashSet<CellRef>,
    /// Whether we're currently in a marking phase
    is_marking: bool,
    stats: GcStats,
}

impl Heap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hidden class and returns its handle.
    pub fn register_class(&mut self, class: HiddenClass) -> ShapeId {
        let id = ShapeId(self.classes.len() as u32);
        self.classes.push(Some(class));
        self.stats.live_cells += 1;
        id
    }

    /// Allocates an object with the given class.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not a live hidden class.
    pub fn allocate_object(&mut self, class: ShapeId, kind: ObjectKind) -> ObjectId {
        assert!(
            self.class(class).is_some(),
            "allocating an object with dead or unknown class {class}"
        );
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(Some(JSObject::new(class, kind)));
        self.stats.live_cells += 1;
        id
    }

    /// Moves an object to a different hidden class.
    pub fn transition_object(&mut self, object: ObjectId, class: ShapeId) -> Result<(), RuntimeError> {
        self.expect_class(class)?;
        let slot = self
            .objects
            .get_mut(object.0 as usize)
            .ok_or(RuntimeError::UnknownObject(object))?;
        let obj = slot
            .as_mut()
            .ok_or(RuntimeError::CellCollected(object.into()))?;
        obj.class = class;
        Ok(())
    }

    /// Looks up a live hidden class.
    pub fn class(&self, id: ShapeId) -> Option<&HiddenClass> {
        self.classes.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Looks up a live object.
    pub fn object(&self, id: ObjectId) -> Option<&JSObject> {
        self.objects.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Looks up a hidden class, distinguishing unknown from collected handles.
    pub fn expect_class(&self, id: ShapeId) -> Result<&HiddenClass, RuntimeError> {
        match self.classes.get(id.0 as usize) {
            None => Err(RuntimeError::UnknownShape(id)),
            Some(None) => Err(RuntimeError::CellCollected(id.into())),
            Some(Some(class)) => Ok(class),
        }
    }

    /// Looks up an object, distinguishing unknown from collected handles.
    pub fn expect_object(&self, id: ObjectId) -> Result<&JSObject, RuntimeError> {
        match self.objects.get(id.0 as usize) {
            None => Err(RuntimeError::UnknownObject(id)),
            Some(None) => Err(RuntimeError::CellCollected(id.into())),
            Some(Some(object)) => Ok(object),
        }
    }

    /// The current hidden class of a live object.
    pub fn structure_of(&self, object: ObjectId) -> Option<ShapeId> {
        self.object(object).map(|obj| obj.class)
    }

    /// Where property lookups continue after missing on `shape`.
    pub fn prototype_for_lookup(&self, shape: ShapeId) -> Option<Prototype> {
        self.class(shape).map(|class| class.prototype)
    }

    /// Whether the cell has not been swept.
    pub fn is_live(&self, cell: CellRef) -> bool {
        match cell {
            CellRef::Shape(id) => self.class(id).is_some(),
            CellRef::Object(id) => self.object(id).is_some(),
        }
    }

    /// Whether the cell was marked in the current cycle.
    pub fn is_marked(&self, cell: CellRef) -> bool {
        self.marks.contains(&cell)
    }

    /// Whether the cell survives the collection in progress, or survived the
    /// most recent one when no collection is marking.
    pub fn survives_collection(&self, cell: CellRef) -> bool {
        if self.is_marking {
            self.is_marked(cell)
        } else {
            self.is_live(cell)
        }
    }

    /// Marks a live cell; returns true if it was not marked before.
    pub fn mark(&mut self, cell: CellRef) -> bool {
        if !self.is_live(cell) {
            return false;
        }
        self.marks.insert(cell)
    }

    /// Starts a collection cycle by clearing every mark bit.
    pub fn begin_collection(&mut self) {
        self.marks.clear();
        self.is_marking = true;
    }

    /// Whether a collection cycle is marking.
    pub fn is_marking(&self) -> bool {
        self.is_marking
    }

    /// Frees every cell left unmarked and ends the cycle.
    ///
    /// Mark bits are kept until the next [`Heap::begin_collection`] so that
    /// weak holders can check survival after the sweep.
    ///
    /// Returns the number of freed cells.
    pub fn sweep(&mut self) -> usize {
        let marks = &self.marks;
        let mut freed = 0;
        for (index, slot) in self.classes.iter_mut().enumerate() {
            if slot.is_some() && !marks.contains(&CellRef::Shape(ShapeId(index as u32))) {
                *slot = None;
                freed += 1;
            }
        }
        for (index, slot) in self.objects.iter_mut().enumerate() {
            if slot.is_some() && !marks.contains(&CellRef::Object(ObjectId(index as u32))) {
                *slot = None;
                freed += 1;
            }
        }
        self.is_marking = false;
        self.stats.collections += 1;
        self.stats.swept_cells += freed;
        self.stats.live_cells -= freed;
        debug!(freed, live = self.stats.live_cells, "heap sweep finished");
        freed
    }

    /// Collection statistics.
    pub fn stats(&self) -> GcStats {
        self.stats
    }
}
