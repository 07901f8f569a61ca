//! Mark phase of the garbage collector.
//!
//! Anything that holds heap references reports them through a
//! [`SlotVisitor`]. The [`MarkingVisitor`] marks each reported cell and
//! traces through it with a worklist until everything reachable is marked.

use core_types::{CellRef, ShapeId};
use tracing::trace;

use crate::heap::Heap;
use crate::object::ObjectKind;

/// Receives the heap references held by a visited structure.
pub trait SlotVisitor {
    /// Reports a strong reference; the cell survives the cycle.
    fn append(&mut self, cell: CellRef);

    /// Whether the cell is already known to survive the cycle.
    fn is_marked(&self, cell: CellRef) -> bool;

    /// The heap being visited.
    fn heap(&self) -> &Heap;
}

/// Marks `shape` if doing so costs nothing beyond its mark bit.
///
/// Returns whether the shape was marked.
pub fn mark_structure_if_cheap(visitor: &mut dyn SlotVisitor, shape: ShapeId) -> bool {
    let cheap = visitor
        .heap()
        .class(shape)
        .map_or(false, |class| class.is_cheap_during_gc(&*visitor));
    if cheap {
        visitor.append(shape.into());
    }
    cheap
}

/// Marks reachable cells of a heap.
///
/// # Example
///
/// ```
/// use memory_manager::{Heap, HiddenClass, MarkingVisitor, ObjectKind, SlotVisitor};
///
/// let mut heap = Heap::new();
/// let class = heap.register_class(HiddenClass::new());
/// let object = heap.allocate_object(class, ObjectKind::Ordinary);
///
/// heap.begin_collection();
/// let mut visitor = MarkingVisitor::new(&mut heap);
/// visitor.append(object.into());
/// visitor.drain();
/// // Tracing the object marked its class too.
/// assert!(visitor.is_marked(class.into()));
/// ```
#[derive(Debug)]
pub struct MarkingVisitor<'h> {
    heap: &'h mut Heap,
    worklist: Vec<CellRef>,
}

impl<'h> MarkingVisitor<'h> {
    /// Creates a visitor marking into `heap`.
    pub fn new(heap: &'h mut Heap) -> Self {
        Self {
            heap,
            worklist: Vec::new(),
        }
    }

    /// Traces every cell appended so far, and everything those reach.
    pub fn drain(&mut self) {
        while let Some(cell) = self.worklist.pop() {
            for child in self.children_of(cell) {
                self.append(child);
            }
        }
    }

    fn children_of(&self, cell: CellRef) -> Vec<CellRef> {
        let mut children = Vec::new();
        match cell {
            CellRef::Shape(id) => {
                if let Some(class) = self.heap.class(id) {
                    if let crate::Prototype::Object(proto) = class.prototype {
                        children.push(proto.into());
                    }
                    children.extend(class.global_object.map(CellRef::from));
                }
            }
            CellRef::Object(id) => {
                if let Some(object) = self.heap.object(id) {
                    children.push(object.class.into());
                    match object.kind {
                        ObjectKind::GlobalProxy { target } => children.push(target.into()),
                        ObjectKind::ModuleNamespace { environment } => {
                            children.push(environment.into())
                        }
                        _ => {}
                    }
                }
            }
        }
        children
    }
}

impl SlotVisitor for MarkingVisitor<'_> {
    fn append(&mut self, cell: CellRef) {
        if self.heap.mark(cell) {
            trace!(%cell, "marked");
            self.worklist.push(cell);
        }
    }

    fn is_marked(&self, cell: CellRef) -> bool {
        self.heap.is_marked(cell)
    }

    fn heap(&self) -> &Heap {
        &*self.heap
    }
}

/// Runs a full collection: clears marks, lets `mark_roots` report the roots,
/// traces, and sweeps.
///
/// Returns the number of freed cells.
pub fn collect_garbage<F>(heap: &mut Heap, mark_roots: F) -> usize
where
    F: FnOnce(&mut MarkingVisitor<'_>),
{
    heap.begin_collection();
    {
        let mut visitor = MarkingVisitor::new(heap);
        mark_roots(&mut visitor);
        visitor.drain();
    }
    heap.sweep()
}
