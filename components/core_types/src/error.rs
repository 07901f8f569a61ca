//! Error types for lookups that are expected to succeed.
//!
//! Feedback summarization itself never fails: missing or contradictory
//! information is folded into the status state. These errors cover the
//! plumbing around it, such as resolving a cell handle that the heap never
//! allocated or has already swept.

use thiserror::Error;

use crate::{CellRef, ObjectId, ShapeId};

/// The category of a [`RuntimeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A handle that was never issued by the heap
    UnknownCell,
    /// A handle whose cell was swept by the collector
    Collected,
}

/// An error raised while resolving heap handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// No hidden class was ever registered under this id
    #[error("unknown hidden class {0}")]
    UnknownShape(ShapeId),
    /// No object was ever allocated under this id
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    /// The cell existed but did not survive the last collection
    #[error("{0} was collected")]
    CellCollected(CellRef),
}

impl RuntimeError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UnknownShape(_) | RuntimeError::UnknownObject(_) => {
                ErrorKind::UnknownCell
            }
            RuntimeError::CellCollected(_) => ErrorKind::Collected,
        }
    }
}
