//! Core types shared by the property-access feedback components.
//!
//! This crate provides the small vocabulary every other component speaks:
//! property identifiers, handles to heap cells, property storage offsets,
//! bytecode locations and exit-site flags.
//!
//! # Overview
//!
//! - [`Identifier`] - Uniqued property key (string, symbol or private name)
//! - [`CacheableIdentifier`] - Identifier plus the heap cell that owns it
//! - [`ShapeId`] / [`ObjectId`] / [`CellRef`] - Handles to heap cells
//! - [`PropertyOffset`] - Storage slot of a property, or the invalid sentinel
//! - [`BytecodeIndex`] / [`CodeOrigin`] - Where in the bytecode a site lives
//! - [`ExitFlag`] / [`ExitKind`] - Deoptimization exit history
//! - [`RuntimeError`] - Errors for lookups that must not fail
//!
//! # Examples
//!
//! ```
//! use core_types::{Identifier, PropertyOffset};
//!
//! let name = Identifier::new("x");
//! assert_eq!(name.parse_index(), None);
//! assert_eq!(Identifier::new("12").parse_index(), Some(12));
//!
//! assert!(PropertyOffset::new(3).is_valid());
//! assert!(!PropertyOffset::INVALID.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod cell;
mod error;
mod identifier;
mod offset;
mod profile;
mod source;

pub use cell::{CellRef, ObjectId, ShapeId};
pub use error::{ErrorKind, RuntimeError};
pub use identifier::{CacheableIdentifier, CommonIdentifiers, Identifier, UidKind};
pub use offset::{PropertyOffset, ScopeOffset};
pub use profile::{ExitFlag, ExitKind};
pub use source::{BytecodeIndex, CodeOrigin, InlineCallFrameId};
