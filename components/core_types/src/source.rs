//! Bytecode locations.
//!
//! A [`BytecodeIndex`] names one instruction plus the checkpoint inside it
//! (instructions such as `iterator_next` perform several property reads).
//! A [`CodeOrigin`] adds the inlined call frame the instruction was compiled
//! into, if any.

use std::fmt;

/// Position of an instruction and a checkpoint within it.
///
/// # Examples
///
/// ```
/// use core_types::BytecodeIndex;
///
/// let index = BytecodeIndex::with_checkpoint(10, 2);
/// assert_eq!(index.offset, 10);
/// assert_eq!(index.checkpoint, 2);
/// assert_eq!(BytecodeIndex::new(10).checkpoint, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BytecodeIndex {
    /// Instruction offset within its chunk
    pub offset: u32,
    /// Checkpoint inside a multi-step instruction
    pub checkpoint: u8,
}

impl BytecodeIndex {
    /// Index of an instruction at checkpoint zero.
    pub fn new(offset: u32) -> Self {
        Self {
            offset,
            checkpoint: 0,
        }
    }

    /// Index of a specific checkpoint of an instruction.
    pub fn with_checkpoint(offset: u32, checkpoint: u8) -> Self {
        Self { offset, checkpoint }
    }
}

impl fmt::Display for BytecodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.checkpoint == 0 {
            write!(f, "bc#{}", self.offset)
        } else {
            write!(f, "bc#{}cp#{}", self.offset, self.checkpoint)
        }
    }
}

/// Identifies a call frame that was inlined into optimized code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InlineCallFrameId(pub u32);

/// A bytecode location together with the inlined frame it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeOrigin {
    /// Location in the profiled chunk
    pub bytecode_index: BytecodeIndex,
    /// Inlined frame, or `None` for the machine frame itself
    pub inline_call_frame: Option<InlineCallFrameId>,
}

impl CodeOrigin {
    /// An origin in the machine frame.
    pub fn new(bytecode_index: BytecodeIndex) -> Self {
        Self {
            bytecode_index,
            inline_call_frame: None,
        }
    }

    /// An origin inside an inlined frame.
    pub fn inlined(bytecode_index: BytecodeIndex, frame: InlineCallFrameId) -> Self {
        Self {
            bytecode_index,
            inline_call_frame: Some(frame),
        }
    }

    /// The same location with the inlining information stripped.
    pub fn without_inlining(self) -> Self {
        Self::new(self.bytecode_index)
    }
}

impl fmt::Display for CodeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inline_call_frame {
            Some(frame) => write!(f, "{} in inline#{}", self.bytecode_index, frame.0),
            None => self.bytecode_index.fmt(f),
        }
    }
}
