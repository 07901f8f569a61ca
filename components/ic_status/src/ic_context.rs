//! Inline-cache status contexts for inlined code
//!
//! When the optimizing tier compiles a function, it may inline callees and
//! may already have optimized code for some of the frames involved. Each
//! frame on the inline stack contributes an [`ICStatusContext`]: the
//! optimized code block whose stubs profiled it, and statuses computed
//! earlier for it.

use std::collections::HashMap;
use std::sync::Arc;

use core_types::{CodeOrigin, InlineCallFrameId};

use crate::code_block::CodeBlock;
use crate::get_by_status::GetByStatus;
use crate::stub_info::StubInfoId;

/// Feedback known for one code origin
#[derive(Debug, Clone, Default)]
pub struct ICStatus {
    /// Stub record in the context's code block
    pub stub_info: Option<StubInfoId>,
    /// Status computed by an earlier compilation
    pub get_status: Option<Box<GetByStatus>>,
}

/// Feedback of a code block, keyed by origin
pub type ICStatusMap = HashMap<CodeOrigin, ICStatus>;

/// Feedback contributed by one frame of the inline stack
#[derive(Debug)]
pub struct ICStatusContext {
    /// Optimized code whose stubs profiled this frame
    pub optimized_code_block: Arc<CodeBlock>,
    /// The frame, or `None` for the machine frame
    pub inline_call_frame: Option<InlineCallFrameId>,
    /// Feedback by origin
    pub map: ICStatusMap,
}

impl ICStatusContext {
    /// Create a context with no feedback yet
    pub fn new(
        optimized_code_block: Arc<CodeBlock>,
        inline_call_frame: Option<InlineCallFrameId>,
    ) -> Self {
        Self {
            optimized_code_block,
            inline_call_frame,
            map: ICStatusMap::new(),
        }
    }

    /// Feedback for `origin`
    pub fn get(&self, origin: CodeOrigin) -> Option<&ICStatus> {
        self.map.get(&origin)
    }

    /// Whether `origin` was inlined into this context's frame, as opposed
    /// to being the frame itself
    pub fn is_inlined(&self, origin: CodeOrigin) -> bool {
        origin.inline_call_frame.is_some() && origin.inline_call_frame != self.inline_call_frame
    }

    /// Point `origin` at a stub of the optimized code block
    pub fn record_stub_info(&mut self, origin: CodeOrigin, stub_info: StubInfoId) {
        self.map.entry(origin).or_default().stub_info = Some(stub_info);
    }

    /// Remember a status computed for `origin`
    pub fn record_get_status(&mut self, origin: CodeOrigin, status: GetByStatus) {
        self.map.entry(origin).or_default().get_status = Some(Box::new(status));
    }
}

/// Contexts from the innermost inlined frame outwards
pub type ICStatusContextStack = Vec<ICStatusContext>;
