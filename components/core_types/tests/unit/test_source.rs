//! Unit tests for BytecodeIndex and CodeOrigin

use core_types::{BytecodeIndex, CodeOrigin, InlineCallFrameId};

#[cfg(test)]
mod bytecode_index_tests {
    use super::*;

    #[test]
    fn test_bytecode_index_ordering() {
        let first = BytecodeIndex::new(3);
        let checkpoint = BytecodeIndex::with_checkpoint(3, 1);
        let later = BytecodeIndex::new(4);

        assert!(first < checkpoint);
        assert!(checkpoint < later);
    }

    #[test]
    fn test_bytecode_index_equality_includes_checkpoint() {
        assert_ne!(BytecodeIndex::new(3), BytecodeIndex::with_checkpoint(3, 2));
        assert_eq!(BytecodeIndex::new(3), BytecodeIndex::with_checkpoint(3, 0));
    }
}

#[cfg(test)]
mod code_origin_tests {
    use super::*;

    #[test]
    fn test_code_origin_machine_frame() {
        let origin = CodeOrigin::new(BytecodeIndex::new(12));
        assert!(origin.inline_call_frame.is_none());
        assert_eq!(origin.to_string(), "bc#12");
    }

    #[test]
    fn test_code_origin_inlined_display() {
        let origin = CodeOrigin::inlined(BytecodeIndex::with_checkpoint(5, 1), InlineCallFrameId(3));
        assert_eq!(origin.to_string(), "bc#5cp#1 in inline#3");
    }

    #[test]
    fn test_code_origins_differ_by_frame() {
        let index = BytecodeIndex::new(1);
        assert_ne!(
            CodeOrigin::inlined(index, InlineCallFrameId(1)),
            CodeOrigin::inlined(index, InlineCallFrameId(2))
        );
        assert_eq!(
            CodeOrigin::inlined(index, InlineCallFrameId(1)).without_inlining(),
            CodeOrigin::new(index)
        );
    }
}
