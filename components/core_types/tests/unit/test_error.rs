//! Unit tests for RuntimeError and ErrorKind

use core_types::{CellRef, ErrorKind, ObjectId, RuntimeError, ShapeId};

#[cfg(test)]
mod runtime_error_tests {
    use super::*;

    #[test]
    fn test_unknown_shape_message() {
        let err = RuntimeError::UnknownShape(ShapeId(7));
        assert_eq!(err.to_string(), "unknown hidden class shape#7");
        assert_eq!(err.kind(), ErrorKind::UnknownCell);
    }

    #[test]
    fn test_unknown_object_message() {
        let err = RuntimeError::UnknownObject(ObjectId(4));
        assert_eq!(err.to_string(), "unknown object object#4");
        assert_eq!(err.kind(), ErrorKind::UnknownCell);
    }

    #[test]
    fn test_collected_message() {
        let err = RuntimeError::CellCollected(CellRef::Shape(ShapeId(1)));
        assert_eq!(err.to_string(), "shape#1 was collected");
        assert_eq!(err.kind(), ErrorKind::Collected);
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&RuntimeError::UnknownObject(ObjectId(0)));
    }
}
