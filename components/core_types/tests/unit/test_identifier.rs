//! Unit tests for Identifier, CacheableIdentifier and CommonIdentifiers

use core_types::{CacheableIdentifier, CellRef, CommonIdentifiers, Identifier, ObjectId, UidKind};

#[cfg(test)]
mod identifier_tests {
    use super::*;

    #[test]
    fn test_identifier_kinds() {
        assert_eq!(Identifier::new("x").kind(), UidKind::String);
        assert_eq!(Identifier::symbol("x").kind(), UidKind::Symbol);
        assert_eq!(Identifier::private_name("x").kind(), UidKind::PrivateName);
        assert!(Identifier::symbol("iterator").is_symbol());
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::new("length").to_string(), "length");
        assert_eq!(Identifier::symbol("Symbol.iterator").to_string(), "Symbol(Symbol.iterator)");
        assert_eq!(Identifier::private_name("secret").to_string(), "#secret");
    }

    #[test]
    fn test_private_names_are_not_indices() {
        assert_eq!(Identifier::private_name("3").parse_index(), None);
        assert_eq!(Identifier::new("3").parse_index(), Some(3));
    }
}

#[cfg(test)]
mod cacheable_identifier_tests {
    use super::*;

    #[test]
    fn test_from_cell_reports_owner() {
        let id = CacheableIdentifier::from_cell(ObjectId(9), Identifier::symbol("tag"));
        assert_eq!(id.cell(), Some(CellRef::Object(ObjectId(9))));
        assert_eq!(id.uid(), &Identifier::symbol("tag"));
    }

    #[test]
    fn test_compares_with_plain_identifier() {
        let id: CacheableIdentifier = Identifier::new("x").into();
        assert!(id == Identifier::new("x"));
        assert!(id != Identifier::new("y"));
    }
}

#[cfg(test)]
mod common_identifiers_tests {
    use super::*;

    #[test]
    fn test_common_identifiers() {
        let names = CommonIdentifiers::default();
        assert_eq!(names.length, Identifier::new("length"));
        assert_eq!(names.next.name(), "next");
        assert_eq!(names.done.name(), "done");
        assert_eq!(names.value.name(), "value");
        assert_eq!(names.prototype.name(), "prototype");
        assert!(names.has_instance.is_symbol());
        assert_eq!(names.has_instance.name(), "Symbol.hasInstance");
    }
}
