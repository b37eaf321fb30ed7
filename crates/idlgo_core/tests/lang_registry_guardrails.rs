use std::collections::HashSet;

use idlgo_core::lang::{go_keywords, initialisms, packages};

#[test]
fn reserved_words_are_lowercase_and_unique() {
    let mut seen = HashSet::new();
    for word in go_keywords::GO_RESERVED {
        assert_eq!(*word, word.to_ascii_lowercase(), "reserved word must be lower-case: {word}");
        assert!(seen.insert(*word), "duplicate reserved word {word:?}");
    }
}

#[test]
fn escaped_reserved_words_are_no_longer_reserved() {
    for word in go_keywords::GO_RESERVED {
        let escaped = format!("{word}{}", go_keywords::ESCAPE_SUFFIX);
        assert!(!go_keywords::is_reserved(&escaped), "escaped spelling still reserved: {escaped}");
    }
}

#[test]
fn initialisms_are_uppercase_and_unique() {
    let mut seen = HashSet::new();
    for word in initialisms::COMMON_INITIALISMS {
        assert_eq!(*word, word.to_ascii_uppercase(), "initialism must be upper-case: {word}");
        assert!(!word.contains('_'), "initialism must not contain an underscore: {word}");
        assert!(seen.insert(*word), "duplicate initialism {word:?}");
        assert!(initialisms::is_initialism(word));
    }
    assert_eq!(initialisms::COMMON_INITIALISMS.len(), 35);
}

#[test]
fn system_package_identifiers_do_not_collide() {
    let mut seen = HashSet::new();
    for pkg in packages::TYPES_UNIT_PACKAGES
        .iter()
        .chain(std::iter::once(&packages::SQL_DRIVER_PACKAGE))
    {
        let ident = packages::import_identifier(pkg);
        assert!(seen.insert(ident), "types unit binds {ident} twice");
    }

    let mut remote = HashSet::new();
    for pkg in packages::REMOTE_UNIT_PACKAGES {
        let ident = packages::import_identifier(pkg);
        assert!(remote.insert(ident), "remote unit binds {ident} twice");
    }
}
