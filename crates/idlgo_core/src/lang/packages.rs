//! Go standard-library packages the generated units import unconditionally.
//!
//! These identifiers are claimed in the alias table before any included module, so a user module
//! whose last path segment is `fmt` or `errors` gets a suffixed alias instead of shadowing them.

/// Standard packages imported by the types and constants units, in emission order.
pub const TYPES_UNIT_PACKAGES: &[&str] = &["bytes", "context", "errors", "fmt", "time"];

/// Extra package the types unit imports when the program declares enums (for `Value()`).
pub const SQL_DRIVER_PACKAGE: &str = "database/sql/driver";

/// Standard packages imported by a remote command-line unit, in emission order.
pub const REMOTE_UNIT_PACKAGES: &[&str] = &[
    "context", "flag", "fmt", "math", "net", "net/url", "os", "strconv", "strings",
];

/// Identifier a Go import path binds when imported without an alias.
///
/// ## Notes
/// - A renamed import (`thrift "github.com/..."`) binds the name before the space.
///
/// ## Examples
/// ```rust
/// use idlgo_core::lang::packages::import_identifier;
///
/// assert_eq!(import_identifier("net/url"), "url");
/// assert_eq!(import_identifier("thrift \"github.com/apache/thrift/lib/go/thrift\""), "thrift");
/// ```
pub fn import_identifier(import: &str) -> &str {
    if let Some((name, _)) = import.split_once(' ') {
        return name;
    }
    match import.rfind('/') {
        Some(pos) => &import[pos + 1..],
        None => import,
    }
}
