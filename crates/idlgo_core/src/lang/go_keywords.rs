//! Go reserved words (for generated parameter and local identifier escaping).
//!
//! ## Notes
//! - Matching is case-insensitive: a name that lower-cases to a reserved word is escaped.
//! - `error` is a predeclared identifier rather than a keyword, but shadowing it in generated
//!   signatures breaks the `_err error` result, so it is treated as reserved.

/// Words that cannot be used as generated parameter names.
pub const GO_RESERVED: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "error",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Suffix appended to a lower-cased reserved word to make it a usable identifier.
pub const ESCAPE_SUFFIX: &str = "_a1";

/// Check whether `name` collides with a reserved word, ignoring case.
///
/// ## Examples
/// ```rust
/// use idlgo_core::lang::go_keywords::is_reserved;
///
/// assert!(is_reserved("range"));
/// assert!(is_reserved("Func"));
/// assert!(!is_reserved("user"));
/// ```
pub fn is_reserved(name: &str) -> bool {
    GO_RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(name))
}
