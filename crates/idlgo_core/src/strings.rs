//! Pure string helpers shared by the naming and literal-rendering code.

/// Escape text for use inside a Go interpreted string literal.
///
/// ## Examples
/// ```rust
/// use idlgo_core::strings::escape_go_string;
///
/// assert_eq!(escape_go_string("a\"b\n"), "a\\\"b\\n");
/// ```
pub fn escape_go_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Convert a `CamelCase` name into `snake_case` by splitting before every upper-case letter.
///
/// ## Notes
/// - Runs of capitals split letter by letter (`HTTPServer` -> `h_t_t_p_server`); unit file names
///   depend on this exact spelling.
///
/// ## Examples
/// ```rust
/// use idlgo_core::strings::underscore;
///
/// assert_eq!(underscore("UserService"), "user_service");
/// ```
pub fn underscore(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for (i, c) in value.chars().enumerate() {
        if i == 0 {
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash_and_tab() {
        assert_eq!(escape_go_string("a\\b\tc"), "a\\\\b\\tc");
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape_go_string("plain"), "plain");
    }

    #[test]
    fn test_underscore_single_word() {
        assert_eq!(underscore("Calculator"), "calculator");
        assert_eq!(underscore("HTTPServer"), "h_t_t_p_server");
        assert_eq!(underscore(""), "");
    }
}
