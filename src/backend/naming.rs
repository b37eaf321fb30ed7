//! Identifier mangling: IDL names to exported/unexported Go identifiers.
//!
//! ## Notes
//! - All functions are pure; the only configuration is whether initialisms are corrected.
//! - A trailing `_` keeps user names apart from generated ones: `New...` collides with constructor
//!   functions, `...Args`/`...Result` with per-method helper structs. A name that already ends in
//!   the disambiguated spelling can still collide.
//!
//! ## Examples
//! ```rust
//! use idlgo::backend::naming::NameMangler;
//!
//! let names = NameMangler::default();
//! assert_eq!(names.publicize("api_key"), "APIKey");
//! assert_eq!(names.publicize("new_widget"), "NewWidget_");
//! assert_eq!(names.privatize("user_service"), "userService");
//! ```

use idlgo_core::lang::{go_keywords, initialisms};

#[derive(Debug, Clone, Copy, Default)]
pub struct NameMangler {
    ignore_initialisms: bool,
}

impl NameMangler {
    pub fn new(ignore_initialisms: bool) -> Self {
        Self { ignore_initialisms }
    }

    /// Exported Go identifier for an IDL name, keeping any `module.` qualifier.
    pub fn publicize(&self, value: &str) -> String {
        self.publicize_impl(value, None)
    }

    /// Name of a per-method helper struct (`<fn>_args` / `<fn>_result`), prefixed with the
    /// mangled owning service name.
    pub fn publicize_helper(&self, value: &str, service_name: &str) -> String {
        self.publicize_impl(value, Some(service_name))
    }

    fn publicize_impl(&self, value: &str, helper_of: Option<&str>) -> String {
        if value.is_empty() {
            return String::new();
        }

        let (prefix, local) = match value.rfind('.') {
            Some(dot) => (&value[..=dot], &value[dot + 1..]),
            None => ("", value),
        };
        if local.is_empty() {
            return prefix.to_string();
        }

        let mut chars: Vec<char> = local.chars().collect();
        chars[0] = chars[0].to_ascii_uppercase();
        let mut name = self.camelcase_chars(chars);

        let mangled_len = name.len();
        if name.starts_with("New") {
            name.push('_');
        }
        if helper_of.is_none() {
            let mangled = &name[..mangled_len];
            if mangled.ends_with("Args") || mangled.ends_with("Result") {
                name.push('_');
            }
        }

        match helper_of {
            Some(service) => format!("{prefix}{}{name}", self.publicize(service)),
            None => format!("{prefix}{name}"),
        }
    }

    /// Unexported Go identifier: lower-case first letter, then camel-case.
    pub fn privatize(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        if let Some(first) = chars.first_mut() {
            *first = first.to_ascii_lowercase();
        }
        self.camelcase_chars(chars)
    }

    /// Constructor function name (`NewFoo`), keeping any `module.` qualifier.
    pub fn new_prefix(&self, value: &str) -> String {
        match value.rfind('.') {
            Some(dot) => format!("{}New{}", &value[..=dot], self.publicize(&value[dot + 1..])),
            None => format!("New{}", self.publicize(value)),
        }
    }

    /// Remove underscores before lower-case letters, upper-casing the letter, and spell known
    /// initialisms in full caps at the start of the name and after every underscore.
    pub fn camelcase(&self, value: &str) -> String {
        self.camelcase_chars(value.chars().collect())
    }

    fn camelcase_chars(&self, mut chars: Vec<char>) -> String {
        self.fix_initialism(&mut chars, 0);
        let mut i = 1;
        while i + 1 < chars.len() {
            if chars[i] == '_' {
                if chars[i + 1].is_ascii_lowercase() {
                    let upper = chars[i + 1].to_ascii_uppercase();
                    chars.splice(i..i + 2, [upper]);
                }
                self.fix_initialism(&mut chars, i);
            }
            i += 1;
        }
        chars.into_iter().collect()
    }

    /// Upper-case the word starting at `start` (up to the next `_`) when it is an initialism.
    fn fix_initialism(&self, chars: &mut [char], start: usize) {
        if self.ignore_initialisms || start >= chars.len() {
            return;
        }
        let end = chars[start..]
            .iter()
            .position(|&c| c == '_')
            .map_or(chars.len(), |off| start + off);
        let word: String = chars[start..end].iter().map(|c| c.to_ascii_uppercase()).collect();
        if initialisms::is_initialism(&word) {
            for (slot, c) in chars[start..end].iter_mut().zip(word.chars()) {
                *slot = c;
            }
        }
    }
}

/// Go-safe spelling for a generated parameter or local name.
///
/// A name that matches a reserved word, ignoring case, becomes the lower-cased word plus a
/// fixed suffix (`type` -> `type_a1`, `Range` -> `range_a1`); anything else is returned as is.
pub fn escape_keyword(value: &str) -> String {
    if go_keywords::is_reserved(value) {
        format!("{}{}", value.to_ascii_lowercase(), go_keywords::ESCAPE_SUFFIX)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> NameMangler {
        NameMangler::default()
    }

    #[test]
    fn test_publicize_basic() {
        assert_eq!(names().publicize("user_name"), "UserName");
        assert_eq!(names().publicize("already"), "Already");
        assert_eq!(names().publicize(""), "");
    }

    #[test]
    fn test_publicize_initialisms() {
        assert_eq!(names().publicize("api_key"), "APIKey");
        assert_eq!(names().publicize("user_id"), "UserID");
        assert_eq!(names().publicize("http_url"), "HTTPURL");
        assert_eq!(names().publicize("id"), "ID");
    }

    #[test]
    fn test_publicize_ignoring_initialisms() {
        let names = NameMangler::new(true);
        assert_eq!(names.publicize("api_key"), "ApiKey");
        assert_eq!(names.publicize("user_id"), "UserId");
    }

    #[test]
    fn test_publicize_collision_suffixes() {
        assert_eq!(names().publicize("new_widget"), "NewWidget_");
        assert_eq!(names().publicize("ping_args"), "PingArgs_");
        assert_eq!(names().publicize("PingResult"), "PingResult_");
        assert_eq!(names().publicize("NewsArgs"), "NewsArgs__");
    }

    #[test]
    fn test_publicize_keeps_module_prefix() {
        assert_eq!(names().publicize("shared.shared_struct"), "shared.SharedStruct");
        assert_eq!(names().publicize("a.b.point"), "a.b.Point");
    }

    #[test]
    fn test_publicize_helper_prefixes_service() {
        assert_eq!(
            names().publicize_helper("getUser_args", "user_service"),
            "UserServiceGetUserArgs"
        );
        assert_eq!(names().publicize_helper("ping_result", "Pinger"), "PingerPingResult");
    }

    #[test]
    fn test_underscores_before_non_lowercase_survive() {
        assert_eq!(names().publicize("field_1"), "Field_1");
        assert_eq!(names().publicize("a__b"), "A_B");
        assert_eq!(names().publicize("_key3"), "_key3");
    }

    #[test]
    fn test_privatize() {
        assert_eq!(names().privatize("UserService"), "userService");
        assert_eq!(names().privatize("id_service"), "IDService");
        assert_eq!(names().privatize(""), "");
    }

    #[test]
    fn test_new_prefix() {
        assert_eq!(names().new_prefix("user"), "NewUser");
        assert_eq!(names().new_prefix("shared.point"), "shared.NewPoint");
    }

    #[test]
    fn test_escape_keyword() {
        assert_eq!(escape_keyword("type"), "type_a1");
        assert_eq!(escape_keyword("Range"), "range_a1");
        assert_eq!(escape_keyword("user"), "user");
    }
}
