//! Go struct tags for generated members.
//!
//! ## Notes
//! - Computed keys are `db` and `json`; a `go.tag` annotation is parsed and merged over them.
//! - Keys render in lexical order after the leading `thrift` key.

use std::collections::BTreeMap;

use idlgo_ast::Field;
use idlgo_core::strings::escape_go_string;

/// Field annotation carrying raw user struct tags (`json:"id" xml:"Id"`).
pub const GO_TAG_ANNOTATION: &str = "go.tag";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Key,
    Value,
    Whitespace,
}

/// Parse `key:"value"` pairs into `tags`, overriding existing keys.
///
/// The character after each `:` is taken to be the opening quote and skipped; a value ends at
/// the next `"`. Spaces between pairs are ignored. An unterminated trailing pair is dropped.
pub fn parse_go_tags(tags: &mut BTreeMap<String, String>, input: &str) {
    let mut key = String::new();
    let mut value = String::new();
    let mut mode = if input.starts_with(' ') { Mode::Whitespace } else { Mode::Key };

    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if mode == Mode::Whitespace {
            if c == ' ' {
                continue;
            }
            mode = Mode::Key;
        }
        match mode {
            Mode::Key if c == ':' => {
                chars.next();
                mode = Mode::Value;
            }
            Mode::Key => key.push(c),
            Mode::Value if c == '"' => {
                tags.insert(std::mem::take(&mut key), std::mem::take(&mut value));
                mode = Mode::Whitespace;
            }
            Mode::Value => value.push(c),
            Mode::Whitespace => {}
        }
    }
}

/// Full backquoted tag of a member: `thrift:"name,id[,required]" db:"name" json:"name[,omitempty]"`.
pub fn field_tags(field: &Field) -> String {
    let name = escape_go_string(&field.name);
    let mut tags = BTreeMap::new();
    tags.insert("db".to_string(), name.clone());
    let json = if field.is_optional() && field.default.is_none() {
        format!("{name},omitempty")
    } else {
        name.clone()
    };
    tags.insert("json".to_string(), json);
    if let Some(raw) = field.annotation(GO_TAG_ANNOTATION) {
        parse_go_tags(&mut tags, raw);
    }

    let mut out = format!("thrift:\"{name},{}", field.id);
    if field.is_required() {
        out.push_str(",required");
    }
    out.push('"');
    for (key, value) in &tags {
        out.push_str(&format!(" {key}:\"{value}\""));
    }
    format!("`{out}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgo_ast::{ConstValue, Requiredness, Type};

    #[test]
    fn test_parse_pairs() {
        let mut tags = BTreeMap::new();
        parse_go_tags(&mut tags, r#"json:"user_id" xml:"UserId""#);
        assert_eq!(tags.get("json").map(String::as_str), Some("user_id"));
        assert_eq!(tags.get("xml").map(String::as_str), Some("UserId"));
    }

    #[test]
    fn test_parse_leading_space_and_override() {
        let mut tags = BTreeMap::new();
        tags.insert("db".to_string(), "old".to_string());
        parse_go_tags(&mut tags, r#"  db:"new""#);
        assert_eq!(tags.get("db").map(String::as_str), Some("new"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_parse_drops_unterminated_pair() {
        let mut tags = BTreeMap::new();
        parse_go_tags(&mut tags, r#"a:"1" b:"2"#);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_required_field_tags() {
        let field = Field::new(3, "user_id", Type::I64).with_requiredness(Requiredness::Required);
        assert_eq!(
            field_tags(&field),
            r#"`thrift:"user_id,3,required" db:"user_id" json:"user_id"`"#
        );
    }

    #[test]
    fn test_optional_without_default_is_omitempty() {
        let optional = Field::new(1, "nick", Type::String).with_requiredness(Requiredness::Optional);
        assert!(field_tags(&optional).contains(r#"json:"nick,omitempty""#));

        let defaulted = optional.with_default(ConstValue::String("x".into()));
        assert!(field_tags(&defaulted).contains(r#"json:"nick""#));
    }

    #[test]
    fn test_annotation_merges_in_order() {
        let mut field = Field::new(1, "name", Type::String);
        field
            .annotations
            .insert(GO_TAG_ANNOTATION.to_string(), r#"json:"n" yaml:"n""#.to_string());
        assert_eq!(
            field_tags(&field),
            r#"`thrift:"name,1" db:"name" json:"n" yaml:"n"`"#
        );
    }
}
