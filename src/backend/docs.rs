//! Doc comments for generated definitions.

use idlgo_ast::Field;

use super::go_emitter::GoEmitter;
use super::naming::NameMangler;

/// Write a definition's doc followed by a listing of its members under `heading`
/// (`Attributes` for structs, `Parameters` for functions). Writes nothing when both are empty.
pub fn emit_member_doc(e: &mut GoEmitter, names: &NameMangler, doc: Option<&str>, heading: &str, members: &[Field]) {
    let mut text = String::new();
    if let Some(doc) = doc {
        text.push_str(doc.trim_end());
        text.push('\n');
    }
    if !members.is_empty() {
        text.push_str(heading);
        text.push_str(":\n");
        for member in members {
            text.push_str(" - ");
            text.push_str(&names.publicize(&member.name));
            if let Some(doc) = &member.doc {
                text.push_str(": ");
                text.push_str(doc.trim_end());
            }
            text.push('\n');
        }
    }
    if !text.is_empty() {
        emit_doc_lines(e, &text);
    }
}

/// Doc comment that keeps leading spaces of each line (`// - Name`).
fn emit_doc_lines(e: &mut GoEmitter, text: &str) {
    for line in text.lines() {
        if line.trim().is_empty() {
            e.line("//");
        } else {
            e.line(&format!("// {}", line.trim_end()));
        }
    }
}

/// Write a plain doc comment when one is present.
pub fn emit_doc(e: &mut GoEmitter, doc: Option<&str>) {
    if let Some(doc) = doc {
        e.doc(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgo_ast::Type;

    #[test]
    fn test_attributes_listing() {
        let mut e = GoEmitter::new();
        let mut id = Field::new(1, "user_id", Type::I64);
        id.doc = Some("Primary key".to_string());
        let fields = vec![id, Field::new(2, "name", Type::String)];
        emit_member_doc(&mut e, &NameMangler::default(), Some("A user."), "Attributes", &fields);
        assert_eq!(
            e.finish(),
            "// A user.\n// Attributes:\n//  - UserID: Primary key\n//  - Name\n"
        );
    }

    #[test]
    fn test_nothing_for_empty_undocumented() {
        let mut e = GoEmitter::new();
        emit_member_doc(&mut e, &NameMangler::default(), None, "Parameters", &[]);
        assert_eq!(e.finish(), "");
    }
}
