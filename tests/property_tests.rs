//! Property-based tests for idlgo
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use idlgo::backend::naming::{NameMangler, escape_keyword};
use idlgo::backend::{GeneratorOptions, GoGenerator};
use idlgo_core::lang::go_keywords;
use proptest::prelude::*;

/// IDL-style identifiers: a letter, then letters, digits and underscores.
fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,16}"
}

// =============================================================================
// Name mangling properties
// =============================================================================

#[cfg(test)]
mod naming_tests {
    use super::*;

    proptest! {
        /// Property: exported names start with an upper-case letter
        #[test]
        fn publicize_is_exported(name in identifier()) {
            let out = NameMangler::default().publicize(&name);
            prop_assert!(out.chars().next().is_some_and(|c| c.is_ascii_uppercase()), "{name} -> {out}");
        }

        /// Property: unexported names start with a lower-case letter
        #[test]
        fn privatize_is_unexported(name in identifier()) {
            let out = NameMangler::new(true).privatize(&name);
            prop_assert!(out.chars().next().is_some_and(|c| c.is_ascii_lowercase()), "{name} -> {out}");
        }

        /// Property: no underscore is left in front of a lower-case letter
        #[test]
        fn camelcase_consumes_underscores(name in identifier()) {
            let out = NameMangler::default().publicize(&name);
            let chars: Vec<char> = out.chars().collect();
            for pair in chars.windows(2) {
                prop_assert!(!(pair[0] == '_' && pair[1].is_ascii_lowercase()), "{name} -> {out}");
            }
        }

        /// Property: a module qualifier survives mangling untouched
        #[test]
        fn qualifier_is_preserved(module in "[a-z]{1,8}", name in identifier()) {
            let out = NameMangler::default().publicize(&format!("{module}.{name}"));
            let prefix = format!("{module}.");
            prop_assert!(out.starts_with(&prefix));
        }

        /// Property: mangling a generated constructor-like name always disambiguates it
        #[test]
        fn new_prefixed_names_get_suffix(rest in "[a-z]{0,8}") {
            let out = NameMangler::default().publicize(&format!("new{rest}"));
            prop_assert!(out.ends_with('_'));
        }

        /// Property: escaped parameter names are never reserved, and escaping is stable
        #[test]
        fn escape_keyword_yields_usable_name(name in identifier()) {
            let once = escape_keyword(&name);
            prop_assert!(!go_keywords::is_reserved(&once));
            prop_assert_eq!(escape_keyword(&once), once.clone());
        }
    }

    #[test]
    fn every_reserved_word_is_escaped() {
        for kw in go_keywords::GO_RESERVED {
            assert_eq!(escape_keyword(kw), format!("{kw}_a1"));
        }
    }
}

// =============================================================================
// Generation properties
// =============================================================================

#[cfg(test)]
mod generation_tests {
    use super::*;

    const SCALARS: &[&str] = &["bool", "byte", "i16", "i32", "i64", "double", "string", "binary"];

    /// A one-struct document with distinct member names and ids.
    fn document() -> impl Strategy<Value = String> {
        prop::collection::btree_map("[a-z][a-z0-9]{0,8}", (0..SCALARS.len(), 1i32..40, any::<bool>()), 1..6).prop_map(
            |members| {
                let fields: Vec<String> = members
                    .iter()
                    .enumerate()
                    .map(|(i, (name, (ty, id, optional)))| {
                        format!(
                            r#"{{"id": {}, "name": "{name}", "type": "{}", "required": "{}"}}"#,
                            id * 10 + i as i32,
                            SCALARS[*ty],
                            if *optional { "optional" } else { "default" }
                        )
                    })
                    .collect();
                format!(
                    r#"{{"programs": [{{"name": "gen", "structs": [{{"name": "Sample", "fields": [{}]}}]}}]}}"#,
                    fields.join(", ")
                )
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: every loadable struct renders, and every member gets a getter
        #[test]
        fn structs_always_render(doc in document()) {
            let schema = idlgo_ast::load_str(&doc).expect("generated document loads");
            let options = GeneratorOptions::default();
            let package = GoGenerator::new(&schema, &options).generate_main().expect("generation succeeds");
            let types = &package.file("gen.go").expect("types unit").contents;
            let def = schema.struct_def(schema.program(schema.main_program().expect("main")).structs[0]);
            let names = NameMangler::default();
            for field in def.fields() {
                let getter = format!("func (p *Sample) Get{}() ", names.publicize(&field.name));
                prop_assert!(types.contains(&getter), "missing {getter}");
            }
        }

        /// Property: generation is deterministic
        #[test]
        fn generation_is_deterministic(doc in document()) {
            let schema = idlgo_ast::load_str(&doc).expect("generated document loads");
            let options = GeneratorOptions::default();
            let generator = GoGenerator::new(&schema, &options);
            let first = generator.generate_main().expect("first run");
            let second = generator.generate_main().expect("second run");
            prop_assert_eq!(first.files, second.files);
        }
    }
}
