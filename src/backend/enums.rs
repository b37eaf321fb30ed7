//! Enum emission: an `int64` named type, one constant per value, and the text/SQL adapters.
//!
//! ## Notes
//! - `String()` never rejects an out-of-domain value; it renders `<UNSET>`.
//! - Values sharing a number keep their own constants, but only the first one is named by
//!   `String()`.

use std::collections::HashSet;

use idlgo_ast::EnumDef;
use idlgo_core::lang::runtime::UNSET_SENTINEL;
use idlgo_core::strings::escape_go_string;

use super::context::GenContext;
use super::docs::emit_doc;
use super::go_emitter::{GoEmitter, goln};

#[tracing::instrument(skip_all, fields(name = %def.name))]
pub fn emit_enum(ctx: &GenContext<'_>, e: &mut GoEmitter, def: &EnumDef) {
    let name = ctx.names.publicize(&def.name);
    let constant = |value: &str| format!("{name}_{value}");

    emit_doc(e, def.doc.as_deref());
    goln!(e, "type {name} int64");
    e.group("const", |e| {
        for value in &def.values {
            emit_doc(e, value.doc.as_deref());
            goln!(e, "{} {name} = {}", constant(&value.name), value.value);
        }
    });
    e.blank_line();

    e.block(&format!("func (p {name}) String() string"), |e| {
        e.switch("switch p", |e| {
            let mut seen = HashSet::new();
            for value in def.values.iter().filter(|v| seen.insert(v.value)) {
                e.case(&constant(&value.name), |e| {
                    goln!(e, "return \"{}\"", escape_go_string(&value.name));
                });
            }
        });
        goln!(e, "return \"{UNSET_SENTINEL}\"");
    });
    e.blank_line();

    e.block(&format!("func {name}FromString(s string) ({name}, error)"), |e| {
        e.switch("switch s", |e| {
            for value in &def.values {
                e.case(&format!("\"{}\"", escape_go_string(&value.name)), |e| {
                    goln!(e, "return {}, nil", constant(&value.name));
                });
            }
        });
        goln!(e, "return {name}(0), fmt.Errorf(\"not a valid {name} string\")");
    });
    e.blank_line();

    goln!(e, "func {name}Ptr(v {name}) *{name} {{ return &v }}");
    e.blank_line();

    e.block(&format!("func (p {name}) MarshalText() ([]byte, error)"), |e| {
        e.line("return []byte(p.String()), nil");
    });
    e.blank_line();

    e.block(&format!("func (p *{name}) UnmarshalText(text []byte) error"), |e| {
        goln!(e, "q, err := {name}FromString(string(text))");
        e.block("if err != nil", |e| e.line("return err"));
        e.line("*p = q");
        e.line("return nil");
    });
    e.blank_line();

    e.block(&format!("func (p *{name}) Scan(value interface{{}}) error"), |e| {
        e.line("v, ok := value.(int64)");
        e.block("if !ok", |e| e.line("return errors.New(\"Scan value is not int64\")"));
        goln!(e, "*p = {name}(v)");
        e.line("return nil");
    });
    e.blank_line();

    e.block(&format!("func (p *{name}) Value() (driver.Value, error)"), |e| {
        e.block("if p == nil", |e| e.line("return nil, nil"));
        e.line("return int64(*p), nil");
    });
    e.blank_line();
    tracing::debug!(values = def.values.len(), "emitted enum");
}
