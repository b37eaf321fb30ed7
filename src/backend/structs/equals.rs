//! Structural equality: the `Equals` method and the element comparisons shared with the set
//! uniqueness check.
//!
//! Sequences compare by position, sets included; two sets holding the same elements in a
//! different order are not equal.

use idlgo_ast::Type;

use super::plan::StructPlan;
use crate::backend::context::GenContext;
use crate::backend::errors::{GenResult, GenerateError};
use crate::backend::go_emitter::{GoEmitter, goln};

pub const EQUALS_METHOD: &str = "Equals";

pub(super) fn emit_equals(ctx: &mut GenContext<'_>, e: &mut GoEmitter, plan: &StructPlan<'_>) -> GenResult<()> {
    let name = &plan.go_name;
    e.block(&format!("func (p *{name}) {EQUALS_METHOD}(other *{name}) bool"), |e| -> GenResult<()> {
        e.line("if p == other {");
        e.indented(|e| e.line("return true"));
        e.line("} else if p == nil || other == nil {");
        e.indented(|e| e.line("return false"));
        e.line("}");
        for field in plan.sorted() {
            let tgt = format!("p.{}", field.go_name);
            let src = format!("other.{}", field.go_name);
            if field.derefs() {
                e.block(&format!("if {tgt} != {src}"), |e| -> GenResult<()> {
                    e.block(&format!("if {tgt} == nil || {src} == nil"), |e| e.line("return false"));
                    emit_value_equals(ctx, e, &field.field.ty, &format!("(*{tgt})"), &format!("(*{src})"))
                })?;
            } else {
                emit_value_equals(ctx, e, &field.field.ty, &tgt, &src)?;
            }
        }
        e.line("return true");
        Ok(())
    })?;
    e.blank_line();
    Ok(())
}

/// Write statements that `return false` unless `tgt` and `src` are equal values of `ty`.
pub(super) fn emit_value_equals(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    ty: &Type,
    tgt: &str,
    src: &str,
) -> GenResult<()> {
    let schema = ctx.schema;
    match schema.true_type(ty) {
        Type::Struct(_) => {
            e.block(&format!("if !{tgt}.{EQUALS_METHOD}({src})"), |e| e.line("return false"));
        }
        Type::Binary => {
            e.block(&format!("if bytes.Compare({tgt}, {src}) != 0"), |e| e.line("return false"));
        }
        Type::Bool
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Double
        | Type::String
        | Type::Enum(_) => {
            e.block(&format!("if {tgt} != {src}"), |e| e.line("return false"));
        }
        Type::Map(_, val_ty) => {
            e.block(&format!("if len({tgt}) != len({src})"), |e| e.line("return false"));
            e.block(&format!("for k, _tgt := range {tgt}"), |e| -> GenResult<()> {
                let element = ctx.tmp("_src");
                goln!(e, "{element} := {src}[k]");
                emit_value_equals(ctx, e, val_ty, "_tgt", &element)
            })?;
        }
        Type::List(elem_ty) | Type::Set(elem_ty) => {
            e.block(&format!("if len({tgt}) != len({src})"), |e| e.line("return false"));
            e.block(&format!("for i, _tgt := range {tgt}"), |e| -> GenResult<()> {
                let element = ctx.tmp("_src");
                goln!(e, "{element} := {src}[i]");
                emit_value_equals(ctx, e, elem_ty, "_tgt", &element)
            })?;
        }
        Type::Void | Type::Typedef(_) => {
            return Err(GenerateError::UnsupportedType {
                ty: schema.display_type(ty),
                context: "an equality comparison".to_string(),
            });
        }
    }
    Ok(())
}
