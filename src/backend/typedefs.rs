//! Typedef emission: a named Go type plus its pointer helper.

use idlgo_ast::{Type, TypedefDef};

use super::context::GenContext;
use super::docs::emit_doc;
use super::errors::GenResult;
use super::go_emitter::{GoEmitter, goln};

/// Write `type T Base` and `func TPtr(v T) *T`.
///
/// A typedef of a struct becomes an alias (`type T = Base`) so it shares the struct's methods;
/// one whose spelling equals its target emits nothing.
pub fn emit_typedef(ctx: &GenContext<'_>, e: &mut GoEmitter, def: &TypedefDef) -> GenResult<()> {
    let name = ctx.names.publicize(&def.name);
    let is_struct = matches!(ctx.schema.true_type(&def.target), Type::Struct(_));
    let base = if is_struct {
        ctx.type_name(ctx.schema.true_type(&def.target))
    } else {
        ctx.go_type(&def.target, false)?
    };
    if base == name {
        return Ok(());
    }

    emit_doc(e, def.doc.as_deref());
    if is_struct {
        goln!(e, "type {name} = {base}");
    } else {
        goln!(e, "type {name} {base}");
    }
    e.blank_line();
    goln!(e, "func {name}Ptr(v {name}) *{name} {{ return &v }}");
    e.blank_line();
    tracing::debug!(typedef = %def.name, "emitted typedef");
    Ok(())
}
