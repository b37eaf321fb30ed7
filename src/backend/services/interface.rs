//! The handler interface a server implements and a client satisfies.

use idlgo_ast::ServiceDef;

use super::{ParentRef, signature};
use crate::backend::context::GenContext;
use crate::backend::docs::{emit_doc, emit_member_doc};
use crate::backend::errors::GenResult;
use crate::backend::go_emitter::GoEmitter;

pub(super) fn emit_interface(ctx: &GenContext<'_>, e: &mut GoEmitter, def: &ServiceDef) -> GenResult<()> {
    let name = ctx.names.publicize(&def.name);
    let parent = ParentRef::of(ctx, def);
    let mut methods = Vec::with_capacity(def.functions.len());
    for function in &def.functions {
        methods.push((function, signature(ctx, function)?));
    }

    e.block(&format!("type {name} interface"), |e| {
        if let Some(parent) = &parent {
            e.line(&parent.type_ref(""));
        }
        emit_doc(e, def.doc.as_deref());
        if methods.is_empty() {
            return;
        }
        if parent.is_some() || def.doc.is_some() {
            e.blank_line();
        }
        for (function, signature) in &methods {
            emit_member_doc(e, &ctx.names, function.doc.as_deref(), "Parameters", &function.args);
            e.line(signature);
        }
    });
    e.blank_line();
    Ok(())
}
