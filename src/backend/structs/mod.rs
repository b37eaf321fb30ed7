//! Struct, union and exception emission.
//!
//! Every member's pointer/default/presence decisions are made once in [`StructPlan`] and read by
//! each emission site (declaration, getters, codec, equality).
//!
//! ## Notes
//! - Declaration order drives the doc listing, constructor, getters, `IsSet` and the reader's
//!   switch cases; wire-id order drives the member list, the writer and `Equals`.
//! - Per-method helper structs (`<fn>_args`, `<fn>_result`) skip `Equals`.

mod definition;
mod equals;
mod plan;
mod reader;
pub mod tags;
mod writer;

use idlgo_ast::StructDef;

use super::context::GenContext;
use super::errors::GenResult;
use super::go_emitter::GoEmitter;

pub use plan::{FieldPlan, StructPlan, StructRole};

/// Write the full Go surface of one struct.
#[tracing::instrument(skip_all, fields(name = %def.name))]
pub fn emit_struct(ctx: &mut GenContext<'_>, e: &mut GoEmitter, def: &StructDef, role: StructRole<'_>) -> GenResult<()> {
    let plan = StructPlan::build(ctx, def, role)?;
    definition::emit_definition(ctx, e, &plan);
    reader::emit_reader(ctx, e, &plan)?;
    writer::emit_writer(ctx, e, &plan)?;
    if !role.is_helper() {
        equals::emit_equals(ctx, e, &plan)?;
    }
    definition::emit_display(e, &plan);
    tracing::debug!(go_name = %plan.go_name, fields = plan.fields.len(), "emitted struct");
    Ok(())
}
