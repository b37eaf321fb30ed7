//! Struct type declaration and its presence surface: constructor, default holders, getters,
//! `CountSetFields` and `IsSet` helpers, plus `String` and the exception methods.

use idlgo_ast::StructDef;

use super::plan::{FieldPlan, StructPlan};
use super::tags::field_tags;
use crate::backend::context::GenContext;
use crate::backend::docs::emit_member_doc;
use crate::backend::errors::GenResult;
use crate::backend::go_emitter::{GoEmitter, goln};
use crate::backend::types::{is_pointer_field, omit_initialization};

pub(super) fn emit_definition(ctx: &GenContext<'_>, e: &mut GoEmitter, plan: &StructPlan<'_>) {
    emit_member_doc(e, &ctx.names, plan.def.doc.as_deref(), "Attributes", plan.def.fields());
    e.block(&format!("type {} struct", plan.go_name), |e| emit_members(e, plan));
    e.blank_line();

    emit_constructor(e, plan);
    for field in &plan.fields {
        emit_getter(e, plan, field);
    }
    if plan.has_count_set_fields() {
        emit_count_set_fields(e, plan);
    }
    for field in plan.fields.iter().filter(|f| f.has_presence()) {
        emit_isset(e, plan, field);
    }
}

/// Members in wire-id order, annotating holes in the id sequence that starts at 1.
fn emit_members(e: &mut GoEmitter, plan: &StructPlan<'_>) {
    let mut expected: i64 = 0;
    for field in plan.sorted() {
        let id = i64::from(field.field.id);
        if id >= 0 {
            let first = expected.max(1);
            let last = id - 1;
            if first < last {
                goln!(e, "// unused fields # {first} to {last}");
            } else if first == last {
                goln!(e, "// unused field # {first}");
            }
            expected = id + 1;
        }
        goln!(e, "{} {} {}", field.go_name, field.target_type, field_tags(field.field));
    }
}

fn emit_constructor(e: &mut GoEmitter, plan: &StructPlan<'_>) {
    let inits: Vec<String> = plan
        .fields
        .iter()
        .filter(|f| !f.is_pointer && !f.is_omittable)
        .filter_map(|f| f.default_literal.as_ref().map(|lit| format!("{}: {},", f.go_name, nest(lit))))
        .collect();
    e.block(&format!("func New{name}() *{name}", name = plan.go_name), |e| {
        e.line(&composite(&format!("return &{}", plan.go_name), &inits));
    });
    e.blank_line();
}

fn emit_getter(e: &mut GoEmitter, plan: &StructPlan<'_>, field: &FieldPlan<'_>) {
    let recv = &plan.go_name;
    if field.has_presence() {
        match &field.default_literal {
            Some(lit) => goln!(e, "var {} {} = {lit}", field.default_var, field.value_type),
            None => goln!(e, "var {} {}", field.default_var, field.value_type),
        }
    }
    let header = format!("func (p *{recv}) Get{}() {}", field.go_name, field.value_type);
    if field.is_pointer {
        e.block(&header, |e| {
            e.block(&format!("if !p.IsSet{}()", field.go_name), |e| {
                goln!(e, "return {}", field.default_var);
            });
            let deref = if field.derefs() { "*" } else { "" };
            goln!(e, "return {deref}p.{}", field.go_name);
        });
    } else {
        e.block(&header, |e| goln!(e, "return p.{}", field.go_name));
    }
    e.blank_line();
}

fn emit_count_set_fields(e: &mut GoEmitter, plan: &StructPlan<'_>) {
    let header = format!("func (p *{}) {}() int", plan.go_name, plan.count_set_fields_fn());
    e.block(&header, |e| {
        e.line("count := 0");
        for field in plan.fields.iter().filter(|f| !f.field.is_required() && f.is_setable()) {
            e.block(&format!("if p.IsSet{}()", field.go_name), |e| e.line("count++"));
        }
        e.line("return count");
    });
    e.blank_line();
}

fn emit_isset(e: &mut GoEmitter, plan: &StructPlan<'_>, field: &FieldPlan<'_>) {
    let header = format!("func (p *{}) IsSet{}() bool", plan.go_name, field.go_name);
    let name = &field.go_name;
    e.block(&header, |e| {
        let nil_only = field.is_nilable || (field.is_binary && !field.has_default);
        if field.is_pointer || nil_only {
            goln!(e, "return p.{name} != nil");
        } else if field.is_binary {
            goln!(e, "return !bytes.Equal(p.{name}, {})", field.default_var);
        } else {
            goln!(e, "return p.{name} != {}", field.default_var);
        }
    });
    e.blank_line();
}

pub(super) fn emit_display(e: &mut GoEmitter, plan: &StructPlan<'_>) {
    let name = &plan.go_name;
    e.block(&format!("func (p *{name}) String() string"), |e| {
        e.block("if p == nil", |e| e.line("return \"<nil>\""));
        goln!(e, "return fmt.Sprintf(\"{name}(%+v)\", *p)");
    });
    e.blank_line();

    if plan.def.is_exception() {
        e.block(&format!("func (p *{name}) Error() string"), |e| e.line("return p.String()"));
        e.blank_line();
        e.block(&format!("func ({name}) TExceptionType() thrift.TExceptionType"), |e| {
            e.line("return thrift.TExceptionTypeCompiled");
        });
        e.blank_line();
        goln!(e, "var _ thrift.TException = (*{name})(nil)");
        e.blank_line();
    }
}

/// Composite literal of a struct with its non-zero defaults: `Point{Label: "x",}`.
///
/// Used by nested readers, which allocate a fresh value before decoding into it.
pub(crate) fn struct_literal(ctx: &GenContext<'_>, def: &StructDef, type_name: &str) -> GenResult<String> {
    let mut inits = Vec::new();
    for field in def.fields() {
        if is_pointer_field(ctx.schema, field) || omit_initialization(ctx.schema, field) {
            continue;
        }
        if let Some(value) = &field.default {
            let literal = ctx.render_const(&field.ty, value, false)?;
            inits.push(format!("{}: {},", ctx.names.publicize(&field.name), nest(&literal)));
        }
    }
    Ok(composite(type_name, &inits))
}

fn composite(head: &str, inits: &[String]) -> String {
    if inits.is_empty() {
        return format!("{head}{{}}");
    }
    let mut out = format!("{head}{{");
    for init in inits {
        out.push_str("\n\t");
        out.push_str(init);
    }
    out.push_str("\n}");
    out
}

fn nest(rendered: &str) -> String {
    rendered.replace('\n', "\n\t")
}
