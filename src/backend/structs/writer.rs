//! Struct encoding: the `Write` method and one `writeField<N>` routine per member, in wire-id
//! order.

use idlgo_ast::{Field, Type};
use idlgo_core::lang::runtime::ScalarKind;
use idlgo_core::strings::escape_go_string;

use super::equals::emit_value_equals;
use super::plan::StructPlan;
use crate::backend::context::GenContext;
use crate::backend::errors::{GenResult, GenerateError};
use crate::backend::go_emitter::{GoEmitter, goln};
use crate::backend::types::scalar_kind;

pub(super) fn emit_writer(ctx: &mut GenContext<'_>, e: &mut GoEmitter, plan: &StructPlan<'_>) -> GenResult<()> {
    let write = ctx.options.write_method();
    let header = format!(
        "func (p *{}) {write}(ctx context.Context, oprot thrift.TProtocol) error",
        plan.go_name
    );
    e.block(&header, |e| {
        if plan.has_count_set_fields() {
            e.block(&format!("if c := p.{}(); c != 1", plan.count_set_fields_fn()), |e| {
                e.line("return fmt.Errorf(\"%T write union: exactly one field must be set (%d set)\", p, c)");
            });
        }
        e.block(
            &format!(
                "if err := oprot.WriteStructBegin(ctx, \"{}\"); err != nil",
                escape_go_string(&plan.def.name)
            ),
            |e| e.line("return thrift.PrependError(fmt.Sprintf(\"%T write struct begin error: \", p), err)"),
        );
        e.block("if p != nil", |e| {
            for field in plan.sorted() {
                e.block(
                    &format!("if err := p.writeField{}(ctx, oprot); err != nil", field.method_suffix()),
                    |e| e.line("return err"),
                );
            }
        });
        e.block("if err := oprot.WriteFieldStop(ctx); err != nil", |e| {
            e.line("return thrift.PrependError(\"write field stop error: \", err)");
        });
        e.block("if err := oprot.WriteStructEnd(ctx); err != nil", |e| {
            e.line("return thrift.PrependError(\"write struct stop error: \", err)");
        });
        e.line("return nil");
    });
    e.blank_line();

    for field in plan.sorted() {
        let header = format!(
            "func (p *{}) writeField{}(ctx context.Context, oprot thrift.TProtocol) (err error)",
            plan.go_name,
            field.method_suffix()
        );
        e.block(&header, |e| -> GenResult<()> {
            if field.field.is_optional() {
                e.block(&format!("if p.IsSet{}()", field.go_name), |e| {
                    write_field_body(ctx, e, field.field, &field.go_name, field.derefs(), field.wire.as_go())
                })?;
            } else {
                write_field_body(ctx, e, field.field, &field.go_name, field.derefs(), field.wire.as_go())?;
            }
            e.line("return err");
            Ok(())
        })?;
        e.blank_line();
    }
    Ok(())
}

fn write_field_body(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    field: &Field,
    go_name: &str,
    pointer: bool,
    wire: &str,
) -> GenResult<()> {
    let name = escape_go_string(&field.name);
    let id = field.id;
    e.block(
        &format!("if err := oprot.WriteFieldBegin(ctx, \"{name}\", {wire}, {id}); err != nil"),
        |e| {
            goln!(
                e,
                "return thrift.PrependError(fmt.Sprintf(\"%T write field begin error {id}:{name}: \", p), err)"
            );
        },
    );
    let value = WriteValue {
        label: &name,
        id,
    };
    value.write(ctx, e, &field.ty, &format!("p.{go_name}"), pointer, false)?;
    e.block("if err := oprot.WriteFieldEnd(ctx); err != nil", |e| {
        goln!(
            e,
            "return thrift.PrependError(fmt.Sprintf(\"%T write field end error {id}:{name}: \", p), err)"
        );
    });
    Ok(())
}

/// Encoder for one member's value; `label` and `id` name the member in error messages.
struct WriteValue<'l> {
    label: &'l str,
    id: i32,
}

impl WriteValue<'_> {
    /// Container elements carry no member name.
    const ELEMENT: WriteValue<'static> = WriteValue { label: "", id: 0 };

    fn write(
        &self,
        ctx: &mut GenContext<'_>,
        e: &mut GoEmitter,
        ty: &Type,
        expr: &str,
        pointer: bool,
        in_key: bool,
    ) -> GenResult<()> {
        let schema = ctx.schema;
        let resolved = schema.true_type(ty);
        match resolved {
            Type::Struct(_) => {
                let write = ctx.options.write_method();
                e.block(&format!("if err := {expr}.{write}(ctx, oprot); err != nil"), |e| {
                    goln!(e, "return thrift.PrependError(fmt.Sprintf(\"%T error writing struct: \", {expr}), err)");
                });
                Ok(())
            }
            Type::Map(..) | Type::Set(_) | Type::List(_) => self.write_container(ctx, e, resolved, expr, pointer),
            Type::Bool
            | Type::I8
            | Type::I16
            | Type::I32
            | Type::I64
            | Type::Double
            | Type::String
            | Type::Binary
            | Type::Enum(_) => {
                let value = if pointer { format!("*{expr}") } else { expr.to_string() };
                let call = match resolved {
                    Type::Binary if !in_key => format!("WriteBinary(ctx, {value})"),
                    Type::Binary => format!("WriteString(ctx, string({value}))"),
                    Type::Enum(_) => format!("WriteI32(ctx, int32({value}))"),
                    other => {
                        let kind = scalar_kind(other).unwrap_or(ScalarKind::String);
                        format!("Write{}(ctx, {}({value}))", kind.protocol_suffix(), kind.go_type())
                    }
                };
                e.block(&format!("if err := oprot.{call}; err != nil"), |e| {
                    goln!(
                        e,
                        "return thrift.PrependError(fmt.Sprintf(\"%T.{} ({}) field write error: \", p), err)",
                        self.label,
                        self.id
                    );
                });
                Ok(())
            }
            Type::Void | Type::Typedef(_) => Err(GenerateError::UnsupportedType {
                ty: schema.display_type(ty),
                context: "an encoded value".to_string(),
            }),
        }
    }

    fn write_container(
        &self,
        ctx: &mut GenContext<'_>,
        e: &mut GoEmitter,
        resolved: &Type,
        expr: &str,
        pointer: bool,
    ) -> GenResult<()> {
        let prefix = if pointer { format!("*{expr}") } else { expr.to_string() };
        let (stem, tags) = match resolved {
            Type::Map(k, v) => ("Map", format!("{}, {}", ctx.wire_type(k)?.as_go(), ctx.wire_type(v)?.as_go())),
            Type::Set(elem) => ("Set", ctx.wire_type(elem)?.as_go().to_string()),
            Type::List(elem) => ("List", ctx.wire_type(elem)?.as_go().to_string()),
            _ => return Ok(()),
        };
        let noun = stem.to_ascii_lowercase();
        e.block(
            &format!("if err := oprot.Write{stem}Begin(ctx, {tags}, len({prefix})); err != nil"),
            |e| goln!(e, "return thrift.PrependError(\"error writing {noun} begin: \", err)"),
        );

        let element = Self::ELEMENT;
        match resolved {
            Type::Map(key_ty, val_ty) => {
                e.block(&format!("for k, v := range {prefix}"), |e| -> GenResult<()> {
                    element.write(ctx, e, key_ty, "k", false, true)?;
                    element.write(ctx, e, val_ty, "v", false, false)
                })?;
            }
            Type::Set(elem_ty) => {
                let wrapped = if pointer { format!("({prefix})") } else { prefix.clone() };
                emit_uniqueness_check(ctx, e, elem_ty, &wrapped)?;
                e.block(&format!("for _, v := range {prefix}"), |e| {
                    element.write(ctx, e, elem_ty, "v", false, false)
                })?;
            }
            Type::List(elem_ty) => {
                e.block(&format!("for _, v := range {prefix}"), |e| {
                    element.write(ctx, e, elem_ty, "v", false, false)
                })?;
            }
            _ => {}
        }

        e.block(&format!("if err := oprot.Write{stem}End(ctx); err != nil"), |e| {
            goln!(e, "return thrift.PrependError(\"error writing {noun} end: \", err)");
        });
        Ok(())
    }
}

/// Pairwise scan rejecting a set whose elements are not distinct.
fn emit_uniqueness_check(ctx: &mut GenContext<'_>, e: &mut GoEmitter, elem_ty: &Type, set: &str) -> GenResult<()> {
    let elem_go = ctx.go_type(elem_ty, false)?;
    e.block(&format!("for i := 0; i < len({set}); i++"), |e| {
        e.block(&format!("for j := i + 1; j < len({set}); j++"), |e| -> GenResult<()> {
            e.block_closed_by(
                &format!("if func(tgt, src {elem_go}) bool"),
                &format!("}}({set}[i], {set}[j]) {{"),
                |e| -> GenResult<()> {
                    emit_value_equals(ctx, e, elem_ty, "tgt", "src")?;
                    e.line("return true");
                    Ok(())
                },
            )?;
            e.indented(|e| {
                goln!(
                    e,
                    "return thrift.PrependError(\"\", fmt.Errorf(\"%T error writing set field: slice is not unique\", {set}))"
                );
            });
            e.line("}");
            Ok(())
        })
    })
}
