//! Struct decoding: the `Read` loop and one `ReadField<N>` routine per member.

use idlgo_ast::Type;
use idlgo_core::lang::runtime::ScalarKind;

use super::definition::struct_literal;
use super::plan::StructPlan;
use crate::backend::context::GenContext;
use crate::backend::errors::{GenResult, GenerateError};
use crate::backend::go_emitter::{GoEmitter, goln};
use crate::backend::types::scalar_kind;

/// Where a decoded value is stored.
struct Sink<'n> {
    name: &'n str,
    /// Introduce the variable (`:=` / `var`) rather than assign to an existing one.
    declare: bool,
    /// The destination holds a pointer to the value.
    pointer: bool,
}

impl Sink<'_> {
    fn assign(&self) -> &'static str {
        if self.declare { ":=" } else { "=" }
    }
}

pub(super) fn emit_reader(ctx: &mut GenContext<'_>, e: &mut GoEmitter, plan: &StructPlan<'_>) -> GenResult<()> {
    let read = ctx.options.read_method();
    let header = format!(
        "func (p *{}) {read}(ctx context.Context, iprot thrift.TProtocol) error",
        plan.go_name
    );
    e.block(&header, |e| {
        e.block("if _, err := iprot.ReadStructBegin(ctx); err != nil", |e| {
            e.line("return thrift.PrependError(fmt.Sprintf(\"%T read error: \", p), err)");
        });
        e.blank_line();
        for field in plan.required() {
            goln!(e, "var isset{} bool = false", field.go_name);
        }
        e.blank_line();

        e.block("for", |e| {
            e.line("_, fieldTypeId, fieldId, err := iprot.ReadFieldBegin(ctx)");
            e.block("if err != nil", |e| {
                e.line("return thrift.PrependError(fmt.Sprintf(\"%T field %d read error: \", p, fieldId), err)");
            });
            e.block("if fieldTypeId == thrift.STOP", |e| e.line("break"));
            e.switch("switch fieldId", |e| {
                for field in &plan.fields {
                    e.case(&field.field.id.to_string(), |e| {
                        e.if_else(
                            &format!("if fieldTypeId == {}", field.wire.as_go()),
                            |e| {
                                e.block(
                                    &format!("if err := p.ReadField{}(ctx, iprot); err != nil", field.method_suffix()),
                                    |e| e.line("return err"),
                                );
                                if field.field.is_required() {
                                    goln!(e, "isset{} = true", field.go_name);
                                }
                            },
                            emit_skip,
                        );
                    });
                }
                e.line("default:");
                e.indented(emit_skip);
            });
            e.block("if err := iprot.ReadFieldEnd(ctx); err != nil", |e| e.line("return err"));
        });
        e.block("if err := iprot.ReadStructEnd(ctx); err != nil", |e| {
            e.line("return thrift.PrependError(fmt.Sprintf(\"%T read struct end error: \", p), err)");
        });
        for field in plan.required() {
            e.block(&format!("if !isset{}", field.go_name), |e| {
                goln!(
                    e,
                    "return thrift.NewTProtocolExceptionWithType(thrift.INVALID_DATA, fmt.Errorf(\"Required field {} is not set\"))",
                    field.go_name
                );
            });
        }
        e.line("return nil");
    });
    e.blank_line();

    for field in &plan.fields {
        let header = format!(
            "func (p *{}) ReadField{}(ctx context.Context, iprot thrift.TProtocol) error",
            plan.go_name,
            field.method_suffix()
        );
        let target = format!("p.{}", field.go_name);
        let sink = Sink {
            name: &target,
            declare: false,
            pointer: field.derefs(),
        };
        e.block(&header, |e| -> GenResult<()> {
            read_value(ctx, e, &field.field.ty, &sink, field.field.id, false)?;
            e.line("return nil");
            Ok(())
        })?;
        e.blank_line();
    }
    Ok(())
}

fn emit_skip(e: &mut GoEmitter) {
    e.block("if err := iprot.Skip(ctx, fieldTypeId); err != nil", |e| e.line("return err"));
}

fn read_value(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    ty: &Type,
    sink: &Sink<'_>,
    field_id: i32,
    in_key: bool,
) -> GenResult<()> {
    let schema = ctx.schema;
    let resolved = schema.true_type(ty);
    match resolved {
        Type::Struct(id) => {
            let literal = struct_literal(ctx, schema.struct_def(*id), &ctx.type_name(resolved))?;
            goln!(e, "{} {} &{literal}", sink.name, sink.assign());
            let read = ctx.options.read_method();
            e.block(&format!("if err := {}.{read}(ctx, iprot); err != nil", sink.name), |e| {
                goln!(
                    e,
                    "return thrift.PrependError(fmt.Sprintf(\"%T error reading struct: \", {}), err)",
                    sink.name
                );
            });
            Ok(())
        }
        Type::Map(..) | Type::Set(_) | Type::List(_) => read_container(ctx, e, ty, resolved, sink),
        Type::Bool
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Double
        | Type::String
        | Type::Binary
        | Type::Enum(_) => read_scalar(ctx, e, ty, resolved, sink, field_id, in_key),
        Type::Void | Type::Typedef(_) => Err(GenerateError::UnsupportedType {
            ty: schema.display_type(ty),
            context: "a decoded value".to_string(),
        }),
    }
}

fn read_scalar(
    ctx: &GenContext<'_>,
    e: &mut GoEmitter,
    ty: &Type,
    resolved: &Type,
    sink: &Sink<'_>,
    field_id: i32,
    in_key: bool,
) -> GenResult<()> {
    if sink.declare {
        let go = if in_key { ctx.go_key_type(ty)? } else { ctx.go_type(ty, false)? };
        goln!(e, "var {} {go}", sink.name);
    }
    let method = match resolved {
        Type::Binary if in_key => "ReadString".to_string(),
        Type::Binary => "ReadBinary".to_string(),
        Type::Enum(_) => "ReadI32".to_string(),
        other => format!("Read{}", scalar_kind(other).map_or("String", ScalarKind::protocol_suffix)),
    };
    let wrap = match (ty, resolved) {
        (Type::Typedef(_), Type::Binary) if in_key => None,
        (Type::Typedef(_), _) | (_, Type::Enum(_)) => Some(ctx.type_name(ty)),
        (_, Type::I8) => Some("int8".to_string()),
        _ => None,
    };
    let amp = if sink.pointer { "&" } else { "" };

    e.if_else(
        &format!("if v, err := iprot.{method}(ctx); err != nil"),
        |e| goln!(e, "return thrift.PrependError(\"error reading field {field_id}: \", err)"),
        |e| match &wrap {
            Some(wrap) => {
                goln!(e, "temp := {wrap}(v)");
                goln!(e, "{} = {amp}temp", sink.name);
            }
            None => goln!(e, "{} = {amp}v", sink.name),
        },
    );
    Ok(())
}

fn read_container(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    ty: &Type,
    resolved: &Type,
    sink: &Sink<'_>,
) -> GenResult<()> {
    let (begin, stem, local, capacity) = match resolved {
        Type::Map(..) => ("_, _, size, err", "Map", "tMap", "size"),
        Type::Set(_) => ("_, size, err", "Set", "tSet", "0, size"),
        _ => ("_, size, err", "List", "tSlice", "0, size"),
    };
    let noun = stem.to_ascii_lowercase();

    goln!(e, "{begin} := iprot.Read{stem}Begin(ctx)");
    e.block("if err != nil", |e| {
        goln!(e, "return thrift.PrependError(\"error reading {noun} begin: \", err)");
    });
    e.block("if size < 0", |e| goln!(e, "return errors.New(\"{noun} size is negative\")"));
    goln!(e, "{local} := make({}, {capacity})", ctx.go_type(ty, false)?);
    let amp = if sink.pointer { "&" } else { "" };
    goln!(e, "{} {} {amp}{local}", sink.name, sink.assign());

    let container = if sink.pointer {
        format!("(*{})", sink.name)
    } else {
        sink.name.to_string()
    };
    e.block("for i := 0; i < size; i++", |e| -> GenResult<()> {
        match resolved {
            Type::Map(key_ty, val_ty) => {
                let key = ctx.tmp("_key");
                let val = ctx.tmp("_val");
                read_value(ctx, e, key_ty, &element(&key), 0, true)?;
                read_value(ctx, e, val_ty, &element(&val), 0, false)?;
                goln!(e, "{container}[{key}] = {val}");
            }
            Type::Set(elem_ty) | Type::List(elem_ty) => {
                let elem = ctx.tmp("_elem");
                read_value(ctx, e, elem_ty, &element(&elem), 0, false)?;
                goln!(e, "{container} = append({container}, {elem})");
            }
            _ => {}
        }
        Ok(())
    })?;
    e.block(&format!("if err := iprot.Read{stem}End(ctx); err != nil"), |e| {
        goln!(e, "return thrift.PrependError(\"error reading {noun} end: \", err)");
    });
    Ok(())
}

fn element(name: &str) -> Sink<'_> {
    Sink {
        name,
        declare: true,
        pointer: false,
    }
}
