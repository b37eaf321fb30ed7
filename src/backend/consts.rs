//! Constant rendering: IDL constant values to Go expressions, and the constants unit.
//!
//! ## Notes
//! - Composite values render multi-line with tab indentation relative to their first line;
//!   [`GoEmitter::line`] re-indents continuation lines at the call site.
//! - Map, list and set entries keep the order stored on the constant.

use idlgo_ast::{ConstDef, ConstValue, Type};
use idlgo_core::strings::escape_go_string;

use super::context::GenContext;
use super::errors::{GenResult, GenerateError};
use super::go_emitter::{GoEmitter, goln};
use super::types::{is_pointer_field, scalar_kind};

impl GenContext<'_> {
    /// Render `value` as a Go expression of declared type `ty`.
    ///
    /// With `pointer` set, scalars are wrapped in a pointer constructor: `<Typedef>Ptr(..)` when
    /// `ty` is a typedef, `<Enum>Ptr(..)` for enums, `thrift.<Kind>Ptr(..)` otherwise.
    pub fn render_const(&self, ty: &Type, value: &ConstValue, pointer: bool) -> GenResult<String> {
        let schema = self.schema;
        let resolved = schema.true_type(ty);
        match resolved {
            Type::Binary => Ok(format!("[]byte(\"{}\")", escape_go_string(self.expect_str(ty, value)?))),
            Type::Bool | Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Double | Type::String => {
                let literal = self.render_scalar(resolved, value)?;
                if !pointer {
                    return Ok(literal);
                }
                let ctor = match (ty, scalar_kind(resolved)) {
                    (Type::Typedef(_), _) => format!("{}Ptr", self.type_name(ty)),
                    (_, Some(kind)) => kind.ptr_constructor().to_string(),
                    (_, None) => return Ok(literal),
                };
                Ok(format!("{ctor}({literal})"))
            }
            Type::Enum(_) => {
                let literal = self.expect_integer(ty, value)?.to_string();
                if !pointer {
                    return Ok(literal);
                }
                Ok(format!("{}Ptr({literal})", self.type_name(ty)))
            }
            Type::Struct(id) => {
                let def = schema.struct_def(*id);
                let ConstValue::Map(entries) = value else {
                    return Err(self.invalid(ty, value));
                };
                let mut out = format!("&{}{{", self.type_name(resolved));
                for (key, val) in entries {
                    let Some(name) = key.as_str() else {
                        return Err(self.invalid(ty, key));
                    };
                    let field = def.field_named(name).ok_or_else(|| GenerateError::UnknownField {
                        owner: def.name.clone(),
                        field: name.to_string(),
                    })?;
                    let rendered = self.render_const(&field.ty, val, is_pointer_field(schema, field))?;
                    out.push_str(&format!(
                        "\n\t{}: {},",
                        self.names.publicize(&field.name),
                        nest(&rendered)
                    ));
                }
                if !entries.is_empty() {
                    out.push('\n');
                }
                out.push('}');
                Ok(out)
            }
            Type::Map(key_ty, val_ty) => {
                let ConstValue::Map(entries) = value else {
                    return Err(self.invalid(ty, value));
                };
                let mut out = format!("{}{{", self.go_type(ty, false)?);
                for (k, v) in entries {
                    let key = self.render_const(key_ty, k, false)?;
                    let val = self.render_const(val_ty, v, false)?;
                    out.push_str(&format!("\n\t{}: {},", nest(&key), nest(&val)));
                }
                if !entries.is_empty() {
                    out.push('\n');
                }
                out.push('}');
                Ok(out)
            }
            Type::List(elem) | Type::Set(elem) => {
                let ConstValue::List(items) = value else {
                    return Err(self.invalid(ty, value));
                };
                let mut out = format!("{}{{", self.go_type(ty, false)?);
                for item in items {
                    let rendered = self.render_const(elem, item, false)?;
                    out.push_str(&format!("\n\t{},", nest(&rendered)));
                }
                if !items.is_empty() {
                    out.push('\n');
                }
                out.push('}');
                Ok(out)
            }
            Type::Void | Type::Typedef(_) => Err(GenerateError::UnsupportedType {
                ty: schema.display_type(ty),
                context: "a constant".to_string(),
            }),
        }
    }

    fn render_scalar(&self, ty: &Type, value: &ConstValue) -> GenResult<String> {
        Ok(match ty {
            Type::String => format!("\"{}\"", escape_go_string(self.expect_str(ty, value)?)),
            Type::Bool => (self.expect_integer(ty, value)? > 0).to_string(),
            Type::Double => match value {
                ConstValue::Integer(v) => v.to_string(),
                ConstValue::Double(v) => format!("{v:?}"),
                other => return Err(self.invalid(ty, other)),
            },
            _ => self.expect_integer(ty, value)?.to_string(),
        })
    }

    fn expect_integer(&self, ty: &Type, value: &ConstValue) -> GenResult<i64> {
        value.as_integer().ok_or_else(|| self.invalid(ty, value))
    }

    fn expect_str<'v>(&self, ty: &Type, value: &'v ConstValue) -> GenResult<&'v str> {
        value.as_str().ok_or_else(|| self.invalid(ty, value))
    }

    fn invalid(&self, ty: &Type, value: &ConstValue) -> GenerateError {
        GenerateError::InvalidConstant {
            ty: self.schema.display_type(ty),
            value: value.to_string(),
        }
    }
}

/// Indent the continuation lines of a rendered value by one level.
fn nest(rendered: &str) -> String {
    rendered.replace('\n', "\n\t")
}

/// Whether a constant can be a Go `const`, decided on its declared type.
///
/// Only scalar base types and enums qualify. Typedef'd constants and `binary` (a `[]byte`, never a
/// Go constant) become a `var` assigned in `init()`.
fn is_const_expressible(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Bool | Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Double | Type::String | Type::Enum(_)
    )
}

/// Write the program's constants: `const` declarations into `decls`, and assignments for composite
/// values into the body of `func init()`, written to `init`.
#[tracing::instrument(skip_all, fields(const_count = consts.len()))]
pub fn emit_constants(
    ctx: &GenContext<'_>,
    consts: &[ConstDef],
    decls: &mut GoEmitter,
    init: &mut GoEmitter,
) -> GenResult<()> {
    for def in consts {
        let name = ctx.names.publicize(&def.name);
        if let Some(doc) = &def.doc {
            decls.doc(doc);
        }
        if is_const_expressible(&def.ty) {
            let literal = ctx.render_const(&def.ty, &def.value, false)?;
            goln!(decls, "const {name} = {literal}");
        } else {
            goln!(decls, "var {name} {}", ctx.go_type(&def.ty, false)?);
            let literal = ctx.render_const(&def.ty, &def.value, false)?;
            goln!(init, "{name} = {literal}");
        }
        tracing::debug!(constant = %def.name, "rendered constant");
    }
    Ok(())
}
