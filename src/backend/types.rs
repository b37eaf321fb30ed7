//! Type mapping: IDL types to Go type spellings, wire tags, and the pointer policy.
//!
//! ## Notes
//! - Structs are always referenced through pointers; binary (`[]byte`) never is. A typedef of a
//!   struct is a Go type alias, so it is referenced through a pointer as well.
//! - Optional scalars become pointers only when they have no default, so "unset" is
//!   representable; optional containers (already nilable) become pointers only when a default
//!   exists, so "explicitly set to the default" is distinguishable from "unset".

use idlgo_ast::{ConstValue, Field, Schema, Type};
use idlgo_core::lang::runtime::{ScalarKind, WireType};

use super::context::GenContext;
use super::errors::{GenResult, GenerateError};

/// Field annotation requesting pass-by-reference.
pub const PASS_BY_REFERENCE_ANNOTATION: &str = "cpp.ref";

impl GenContext<'_> {
    /// Go spelling of `ty`, pointer-prefixed when `pointer` is set and the type admits it.
    pub fn go_type(&self, ty: &Type, pointer: bool) -> GenResult<String> {
        let ptr = if pointer { "*" } else { "" };
        Ok(match ty {
            Type::Void => {
                return Err(GenerateError::UnsupportedType {
                    ty: "void".to_string(),
                    context: "a value position".to_string(),
                });
            }
            Type::Binary => "[]byte".to_string(),
            Type::Bool | Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Double | Type::String => {
                let kind = scalar_kind(ty).map_or("", ScalarKind::go_type);
                format!("{ptr}{kind}")
            }
            Type::Struct(_) => format!("*{}", self.type_name(ty)),
            Type::Typedef(_) if matches!(self.schema.true_type(ty), Type::Struct(_)) => {
                format!("*{}", self.type_name(ty))
            }
            Type::Enum(_) | Type::Typedef(_) => format!("{ptr}{}", self.type_name(ty)),
            Type::Map(key, value) => format!("{ptr}map[{}]{}", self.go_key_type(key)?, self.go_type(value, false)?),
            Type::List(elem) | Type::Set(elem) => format!("{ptr}[]{}", self.go_type(elem, false)?),
        })
    }

    /// Go spelling of a map key type. Containers are rejected and binary keys become strings.
    pub fn go_key_type(&self, ty: &Type) -> GenResult<String> {
        match self.schema.true_type(ty) {
            Type::Map(..) | Type::List(_) | Type::Set(_) => Err(GenerateError::InvalidKeyType {
                ty: self.schema.display_type(ty),
            }),
            Type::Binary => Ok("string".to_string()),
            _ => self.go_type(ty, false),
        }
    }

    /// Exported, module-qualified name of an enum, struct or typedef; IDL spelling otherwise.
    pub fn type_name(&self, ty: &Type) -> String {
        let schema = self.schema;
        match ty {
            Type::Enum(id) => {
                let def = schema.enum_def(*id);
                self.qualified_name(def.program, &def.name)
            }
            Type::Struct(id) => {
                let def = schema.struct_def(*id);
                self.qualified_name(def.program, &def.name)
            }
            Type::Typedef(id) => {
                let def = schema.typedef(*id);
                self.qualified_name(def.program, &def.name)
            }
            other => schema.display_type(other),
        }
    }

    /// Wire tag of a type (binary travels as `STRING`, enums as `I32`).
    pub fn wire_type(&self, ty: &Type) -> GenResult<WireType> {
        Ok(match self.schema.true_type(ty) {
            Type::Bool => WireType::Bool,
            Type::I8 => WireType::Byte,
            Type::I16 => WireType::I16,
            Type::I32 | Type::Enum(_) => WireType::I32,
            Type::I64 => WireType::I64,
            Type::Double => WireType::Double,
            Type::String | Type::Binary => WireType::String,
            Type::Struct(_) => WireType::Struct,
            Type::Map(..) => WireType::Map,
            Type::Set(_) => WireType::Set,
            Type::List(_) => WireType::List,
            Type::Void | Type::Typedef(_) => {
                return Err(GenerateError::UnsupportedType {
                    ty: self.schema.display_type(ty),
                    context: "wire encoding".to_string(),
                });
            }
        })
    }
}

/// Scalar kind of a base type; `None` for binary, void and non-base types.
pub fn scalar_kind(ty: &Type) -> Option<ScalarKind> {
    Some(match ty {
        Type::Bool => ScalarKind::Bool,
        Type::I8 => ScalarKind::I8,
        Type::I16 => ScalarKind::I16,
        Type::I32 => ScalarKind::I32,
        Type::I64 => ScalarKind::I64,
        Type::Double => ScalarKind::Double,
        Type::String => ScalarKind::String,
        _ => return None,
    })
}

/// Whether a field is stored behind a pointer.
///
/// Decided in order: a pass-by-reference annotation, a struct type, non-optional presence, then
/// the per-type optional policy.
pub fn is_pointer_field(schema: &Schema, field: &Field) -> bool {
    if field.annotation(PASS_BY_REFERENCE_ANNOTATION).is_some() {
        return true;
    }
    let ty = schema.true_type(&field.ty);
    if matches!(ty, Type::Struct(_)) {
        return true;
    }
    if !field.is_optional() {
        return false;
    }
    let has_default = field.default.is_some();
    match ty {
        Type::Binary => false,
        Type::String
        | Type::Bool
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Double
        | Type::Enum(_) => !has_default,
        Type::Map(..) | Type::Set(_) | Type::List(_) | Type::Typedef(_) => has_default,
        Type::Void | Type::Struct(_) => false,
    }
}

/// Whether the zero-value constructor may leave the field at Go's zero value.
///
/// True when no default is declared or the default equals the type's natural zero; binary
/// fields with a default are always initialized.
pub fn omit_initialization(schema: &Schema, field: &Field) -> bool {
    let Some(value) = &field.default else {
        return true;
    };
    match schema.true_type(&field.ty) {
        Type::Binary => false,
        Type::String => value.as_str().is_some_and(str::is_empty),
        Type::Bool | Type::I8 | Type::I16 | Type::I32 | Type::I64 => value.as_integer() == Some(0),
        Type::Double => match value {
            ConstValue::Integer(v) => *v == 0,
            ConstValue::Double(v) => *v == 0.0,
            _ => false,
        },
        _ => false,
    }
}

/// Whether values of this type are nil-comparable in Go (slices and maps).
pub fn is_nilable_container(schema: &Schema, ty: &Type) -> bool {
    schema.true_type(ty).is_container()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::options::GeneratorOptions;
    use idlgo_ast::{Requiredness, load_str};

    fn schema() -> Schema {
        load_str(
            r#"{"programs": [
                {"name": "shared", "namespace": "acme.shared",
                 "structs": [{"name": "point", "fields": []}],
                 "typedefs": [{"name": "Tags", "type": {"list": "string"}}]},
                {"name": "geo", "includes": ["shared"],
                 "enums": [{"name": "Color", "values": [{"name": "RED"}]}],
                 "typedefs": [{"name": "Blob", "type": "binary"}, {"name": "Pairs", "type": {"list": "i32"}}],
                 "structs": [{"name": "Shape", "fields": []}]}
            ]}"#,
        )
        .unwrap()
    }

    fn with_ctx<R>(f: impl FnOnce(&GenContext<'_>) -> R) -> R {
        let schema = schema();
        let options = GeneratorOptions::default();
        let main = schema.main_program().unwrap();
        let ctx = GenContext::new(&schema, &options, main);
        f(&ctx)
    }

    fn named(schema: &Schema, program: &str, kind: &str, index: usize) -> Type {
        let p = schema.program(schema.program_named(program).unwrap());
        match kind {
            "struct" => Type::Struct(p.structs[index]),
            "enum" => Type::Enum(p.enums[index]),
            _ => Type::Typedef(p.typedefs[index]),
        }
    }

    #[test]
    fn test_scalars_and_pointers() {
        with_ctx(|ctx| {
            assert_eq!(ctx.go_type(&Type::I32, false).unwrap(), "int32");
            assert_eq!(ctx.go_type(&Type::I32, true).unwrap(), "*int32");
            assert_eq!(ctx.go_type(&Type::Double, true).unwrap(), "*float64");
            assert_eq!(ctx.go_type(&Type::Binary, true).unwrap(), "[]byte");
        });
    }

    #[test]
    fn test_structs_are_always_pointers_and_qualified() {
        with_ctx(|ctx| {
            let local = named(ctx.schema, "geo", "struct", 0);
            let foreign = named(ctx.schema, "shared", "struct", 0);
            assert_eq!(ctx.go_type(&local, false).unwrap(), "*Shape");
            assert_eq!(ctx.go_type(&foreign, false).unwrap(), "*shared.Point");
        });
    }

    #[test]
    fn test_containers() {
        with_ctx(|ctx| {
            let color = named(ctx.schema, "geo", "enum", 0);
            let map = Type::Map(Box::new(Type::String), Box::new(Type::List(Box::new(color))));
            assert_eq!(ctx.go_type(&map, false).unwrap(), "map[string][]Color");
            let tags = named(ctx.schema, "shared", "typedef", 0);
            assert_eq!(ctx.go_type(&Type::Set(Box::new(tags)), true).unwrap(), "*[]shared.Tags");
        });
    }

    #[test]
    fn test_map_keys() {
        with_ctx(|ctx| {
            let binary_key = Type::Map(Box::new(Type::Binary), Box::new(Type::I32));
            assert_eq!(ctx.go_type(&binary_key, false).unwrap(), "map[string]int32");

            let pairs = named(ctx.schema, "geo", "typedef", 1);
            let bad = Type::Map(Box::new(pairs), Box::new(Type::I32));
            let err = ctx.go_type(&bad, false).unwrap_err();
            assert!(matches!(err, GenerateError::InvalidKeyType { .. }));
        });
    }

    #[test]
    fn test_wire_types() {
        with_ctx(|ctx| {
            let color = named(ctx.schema, "geo", "enum", 0);
            let blob = named(ctx.schema, "geo", "typedef", 0);
            assert_eq!(ctx.wire_type(&color).unwrap(), WireType::I32);
            assert_eq!(ctx.wire_type(&blob).unwrap(), WireType::String);
            assert!(ctx.wire_type(&Type::Void).is_err());
        });
    }

    #[test]
    fn test_pointer_policy_table() {
        let schema = schema();
        let optional = |ty: Type| Field::new(1, "f", ty).with_requiredness(Requiredness::Optional);
        let list = Type::List(Box::new(Type::I32));

        assert!(is_pointer_field(&schema, &optional(Type::I32)));
        assert!(!is_pointer_field(&schema, &optional(Type::I32).with_default(ConstValue::Integer(1))));
        assert!(is_pointer_field(&schema, &optional(Type::String)));
        assert!(!is_pointer_field(&schema, &optional(Type::Binary)));
        assert!(!is_pointer_field(&schema, &optional(list.clone())));
        assert!(is_pointer_field(
            &schema,
            &optional(list.clone()).with_default(ConstValue::List(vec![]))
        ));
        assert!(!is_pointer_field(&schema, &Field::new(1, "f", Type::I32)));
        assert!(is_pointer_field(&schema, &Field::new(1, "f", named(&schema, "geo", "struct", 0))));

        let mut annotated = Field::new(1, "f", Type::I64);
        annotated.annotations.insert(PASS_BY_REFERENCE_ANNOTATION.into(), String::new());
        assert!(is_pointer_field(&schema, &annotated));
    }

    #[test]
    fn test_omit_initialization() {
        let schema = schema();
        let field = |ty: Type, v: ConstValue| Field::new(1, "f", ty).with_default(v);
        assert!(omit_initialization(&schema, &Field::new(1, "f", Type::I32)));
        assert!(omit_initialization(&schema, &field(Type::I32, ConstValue::Integer(0))));
        assert!(!omit_initialization(&schema, &field(Type::I32, ConstValue::Integer(7))));
        assert!(omit_initialization(&schema, &field(Type::Double, ConstValue::Double(0.0))));
        assert!(omit_initialization(&schema, &field(Type::String, ConstValue::String(String::new()))));
        assert!(!omit_initialization(&schema, &field(Type::Binary, ConstValue::String(String::new()))));
        assert!(!omit_initialization(&schema, &field(Type::List(Box::new(Type::I32)), ConstValue::List(vec![]))));
    }
}
