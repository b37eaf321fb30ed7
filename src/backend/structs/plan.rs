//! Per-field decisions computed once and shared by every struct emission site.

use idlgo_ast::{Field, StructDef};
use idlgo_core::lang::runtime::WireType;

use crate::backend::context::GenContext;
use crate::backend::errors::GenResult;
use crate::backend::types::{is_nilable_container, is_pointer_field, omit_initialization};

/// How a struct is used; per-method helper structs are named after their service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructRole<'s> {
    Plain,
    Args { service: &'s str },
    Result { service: &'s str },
}

impl StructRole<'_> {
    pub fn is_helper(self) -> bool {
        !matches!(self, StructRole::Plain)
    }
}

#[derive(Debug, Clone)]
pub struct FieldPlan<'f> {
    pub field: &'f Field,
    /// Exported Go member name.
    pub go_name: String,
    /// Declared Go type of the member.
    pub target_type: String,
    /// Go type without the optional pointer (getter result, default holder).
    pub value_type: String,
    pub is_pointer: bool,
    pub has_default: bool,
    pub is_omittable: bool,
    /// Non-pointer rendering of the declared default.
    pub default_literal: Option<String>,
    /// Name of the package-level default holder (`Struct_Field_DEFAULT`).
    pub default_var: String,
    pub wire: WireType,
    /// Container, or binary: presence independently observable without a pointer.
    pub is_nilable: bool,
    pub is_binary: bool,
    pub is_struct: bool,
}

impl FieldPlan<'_> {
    /// The member must be dereferenced to obtain a `value_type` value.
    pub fn derefs(&self) -> bool {
        self.target_type != self.value_type
    }

    /// Optional and pointer members get a default holder, a guarded getter and `IsSet`.
    pub fn has_presence(&self) -> bool {
        self.field.is_optional() || self.is_pointer
    }

    /// Presence is trackable: pointer, container or binary.
    pub fn is_setable(&self) -> bool {
        self.is_pointer || self.is_nilable || self.is_binary
    }

    /// Suffix of the per-field codec method names (`1`, or `_1` for negative ids).
    pub fn method_suffix(&self) -> String {
        if self.field.id < 0 {
            format!("_{}", -i64::from(self.field.id))
        } else {
            self.field.id.to_string()
        }
    }
}

#[derive(Debug)]
pub struct StructPlan<'f> {
    pub def: &'f StructDef,
    pub role: StructRole<'f>,
    /// Exported Go type name.
    pub go_name: String,
    /// Members in declaration order.
    pub fields: Vec<FieldPlan<'f>>,
    /// Indices into `fields`, ordered by wire id.
    pub by_id: Vec<usize>,
}

impl<'f> StructPlan<'f> {
    pub fn build(ctx: &GenContext<'_>, def: &'f StructDef, role: StructRole<'f>) -> GenResult<Self> {
        let go_name = match role {
            StructRole::Plain => ctx.names.publicize(&def.name),
            StructRole::Args { service } | StructRole::Result { service } => {
                ctx.names.publicize_helper(&def.name, service)
            }
        };

        let schema = ctx.schema;
        let mut fields = Vec::with_capacity(def.fields().len());
        for field in def.fields() {
            let is_pointer = is_pointer_field(schema, field);
            let resolved = schema.true_type(&field.ty);
            let field_go_name = ctx.names.publicize(&field.name);
            let default_literal = match &field.default {
                Some(value) => Some(ctx.render_const(&field.ty, value, false)?),
                None => None,
            };
            fields.push(FieldPlan {
                field,
                default_var: format!("{go_name}_{field_go_name}_DEFAULT"),
                go_name: field_go_name,
                target_type: ctx.go_type(&field.ty, is_pointer)?,
                value_type: ctx.go_type(&field.ty, false)?,
                is_pointer,
                has_default: field.default.is_some(),
                is_omittable: omit_initialization(schema, field),
                default_literal,
                wire: ctx.wire_type(&field.ty)?,
                is_nilable: is_nilable_container(schema, &field.ty),
                is_binary: matches!(resolved, idlgo_ast::Type::Binary),
                is_struct: matches!(resolved, idlgo_ast::Type::Struct(_)),
            });
        }

        let mut by_id: Vec<usize> = (0..fields.len()).collect();
        by_id.sort_by_key(|&i| fields[i].field.id);

        Ok(Self {
            def,
            role,
            go_name,
            fields,
            by_id,
        })
    }

    pub fn sorted(&self) -> impl Iterator<Item = &FieldPlan<'f>> {
        self.by_id.iter().map(|&i| &self.fields[i])
    }

    pub fn required(&self) -> impl Iterator<Item = &FieldPlan<'f>> {
        self.fields.iter().filter(|f| f.field.is_required())
    }

    pub fn setable_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_setable()).count()
    }

    /// Unions with at least one setable member get `CountSetFields<Name>`.
    pub fn has_count_set_fields(&self) -> bool {
        self.def.is_union() && self.setable_count() > 0
    }

    pub fn count_set_fields_fn(&self) -> String {
        format!("CountSetFields{}", self.go_name)
    }
}
