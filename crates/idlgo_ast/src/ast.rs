//! Resolved interface-definition tree.
//!
//! Every definition lives in an arena owned by [`Schema`] and is addressed by a typed id, so a
//! struct may refer to itself (directly or through a container) without reference cycles.

use std::collections::BTreeMap;
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of the definition in its arena.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// A program (one IDL file).
    ProgramId
);
arena_id!(StructId);
arena_id!(EnumId);
arena_id!(TypedefId);
arena_id!(ServiceId);

// ============================================================================
// Types
// ============================================================================

/// An IDL type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    Enum(EnumId),
    Struct(StructId),
    Typedef(TypedefId),
    List(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>, Box<Type>),
}

impl Type {
    /// Spelling of a base type in IDL source, or `None` for named and container types.
    pub fn base_name(&self) -> Option<&'static str> {
        Some(match self {
            Type::Void => "void",
            Type::Bool => "bool",
            Type::I8 => "i8",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::Double => "double",
            Type::String => "string",
            Type::Binary => "binary",
            _ => return None,
        })
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Type::List(_) | Type::Set(_) | Type::Map(..))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

// ============================================================================
// Constants
// ============================================================================

/// A constant value, already converted against its declared type.
///
/// Booleans and enum values are stored as integers; a double written without a fraction stays an
/// `Integer` so renderers can keep the literal kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Integer(i64),
    Double(f64),
    String(String),
    List(Vec<ConstValue>),
    /// Entries in source order. Struct constants use `String` keys naming members.
    Map(Vec<(ConstValue, ConstValue)>),
}

impl ConstValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConstValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Integer(v) => write!(f, "{v}"),
            ConstValue::Double(v) => write!(f, "{v:?}"),
            ConstValue::String(s) => write!(f, "{s:?}"),
            ConstValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ConstValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Field presence policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requiredness {
    Required,
    Optional,
    #[default]
    Default,
}

/// A struct member, function argument or declared exception.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Wire id; may be negative for legacy implicit ids.
    pub id: i32,
    pub ty: Type,
    pub requiredness: Requiredness,
    pub default: Option<ConstValue>,
    pub annotations: BTreeMap<String, String>,
    pub doc: Option<String>,
}

impl Field {
    pub fn new(id: i32, name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            id,
            ty,
            requiredness: Requiredness::Default,
            default: None,
            annotations: BTreeMap::new(),
            doc: None,
        }
    }

    pub fn with_requiredness(mut self, requiredness: Requiredness) -> Self {
        self.requiredness = requiredness;
        self
    }

    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn is_required(&self) -> bool {
        self.requiredness == Requiredness::Required
    }

    pub fn is_optional(&self) -> bool {
        self.requiredness == Requiredness::Optional
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructKind {
    #[default]
    Struct,
    Union,
    Exception,
}

/// A struct, union or exception.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub program: ProgramId,
    pub kind: StructKind,
    fields: Vec<Field>,
    pub doc: Option<String>,
}

impl StructDef {
    /// Build a struct definition.
    ///
    /// Union members are coerced to `Optional` here, before any consumer looks at them.
    pub fn new(name: impl Into<String>, program: ProgramId, kind: StructKind, mut fields: Vec<Field>) -> Self {
        if kind == StructKind::Union {
            for field in &mut fields {
                field.requiredness = Requiredness::Optional;
            }
        }
        Self {
            name: name.into(),
            program,
            kind,
            fields,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }

    /// Members in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Members ordered by wire id. Ties keep declaration order.
    pub fn sorted_fields(&self) -> Vec<&Field> {
        let mut sorted: Vec<&Field> = self.fields.iter().collect();
        sorted.sort_by_key(|f| f.id);
        sorted
    }

    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_union(&self) -> bool {
        self.kind == StructKind::Union
    }

    pub fn is_exception(&self) -> bool {
        self.kind == StructKind::Exception
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub program: ProgramId,
    pub values: Vec<EnumValue>,
    pub doc: Option<String>,
}

impl EnumDef {
    pub fn value_named(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDef {
    pub name: String,
    pub program: ProgramId,
    pub target: Type,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    pub name: String,
    pub ty: Type,
    pub value: ConstValue,
    pub doc: Option<String>,
}

/// An RPC function. `args` and `throws` become synthetic structs at generation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub args: Vec<Field>,
    pub returns: Type,
    pub throws: Vec<Field>,
    pub oneway: bool,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub name: String,
    pub program: ProgramId,
    pub extends: Option<ServiceId>,
    pub functions: Vec<Function>,
    pub doc: Option<String>,
}

/// One IDL file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    /// The `go` namespace, dotted (`acme.shared`).
    pub namespace: Option<String>,
    pub includes: Vec<ProgramId>,
    pub typedefs: Vec<TypedefId>,
    pub enums: Vec<EnumId>,
    pub consts: Vec<ConstDef>,
    pub structs: Vec<StructId>,
    pub services: Vec<ServiceId>,
    pub doc: Option<String>,
}

// ============================================================================
// Schema arena
// ============================================================================

/// All programs of one document and the definitions they declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub(crate) programs: Vec<Program>,
    pub(crate) structs: Vec<StructDef>,
    pub(crate) enums: Vec<EnumDef>,
    pub(crate) typedefs: Vec<TypedefDef>,
    pub(crate) services: Vec<ServiceDef>,
    pub(crate) main: Option<ProgramId>,
}

impl Schema {
    pub fn program(&self, id: ProgramId) -> &Program {
        &self.programs[id.index()]
    }

    pub fn struct_def(&self, id: StructId) -> &StructDef {
        &self.structs[id.index()]
    }

    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.index()]
    }

    pub fn typedef(&self, id: TypedefId) -> &TypedefDef {
        &self.typedefs[id.index()]
    }

    pub fn service(&self, id: ServiceId) -> &ServiceDef {
        &self.services[id.index()]
    }

    pub fn programs(&self) -> impl Iterator<Item = (ProgramId, &Program)> {
        self.programs
            .iter()
            .enumerate()
            .map(|(i, p)| (ProgramId(i as u32), p))
    }

    pub fn program_named(&self, name: &str) -> Option<ProgramId> {
        self.programs
            .iter()
            .position(|p| p.name == name)
            .map(|i| ProgramId(i as u32))
    }

    /// The program to generate when not generating recursively.
    pub fn main_program(&self) -> Option<ProgramId> {
        self.main
    }

    /// Follow typedefs until a non-typedef type is reached.
    pub fn true_type<'t>(&'t self, mut ty: &'t Type) -> &'t Type {
        while let Type::Typedef(id) = ty {
            ty = &self.typedef(*id).target;
        }
        ty
    }

    /// Program that declares a named type, `None` for base and container types.
    pub fn program_of(&self, ty: &Type) -> Option<ProgramId> {
        match ty {
            Type::Enum(id) => Some(self.enum_def(*id).program),
            Type::Struct(id) => Some(self.struct_def(*id).program),
            Type::Typedef(id) => Some(self.typedef(*id).program),
            _ => None,
        }
    }

    /// IDL spelling of a type (`list<i32>`, `shared.Point`).
    pub fn display_type(&self, ty: &Type) -> String {
        if let Some(name) = ty.base_name() {
            return name.to_string();
        }
        match ty {
            Type::Enum(id) => self.enum_def(*id).name.clone(),
            Type::Struct(id) => self.struct_def(*id).name.clone(),
            Type::Typedef(id) => self.typedef(*id).name.clone(),
            Type::List(elem) => format!("list<{}>", self.display_type(elem)),
            Type::Set(elem) => format!("set<{}>", self.display_type(elem)),
            Type::Map(k, v) => format!("map<{},{}>", self.display_type(k), self.display_type(v)),
            _ => String::new(),
        }
    }
}
