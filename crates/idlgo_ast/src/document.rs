//! JSON document format and the loader that resolves it into a [`Schema`].
//!
//! ## Notes
//! - Type expressions are a name (`"i32"`, `"User"`, `"shared.Point"`) or a container object
//!   (`{"list": T}`, `{"set": T}`, `{"map": [K, V]}`).
//! - Loading runs in three passes: register every definition name, resolve type references,
//!   then convert constant values against their (now resolved) declared types.
//! - Pass 2 also rejects typedef cycles, `extends` loops and duplicate field ids or names, so no
//!   later type walk can run forever.
//!
//! ## Examples
//! ```rust
//! use idlgo_ast::{load_str, Type};
//!
//! let schema = load_str(r#"{"programs": [{"name": "demo",
//!     "typedefs": [{"name": "Ids", "type": {"list": "i64"}}]}]}"#).unwrap();
//! let demo = schema.main_program().unwrap();
//! let td = schema.typedef(schema.program(demo).typedefs[0]);
//! assert_eq!(td.target, Type::List(Box::new(Type::I64)));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::ast::*;
use crate::errors::LoadError;

// ============================================================================
// Document format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSpec {
    /// Program generated in non-recursive mode; defaults to the last program.
    #[serde(default)]
    pub main: Option<String>,
    pub programs: Vec<ProgramSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramSpec {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub typedefs: Vec<TypedefSpec>,
    #[serde(default)]
    pub enums: Vec<EnumSpec>,
    #[serde(default)]
    pub consts: Vec<ConstSpec>,
    #[serde(default)]
    pub structs: Vec<StructSpec>,
    #[serde(default)]
    pub services: Vec<ServiceSpec>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Named(String),
    Container(ContainerSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerSpec {
    List(Box<TypeSpec>),
    Set(Box<TypeSpec>),
    Map(Box<TypeSpec>, Box<TypeSpec>),
}

fn void_type() -> TypeSpec {
    TypeSpec::Named("void".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypedefSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumSpec {
    pub name: String,
    pub values: Vec<EnumValueSpec>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValueSpec {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    pub value: Value,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructKindSpec {
    #[default]
    Struct,
    Union,
    Exception,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructSpec {
    pub name: String,
    #[serde(default)]
    pub kind: StructKindSpec,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirednessSpec {
    Required,
    Optional,
    #[default]
    Default,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default)]
    pub required: RequirednessSpec,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSpec {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<FieldSpec>,
    #[serde(default = "void_type")]
    pub returns: TypeSpec,
    #[serde(default)]
    pub throws: Vec<FieldSpec>,
    #[serde(default)]
    pub oneway: bool,
    #[serde(default)]
    pub doc: Option<String>,
}

// ============================================================================
// Entry points
// ============================================================================

/// Load a document from JSON text.
#[tracing::instrument(skip_all, fields(bytes = text.len()))]
pub fn load_str(text: &str) -> Result<Schema, LoadError> {
    let doc: DocumentSpec = serde_json::from_str(text)?;
    Loader::new(&doc).load()
}

/// Load a document from a JSON file.
pub fn load_file(path: &Path) -> Result<Schema, LoadError> {
    let text = std::fs::read_to_string(path)?;
    load_str(&text)
}

// ============================================================================
// Loader
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum DefRef {
    Typedef(TypedefId),
    Enum(EnumId),
    Struct(StructId),
    Service(ServiceId),
}

/// Where a field default is written back once converted.
#[derive(Debug, Clone, Copy)]
enum FieldSlot {
    Member(StructId, usize),
    Arg(ServiceId, usize, usize),
    Throw(ServiceId, usize, usize),
}

struct PendingDefault<'d> {
    slot: FieldSlot,
    ty: Type,
    value: &'d Value,
    target: String,
}

struct Loader<'d> {
    doc: &'d DocumentSpec,
    schema: Schema,
    scopes: Vec<HashMap<&'d str, DefRef>>,
    pending: Vec<PendingDefault<'d>>,
}

impl<'d> Loader<'d> {
    fn new(doc: &'d DocumentSpec) -> Self {
        Self {
            doc,
            schema: Schema::default(),
            scopes: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn load(mut self) -> Result<Schema, LoadError> {
        if self.doc.programs.is_empty() {
            return Err(LoadError::Empty);
        }
        self.register()?;
        self.resolve_definitions()?;
        self.convert_constants()?;

        let main = match &self.doc.main {
            Some(name) => self
                .schema
                .program_named(name)
                .ok_or_else(|| LoadError::UnknownProgram {
                    name: name.clone(),
                    from: "main".to_string(),
                })?,
            None => ProgramId((self.schema.programs.len() - 1) as u32),
        };
        self.schema.main = Some(main);

        tracing::debug!(
            programs = self.schema.programs.len(),
            structs = self.schema.structs.len(),
            services = self.schema.services.len(),
            "document loaded"
        );
        Ok(self.schema)
    }

    /// Pass 1: allocate ids for every named definition.
    fn register(&mut self) -> Result<(), LoadError> {
        let doc = self.doc;
        for spec in &doc.programs {
            if self.schema.program_named(&spec.name).is_some() {
                return Err(LoadError::DuplicateProgram(spec.name.clone()));
            }
            self.schema.programs.push(Program {
                name: spec.name.clone(),
                namespace: spec.namespace.clone().filter(|ns| !ns.is_empty()),
                includes: Vec::new(),
                typedefs: Vec::new(),
                enums: Vec::new(),
                consts: Vec::new(),
                structs: Vec::new(),
                services: Vec::new(),
                doc: spec.doc.clone(),
            });
            self.scopes.push(HashMap::new());
        }

        let (mut typedefs, mut structs, mut services) = (0u32, 0u32, 0u32);
        for (p, spec) in doc.programs.iter().enumerate() {
            let pid = ProgramId(p as u32);

            for name in &spec.includes {
                let included = self
                    .schema
                    .program_named(name)
                    .ok_or_else(|| LoadError::UnknownProgram {
                        name: name.clone(),
                        from: spec.name.clone(),
                    })?;
                self.schema.programs[p].includes.push(included);
            }

            for td in &spec.typedefs {
                let id = TypedefId(typedefs);
                typedefs += 1;
                self.declare(p, &td.name, DefRef::Typedef(id))?;
                self.schema.programs[p].typedefs.push(id);
            }

            for en in &spec.enums {
                let id = EnumId(self.schema.enums.len() as u32);
                self.declare(p, &en.name, DefRef::Enum(id))?;
                self.schema.enums.push(build_enum(pid, en));
                self.schema.programs[p].enums.push(id);
            }

            for st in &spec.structs {
                let id = StructId(structs);
                structs += 1;
                self.declare(p, &st.name, DefRef::Struct(id))?;
                self.schema.programs[p].structs.push(id);
            }

            for sv in &spec.services {
                let id = ServiceId(services);
                services += 1;
                self.declare(p, &sv.name, DefRef::Service(id))?;
                self.schema.programs[p].services.push(id);
            }
        }
        Ok(())
    }

    fn declare(&mut self, program: usize, name: &'d str, def: DefRef) -> Result<(), LoadError> {
        if self.scopes[program].insert(name, def).is_some() {
            return Err(LoadError::DuplicateDefinition {
                program: self.schema.programs[program].name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Pass 2: build typedefs, structs and services with resolved types.
    ///
    /// Definitions are pushed in the same order pass 1 allocated their ids.
    fn resolve_definitions(&mut self) -> Result<(), LoadError> {
        let doc = self.doc;
        for (p, spec) in doc.programs.iter().enumerate() {
            let pid = ProgramId(p as u32);
            for td in &spec.typedefs {
                let target = self.resolve_type(p, &td.ty)?;
                self.schema.typedefs.push(TypedefDef {
                    name: td.name.clone(),
                    program: pid,
                    target,
                    doc: td.doc.clone(),
                });
            }
        }
        self.check_typedef_cycles()?;

        for (p, spec) in doc.programs.iter().enumerate() {
            let pid = ProgramId(p as u32);
            for st in &spec.structs {
                let id = StructId(self.schema.structs.len() as u32);
                check_field_set(&st.name, &st.fields)?;
                let mut fields = Vec::with_capacity(st.fields.len());
                for (i, fs) in st.fields.iter().enumerate() {
                    let field = self.resolve_field(p, fs)?;
                    self.defer_default(FieldSlot::Member(id, i), &field, fs, &st.name);
                    fields.push(field);
                }
                let kind = match st.kind {
                    StructKindSpec::Struct => StructKind::Struct,
                    StructKindSpec::Union => StructKind::Union,
                    StructKindSpec::Exception => StructKind::Exception,
                };
                let def = StructDef::new(st.name.clone(), pid, kind, fields).with_doc(st.doc.clone());
                self.schema.structs.push(def);
            }
        }

        for (p, spec) in doc.programs.iter().enumerate() {
            let pid = ProgramId(p as u32);
            for sv in &spec.services {
                let id = ServiceId(self.schema.services.len() as u32);
                let extends = match &sv.extends {
                    Some(name) => match self.lookup(p, name)? {
                        DefRef::Service(parent) => Some(parent),
                        _ => {
                            return Err(LoadError::NotAService {
                                name: name.clone(),
                                service: sv.name.clone(),
                            });
                        }
                    },
                    None => None,
                };

                let mut functions = Vec::with_capacity(sv.functions.len());
                for (f, fs) in sv.functions.iter().enumerate() {
                    let owner = format!("{}.{}", sv.name, fs.name);
                    check_field_set(&owner, &fs.args)?;
                    check_field_set(&owner, &fs.throws)?;
                    let mut args = Vec::with_capacity(fs.args.len());
                    for (i, a) in fs.args.iter().enumerate() {
                        let field = self.resolve_field(p, a)?;
                        self.defer_default(FieldSlot::Arg(id, f, i), &field, a, &owner);
                        args.push(field);
                    }
                    let mut throws = Vec::with_capacity(fs.throws.len());
                    for (i, t) in fs.throws.iter().enumerate() {
                        let field = self.resolve_field(p, t)?;
                        self.defer_default(FieldSlot::Throw(id, f, i), &field, t, &owner);
                        throws.push(field);
                    }
                    functions.push(Function {
                        name: fs.name.clone(),
                        args,
                        returns: self.resolve_type(p, &fs.returns)?,
                        throws,
                        oneway: fs.oneway,
                        doc: fs.doc.clone(),
                    });
                }

                self.schema.services.push(ServiceDef {
                    name: sv.name.clone(),
                    program: pid,
                    extends,
                    functions,
                    doc: sv.doc.clone(),
                });
            }
        }
        self.check_extends_cycles()
    }

    /// Reject typedefs that reach themselves, directly or through a container.
    fn check_typedef_cycles(&self) -> Result<(), LoadError> {
        let mut state = vec![Visit::New; self.schema.typedefs.len()];
        for index in 0..state.len() {
            self.visit_typedef(TypedefId(index as u32), &mut state)?;
        }
        Ok(())
    }

    fn visit_typedef(&self, id: TypedefId, state: &mut [Visit]) -> Result<(), LoadError> {
        match state[id.index()] {
            Visit::Done => return Ok(()),
            Visit::Active => {
                let td = self.schema.typedef(id);
                return Err(LoadError::CyclicTypedef {
                    program: self.schema.program(td.program).name.clone(),
                    name: td.name.clone(),
                });
            }
            Visit::New => {}
        }
        state[id.index()] = Visit::Active;
        let mut targets = Vec::new();
        typedef_refs(&self.schema.typedef(id).target, &mut targets);
        for next in targets {
            self.visit_typedef(next, state)?;
        }
        state[id.index()] = Visit::Done;
        Ok(())
    }

    /// Reject `extends` chains that come back to a service already on the chain.
    fn check_extends_cycles(&self) -> Result<(), LoadError> {
        let services = &self.schema.services;
        for start in 0..services.len() {
            let mut seen = vec![false; services.len()];
            let mut current = Some(ServiceId(start as u32));
            while let Some(id) = current {
                if seen[id.index()] {
                    let def = &services[id.index()];
                    return Err(LoadError::CyclicExtends {
                        program: self.schema.program(def.program).name.clone(),
                        service: def.name.clone(),
                    });
                }
                seen[id.index()] = true;
                current = services[id.index()].extends;
            }
        }
        Ok(())
    }

    fn resolve_field(&self, program: usize, spec: &FieldSpec) -> Result<Field, LoadError> {
        let requiredness = match spec.required {
            RequirednessSpec::Required => Requiredness::Required,
            RequirednessSpec::Optional => Requiredness::Optional,
            RequirednessSpec::Default => Requiredness::Default,
        };
        let mut field = Field::new(spec.id, spec.name.clone(), self.resolve_type(program, &spec.ty)?)
            .with_requiredness(requiredness);
        field.annotations = spec.annotations.clone();
        field.doc = spec.doc.clone();
        Ok(field)
    }

    fn defer_default(&mut self, slot: FieldSlot, field: &Field, spec: &'d FieldSpec, owner: &str) {
        if let Some(value) = &spec.default {
            self.pending.push(PendingDefault {
                slot,
                ty: field.ty.clone(),
                value,
                target: format!("{owner}.{}", field.name),
            });
        }
    }

    /// Pass 3: convert field defaults and program constants.
    fn convert_constants(&mut self) -> Result<(), LoadError> {
        let mut converted = Vec::with_capacity(self.pending.len());
        for pending in &self.pending {
            let value = convert_const(&self.schema, &pending.ty, pending.value, &pending.target)?;
            converted.push((pending.slot, value));
        }
        for (slot, value) in converted {
            let field = match slot {
                FieldSlot::Member(id, i) => &mut self.schema.structs[id.index()].fields_mut()[i],
                FieldSlot::Arg(id, f, i) => &mut self.schema.services[id.index()].functions[f].args[i],
                FieldSlot::Throw(id, f, i) => &mut self.schema.services[id.index()].functions[f].throws[i],
            };
            field.default = Some(value);
        }

        let doc = self.doc;
        for (p, spec) in doc.programs.iter().enumerate() {
            for cs in &spec.consts {
                let ty = self.resolve_type(p, &cs.ty)?;
                let value = convert_const(&self.schema, &ty, &cs.value, &cs.name)?;
                self.schema.programs[p].consts.push(ConstDef {
                    name: cs.name.clone(),
                    ty,
                    value,
                    doc: cs.doc.clone(),
                });
            }
        }
        Ok(())
    }

    fn resolve_type(&self, program: usize, spec: &TypeSpec) -> Result<Type, LoadError> {
        match spec {
            TypeSpec::Named(name) => {
                if let Some(base) = base_type(name) {
                    return Ok(base);
                }
                match self.lookup(program, name)? {
                    DefRef::Typedef(id) => Ok(Type::Typedef(id)),
                    DefRef::Enum(id) => Ok(Type::Enum(id)),
                    DefRef::Struct(id) => Ok(Type::Struct(id)),
                    DefRef::Service(_) => Err(self.unknown_type(program, name)),
                }
            }
            TypeSpec::Container(ContainerSpec::List(elem)) => Ok(Type::List(Box::new(self.resolve_type(program, elem)?))),
            TypeSpec::Container(ContainerSpec::Set(elem)) => Ok(Type::Set(Box::new(self.resolve_type(program, elem)?))),
            TypeSpec::Container(ContainerSpec::Map(key, value)) => Ok(Type::Map(
                Box::new(self.resolve_type(program, key)?),
                Box::new(self.resolve_type(program, value)?),
            )),
        }
    }

    /// Resolve `Name` in the program's own scope, or `program.Name` in the program itself or one
    /// of its includes.
    fn lookup(&self, program: usize, name: &str) -> Result<DefRef, LoadError> {
        let (scope, local) = match name.split_once('.') {
            Some((prefix, local)) => match self.schema.program_named(prefix) {
                Some(pid) if pid.index() == program || self.schema.programs[program].includes.contains(&pid) => {
                    (pid.index(), local)
                }
                Some(_) => return Err(self.unknown_type(program, name)),
                None => (program, name),
            },
            None => (program, name),
        };
        self.scopes[scope]
            .get(local)
            .copied()
            .ok_or_else(|| self.unknown_type(program, name))
    }

    fn unknown_type(&self, program: usize, name: &str) -> LoadError {
        LoadError::UnknownType {
            program: self.schema.programs[program].name.clone(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Collect the typedefs a type names, looking inside containers.
fn typedef_refs(ty: &Type, out: &mut Vec<TypedefId>) {
    match ty {
        Type::Typedef(id) => out.push(*id),
        Type::List(elem) | Type::Set(elem) => typedef_refs(elem, out),
        Type::Map(key, value) => {
            typedef_refs(key, out);
            typedef_refs(value, out);
        }
        _ => {}
    }
}

/// Field ids and names must be unique within one struct, argument list or throws list.
fn check_field_set(owner: &str, fields: &[FieldSpec]) -> Result<(), LoadError> {
    for (i, field) in fields.iter().enumerate() {
        let earlier = &fields[..i];
        if earlier.iter().any(|f| f.id == field.id) {
            return Err(LoadError::DuplicateFieldId {
                owner: owner.to_string(),
                id: field.id,
            });
        }
        if earlier.iter().any(|f| f.name == field.name) {
            return Err(LoadError::DuplicateFieldName {
                owner: owner.to_string(),
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn base_type(name: &str) -> Option<Type> {
    Some(match name {
        "void" => Type::Void,
        "bool" => Type::Bool,
        "byte" | "i8" => Type::I8,
        "i16" => Type::I16,
        "i32" => Type::I32,
        "i64" => Type::I64,
        "double" => Type::Double,
        "string" => Type::String,
        "binary" => Type::Binary,
        _ => return None,
    })
}

fn build_enum(program: ProgramId, spec: &EnumSpec) -> EnumDef {
    let mut next = 0i64;
    let values = spec
        .values
        .iter()
        .map(|v| {
            let value = v.value.unwrap_or(next);
            next = value.wrapping_add(1);
            EnumValue {
                name: v.name.clone(),
                value,
                doc: v.doc.clone(),
            }
        })
        .collect();
    EnumDef {
        name: spec.name.clone(),
        program,
        values,
        doc: spec.doc.clone(),
    }
}

// ============================================================================
// Constant conversion
// ============================================================================

fn convert_const(schema: &Schema, ty: &Type, value: &Value, target: &str) -> Result<ConstValue, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidConstant {
        target: target.to_string(),
        ty: schema.display_type(ty),
        reason: reason.to_string(),
    };

    match schema.true_type(ty) {
        Type::Void => Err(invalid("void cannot hold a value")),
        Type::Bool => match value {
            Value::Bool(b) => Ok(ConstValue::Integer(i64::from(*b))),
            other => other
                .as_i64()
                .map(ConstValue::Integer)
                .ok_or_else(|| invalid("expected a boolean")),
        },
        Type::I8 | Type::I16 | Type::I32 | Type::I64 => value
            .as_i64()
            .map(ConstValue::Integer)
            .ok_or_else(|| invalid("expected an integer")),
        Type::Double => match value.as_i64() {
            Some(v) => Ok(ConstValue::Integer(v)),
            None => value
                .as_f64()
                .map(ConstValue::Double)
                .ok_or_else(|| invalid("expected a number")),
        },
        Type::String | Type::Binary => value
            .as_str()
            .map(|s| ConstValue::String(s.to_string()))
            .ok_or_else(|| invalid("expected a string")),
        Type::Enum(id) => match value {
            Value::String(name) => {
                let short = name.rsplit('.').next().unwrap_or(name);
                schema
                    .enum_def(*id)
                    .value_named(short)
                    .map(|v| ConstValue::Integer(v.value))
                    .ok_or_else(|| invalid(&format!("no enum value named {name}")))
            }
            other => other
                .as_i64()
                .map(ConstValue::Integer)
                .ok_or_else(|| invalid("expected an enum value")),
        },
        Type::Struct(id) => {
            let Value::Object(entries) = value else {
                return Err(invalid("expected an object"));
            };
            let def = schema.struct_def(*id);
            let mut out = Vec::with_capacity(entries.len());
            for (key, val) in entries {
                let converted = match def.field_named(key) {
                    Some(field) => convert_const(schema, &field.ty, val, target)?,
                    // left for the renderer to report against the struct
                    None => convert_untyped(val).ok_or_else(|| invalid("null is not a constant"))?,
                };
                out.push((ConstValue::String(key.clone()), converted));
            }
            Ok(ConstValue::Map(out))
        }
        Type::Map(key_ty, val_ty) => match value {
            Value::Object(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, val) in entries {
                    let key_value = key_from_text(schema, key_ty, key);
                    out.push((
                        convert_const(schema, key_ty, &key_value, target)?,
                        convert_const(schema, val_ty, val, target)?,
                    ));
                }
                Ok(ConstValue::Map(out))
            }
            Value::Array(pairs) => {
                let mut out = Vec::with_capacity(pairs.len());
                for pair in pairs {
                    match pair.as_array().map(Vec::as_slice) {
                        Some([k, v]) => out.push((
                            convert_const(schema, key_ty, k, target)?,
                            convert_const(schema, val_ty, v, target)?,
                        )),
                        _ => return Err(invalid("map entries must be [key, value] pairs")),
                    }
                }
                Ok(ConstValue::Map(out))
            }
            _ => Err(invalid("expected an object or a list of pairs")),
        },
        Type::List(elem) | Type::Set(elem) => {
            let Value::Array(items) = value else {
                return Err(invalid("expected an array"));
            };
            items
                .iter()
                .map(|item| convert_const(schema, elem, item, target))
                .collect::<Result<Vec<_>, _>>()
                .map(ConstValue::List)
        }
        Type::Typedef(_) => Err(invalid("unresolved typedef")),
    }
}

/// Reinterpret a JSON object key according to the map's key type.
fn key_from_text(schema: &Schema, key_ty: &Type, text: &str) -> Value {
    match schema.true_type(key_ty) {
        Type::Bool | Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Enum(_) => match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => text
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(text.to_string())),
        },
        Type::Double => text
            .parse::<i64>()
            .map(Value::from)
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(serde_json::Number::from_f64).map(Value::Number))
            .unwrap_or_else(|| Value::String(text.to_string())),
        _ => Value::String(text.to_string()),
    }
}

fn convert_untyped(value: &Value) -> Option<ConstValue> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => ConstValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(v) => ConstValue::Integer(v),
            None => ConstValue::Double(n.as_f64()?),
        },
        Value::String(s) => ConstValue::String(s.clone()),
        Value::Array(items) => ConstValue::List(items.iter().map(convert_untyped).collect::<Option<Vec<_>>>()?),
        Value::Object(entries) => ConstValue::Map(
            entries
                .iter()
                .map(|(k, v)| Some((ConstValue::String(k.clone()), convert_untyped(v)?)))
                .collect::<Option<Vec<_>>>()?,
        ),
    })
}
