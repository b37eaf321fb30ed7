//! Per-method helper structs: `<Service><Fn>Args` carries the arguments, `<Service><Fn>Result`
//! carries the return value (member `success`, id 0) and the declared exceptions.
//!
//! Every result member is optional; one-way methods have no result struct.

use idlgo_ast::{Field, Function, Requiredness, ServiceDef, StructDef, StructKind};

use crate::backend::context::GenContext;
use crate::backend::errors::GenResult;
use crate::backend::go_emitter::GoEmitter;
use crate::backend::structs::{StructRole, emit_struct};

/// IDL name of the member holding a method's return value.
pub(super) const SUCCESS_FIELD: &str = "success";

pub(super) fn emit_helpers(ctx: &mut GenContext<'_>, e: &mut GoEmitter, def: &ServiceDef) -> GenResult<()> {
    e.comment("HELPER FUNCTIONS AND STRUCTURES");
    e.blank_line();
    for function in &def.functions {
        let args = args_struct(def, function);
        emit_struct(ctx, e, &args, StructRole::Args { service: &def.name })?;
        if let Some(result) = result_struct(def, function) {
            emit_struct(ctx, e, &result, StructRole::Result { service: &def.name })?;
        }
    }
    Ok(())
}

fn args_struct(def: &ServiceDef, function: &Function) -> StructDef {
    StructDef::new(
        format!("{}_args", function.name),
        def.program,
        StructKind::Struct,
        function.args.clone(),
    )
}

/// The `success` member of a two-way method returning a value.
pub(super) fn success_field(function: &Function) -> Option<Field> {
    if function.oneway || function.returns.is_void() {
        return None;
    }
    Some(Field::new(0, SUCCESS_FIELD, function.returns.clone()).with_requiredness(Requiredness::Optional))
}

fn result_struct(def: &ServiceDef, function: &Function) -> Option<StructDef> {
    if function.oneway {
        return None;
    }
    let mut fields: Vec<Field> = success_field(function).into_iter().collect();
    fields.extend(
        function
            .throws
            .iter()
            .cloned()
            .map(|field| field.with_requiredness(Requiredness::Optional)),
    );
    Some(StructDef::new(
        format!("{}_result", function.name),
        def.program,
        StructKind::Struct,
        fields,
    ))
}

/// Go name of the argument struct of `function`, declared by `service`.
pub(super) fn args_type(ctx: &GenContext<'_>, service: &str, function: &Function) -> String {
    ctx.names.publicize_helper(&format!("{}_args", function.name), service)
}

/// Go name of the result struct of `function`, declared by `service`.
pub(super) fn result_type(ctx: &GenContext<'_>, service: &str, function: &Function) -> String {
    ctx.names.publicize_helper(&format!("{}_result", function.name), service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgo_ast::{ProgramId, Type};

    fn function(returns: Type, oneway: bool) -> Function {
        Function {
            name: "get".to_string(),
            args: vec![Field::new(1, "id", Type::I64)],
            returns,
            throws: vec![Field::new(1, "oops", Type::String).with_requiredness(Requiredness::Required)],
            oneway,
            doc: None,
        }
    }

    fn service() -> ServiceDef {
        ServiceDef {
            name: "Svc".to_string(),
            program: ProgramId(0),
            extends: None,
            functions: Vec::new(),
            doc: None,
        }
    }

    #[test]
    fn test_result_members_are_optional() {
        let result = result_struct(&service(), &function(Type::I32, false)).unwrap();
        let fields = result.fields();
        assert_eq!(fields[0].name, SUCCESS_FIELD);
        assert_eq!(fields[0].id, 0);
        assert!(fields.iter().all(Field::is_optional));
    }

    #[test]
    fn test_void_result_has_no_success() {
        let result = result_struct(&service(), &function(Type::Void, false)).unwrap();
        assert_eq!(result.fields().len(), 1);
        assert_eq!(result.fields()[0].name, "oops");
    }

    #[test]
    fn test_oneway_has_no_result() {
        assert!(result_struct(&service(), &function(Type::Void, true)).is_none());
        assert_eq!(args_struct(&service(), &function(Type::Void, true)).name, "get_args");
    }
}
