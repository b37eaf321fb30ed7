//! Service emission: the handler interface, a client, a processor that dispatches by method
//! name, the per-method helper structs and the optional remote command-line tool.
//!
//! ## Notes
//! - A service that extends another embeds the parent's client and processor, and its interface
//!   embeds the parent interface. The parent may live in an included module.
//! - Helper structs are named after the service that declares the method, so two services with a
//!   method of the same name never collide.

mod client;
mod helpers;
mod interface;
mod processor;
pub mod remote;

use idlgo_ast::{Function, ServiceDef};

use super::context::GenContext;
use super::errors::GenResult;
use super::go_emitter::GoEmitter;
use super::naming::escape_keyword;

/// Write the interface, client, processor and helper structs of one service.
#[tracing::instrument(skip_all, fields(name = %def.name))]
pub fn emit_service(ctx: &mut GenContext<'_>, e: &mut GoEmitter, def: &ServiceDef) -> GenResult<()> {
    interface::emit_interface(ctx, e, def)?;
    client::emit_client(ctx, e, def)?;
    processor::emit_processor(ctx, e, def)?;
    helpers::emit_helpers(ctx, e, def)?;
    tracing::debug!(functions = def.functions.len(), "emitted service");
    Ok(())
}

/// How the parent of an extending service is spelled from the current package.
#[derive(Debug, Clone)]
struct ParentRef {
    /// `alias.` for a parent in another module, empty otherwise.
    qualifier: String,
    name: String,
}

impl ParentRef {
    fn of(ctx: &GenContext<'_>, def: &ServiceDef) -> Option<Self> {
        let parent = ctx.schema.service(def.extends?);
        let qualifier = ctx
            .module_qualifier(parent.program)
            .map(|alias| format!("{alias}."))
            .unwrap_or_default();
        Some(Self {
            qualifier,
            name: ctx.names.publicize(&parent.name),
        })
    }

    /// `pkg.ParentClient` for `suffix = "Client"`.
    fn type_ref(&self, suffix: &str) -> String {
        format!("{}{}{suffix}", self.qualifier, self.name)
    }

    /// `pkg.NewParentClient` for `suffix = "Client"`.
    fn constructor(&self, suffix: &str) -> String {
        format!("{}New{}{suffix}", self.qualifier, self.name)
    }

    /// Name of the embedded member (`ParentClient`).
    fn embedded(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.name)
    }
}

/// Go parameter name of a function argument.
fn param_name(name: &str) -> String {
    escape_keyword(name)
}

/// `Name(ctx context.Context, a T) (_r R, _err error)`, shared by the interface and the client.
fn signature(ctx: &GenContext<'_>, function: &Function) -> GenResult<String> {
    let mut params = vec!["ctx context.Context".to_string()];
    for arg in &function.args {
        params.push(format!("{} {}", param_name(&arg.name), ctx.go_type(&arg.ty, false)?));
    }
    let results = if function.returns.is_void() {
        "_err error".to_string()
    } else {
        format!("_r {}, _err error", ctx.go_type(&function.returns, false)?)
    };
    Ok(format!(
        "{}({}) ({results})",
        ctx.names.publicize(&function.name),
        params.join(", ")
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::options::GeneratorOptions;
    use idlgo_ast::{Schema, load_str};

    const DOC: &str = r#"{"main": "demo", "programs": [
        {"name": "base", "namespace": "acme.base", "services": [
            {"name": "Health", "functions": [{"name": "ping", "returns": "void"}]}
        ]},
        {"name": "demo", "includes": ["base"],
         "structs": [
            {"name": "User", "fields": [{"id": 1, "name": "name", "type": "string"}]},
            {"name": "NotFound", "kind": "exception", "fields": [{"id": 1, "name": "message", "type": "string"}]}
         ],
         "services": [
            {"name": "user_service", "doc": "Manages users.", "extends": "base.Health", "functions": [
                {"name": "get_user", "doc": "Fetch one user.",
                 "args": [{"id": 1, "name": "id", "type": "i64"}, {"id": 2, "name": "type", "type": "string"}],
                 "returns": "User",
                 "throws": [{"id": 1, "name": "missing", "type": "NotFound"}]},
                {"name": "count", "returns": "i32"},
                {"name": "touch", "args": [{"id": 1, "name": "id", "type": "i64"}], "returns": "void", "oneway": true}
            ]}
         ]}
    ]}"#;

    fn emit() -> String {
        emit_first_service("demo")
    }

    fn emit_first_service(program: &str) -> String {
        let schema: Schema = load_str(DOC).unwrap();
        let options = GeneratorOptions::default();
        let pid = schema.program_named(program).unwrap();
        let mut ctx = GenContext::new(&schema, &options, pid);
        crate::backend::imports::resolve_includes(&mut ctx);
        let mut e = GoEmitter::new();
        let id = schema.program(pid).services[0];
        emit_service(&mut ctx, &mut e, schema.service(id)).unwrap();
        e.finish()
    }

    /// Body of one generated Go function, from its header through the closing brace.
    fn function_body<'c>(code: &'c str, header: &str) -> &'c str {
        let start = code.find(header).unwrap();
        let body = &code[start..];
        &body[..body.find("\n}\n").unwrap()]
    }

    #[test]
    fn test_interface_embeds_parent_and_escapes_params() {
        let code = emit();
        assert!(code.contains("type UserService interface {\n\tbase.Health\n\t// Manages users.\n\n"));
        assert!(code.contains("\t// Fetch one user.\n\t// Parameters:\n\t//  - ID\n\t//  - Type\n"));
        assert!(code.contains(
            "\tGetUser(ctx context.Context, id int64, type_a1 string) (_r *User, _err error)\n"
        ));
        assert!(code.contains("\tCount(ctx context.Context) (_r int32, _err error)\n"));
    }

    #[test]
    fn test_client_embeds_parent_client() {
        let code = emit();
        assert!(code.contains("type UserServiceClient struct {\n\t*base.HealthClient\n}\n"));
        assert!(code.contains("return &UserServiceClient{HealthClient: base.NewHealthClientFactory(t, f)}"));
        assert!(code.contains("\t\tHealthClient: base.NewHealthClient(c),\n"));
        assert!(!code.contains("func (p *UserServiceClient) Client_()"));
    }

    #[test]
    fn test_client_call_paths() {
        let code = emit();
        assert!(code.contains("UserServiceGetUserArgs\n"));
        assert!(code.contains(".Type = type_a1\n"));
        assert!(code.contains("_err = p.Client_().Call(ctx, \"get_user\", &_args"));
        assert!(code.contains(".Missing != nil:\n\t\treturn _r, _result"));
        assert!(code.contains("thrift.NewTApplicationException(thrift.MISSING_RESULT, \"get_user failed: unknown result\")"));
        assert!(code.contains(".GetSuccess(), nil\n"));
        assert!(code.contains("p.SetLastResponseMeta_(thrift.ResponseMeta{})\n"));
        assert!(code.contains("if _, err := p.Client_().Call(ctx, \"touch\", &_args"));
    }

    #[test]
    fn test_processor_dispatch() {
        let code = emit();
        assert!(code.contains("type UserServiceProcessor struct {\n\t*base.HealthProcessor\n}\n"));
        assert!(code.contains(":= &UserServiceProcessor{base.NewHealthProcessor(handler)}"));
        assert!(code.contains(".AddToProcessorMap(\"get_user\", &userServiceProcessorGetUser{handler: handler})"));
        assert!(code.contains("if retval, err2 := p.handler.GetUser(ctx, args.ID, args.Type); err2 != nil {"));
        assert!(code.contains("\t\tcase *NotFound:\n\t\t\tresult.Missing = v\n"));
        assert!(code.contains("if errors.Is(err2, thrift.ErrAbandonRequest) {"));
        assert!(code.contains("result.Success = retval\n"));
        assert!(code.contains("result.Success = &retval\n"));
        assert!(code.contains("if thrift.ServerConnectivityCheckInterval > 0 {"));
    }

    #[test]
    fn test_unknown_method_is_drained_and_answered() {
        let code = emit_first_service("base");
        let body = function_body(&code, "func (p *HealthProcessor) Process(");
        assert!(body.contains("if processor, ok := p.GetProcessorFunction(name); ok {"));
        assert!(body.contains("iprot.Skip(ctx, thrift.STRUCT)\n\tiprot.ReadMessageEnd(ctx)\n"));
        assert!(body.contains("thrift.NewTApplicationException(thrift.UNKNOWN_METHOD, \"Unknown function \" + name)"));
        assert!(body.contains("oprot.WriteMessageBegin(ctx, name, thrift.EXCEPTION, seqId)"));
        assert!(body.contains("return false, x"));
    }

    #[test]
    fn test_argument_decode_failure_replies_on_two_way_calls() {
        let code = emit();
        let get_user = function_body(&code, "func (p *userServiceProcessorGetUser) Process(");
        assert!(get_user.contains("if err2 := args.Read(ctx, iprot); err2 != nil {"));
        assert!(get_user.contains(
            "\t\tx := thrift.NewTApplicationException(thrift.PROTOCOL_ERROR, err2.Error())\n\t\toprot.WriteMessageBegin(ctx, \"get_user\", thrift.EXCEPTION, seqId)\n"
        ));

        let touch = function_body(&code, "func (p *userServiceProcessorTouch) Process(");
        assert!(touch.contains("if err2 := args.Read(ctx, iprot); err2 != nil {"));
        assert!(!touch.contains("PROTOCOL_ERROR"));
    }

    #[test]
    fn test_undeclared_handler_failure_is_internal_error() {
        let code = emit();
        let get_user = function_body(&code, "func (p *userServiceProcessorGetUser) Process(");
        assert!(get_user.contains(
            "thrift.NewTApplicationException(thrift.INTERNAL_ERROR, \"Internal error processing get_user: \" + err2.Error())"
        ));
        let count = function_body(&code, "func (p *userServiceProcessorCount) Process(");
        assert!(count.contains("\"Internal error processing count: \""));
    }

    #[test]
    fn test_oneway_never_replies() {
        let code = emit();
        let body = function_body(&code, "func (p *userServiceProcessorTouch) Process(");
        assert!(body.contains("_ = tickerCancel"));
        assert!(!body.contains("WriteMessageBegin"));
        assert!(!body.contains("result :="));
    }

    #[test]
    fn test_helper_structs() {
        let code = emit();
        assert!(code.contains("// HELPER FUNCTIONS AND STRUCTURES\n"));
        assert!(code.contains("type UserServiceGetUserArgs struct {"));
        assert!(code.contains("type UserServiceGetUserResult struct {"));
        assert!(code.contains("Success *User `thrift:\"success,0\" db:\"success\" json:\"success,omitempty\"`"));
        assert!(code.contains("type UserServiceCountResult struct {"));
        assert!(code.contains("type UserServiceTouchArgs struct {"));
        assert!(!code.contains("UserServiceTouchResult"));
    }
}
