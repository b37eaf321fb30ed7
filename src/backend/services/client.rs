//! Service client: constructors, response-metadata accessors and one method per function.

use idlgo_ast::{Function, ServiceDef, Type};
use idlgo_core::lang::runtime::AppExceptionKind;
use idlgo_core::strings::escape_go_string;

use super::helpers::{args_type, result_type};
use super::{ParentRef, param_name, signature};
use crate::backend::context::GenContext;
use crate::backend::docs::{emit_doc, emit_member_doc};
use crate::backend::errors::GenResult;
use crate::backend::go_emitter::{GoEmitter, goln};

pub(super) fn emit_client(ctx: &mut GenContext<'_>, e: &mut GoEmitter, def: &ServiceDef) -> GenResult<()> {
    let client = format!("{}Client", ctx.names.publicize(&def.name));
    let parent = ParentRef::of(ctx, def);

    emit_doc(e, def.doc.as_deref());
    e.block(&format!("type {client} struct"), |e| match &parent {
        Some(parent) => goln!(e, "*{}", parent.type_ref("Client")),
        None => {
            e.line("c thrift.TClient");
            e.line("meta thrift.ResponseMeta");
        }
    });
    e.blank_line();
    emit_constructors(e, &client, parent.as_ref());

    for function in &def.functions {
        let header = format!("func (p *{client}) {}", signature(ctx, function)?);
        emit_member_doc(e, &ctx.names, function.doc.as_deref(), "Parameters", &function.args);
        e.block(&header, |e| emit_call(ctx, e, def, function));
        e.blank_line();
    }
    Ok(())
}

fn emit_constructors(e: &mut GoEmitter, client: &str, parent: Option<&ParentRef>) {
    let embed = |call: &str| parent.map(|p| (p.embedded("Client"), format!("{}{call}", p.constructor("Client"))));

    e.block(
        &format!("func New{client}Factory(t thrift.TTransport, f thrift.TProtocolFactory) *{client}"),
        |e| match embed("Factory(t, f)") {
            Some((field, call)) => goln!(e, "return &{client}{{{field}: {call}}}"),
            None => composite(e, client, "c: thrift.NewTStandardClient(f.GetProtocol(t), f.GetProtocol(t)),"),
        },
    );
    e.blank_line();

    e.block(
        &format!("func New{client}Protocol(t thrift.TTransport, iprot thrift.TProtocol, oprot thrift.TProtocol) *{client}"),
        |e| match embed("Protocol(t, iprot, oprot)") {
            Some((field, call)) => goln!(e, "return &{client}{{{field}: {call}}}"),
            None => composite(e, client, "c: thrift.NewTStandardClient(iprot, oprot),"),
        },
    );
    e.blank_line();

    e.block(&format!("func New{client}(c thrift.TClient) *{client}"), |e| match embed("(c)") {
        Some((field, call)) => composite(e, client, &format!("{field}: {call},")),
        None => composite(e, client, "c: c,"),
    });
    e.blank_line();

    if parent.is_some() {
        return;
    }
    e.block(&format!("func (p *{client}) Client_() thrift.TClient"), |e| e.line("return p.c"));
    e.blank_line();
    e.block(&format!("func (p *{client}) LastResponseMeta_() thrift.ResponseMeta"), |e| {
        e.line("return p.meta");
    });
    e.blank_line();
    e.block(&format!("func (p *{client}) SetLastResponseMeta_(meta thrift.ResponseMeta)"), |e| {
        e.line("p.meta = meta");
    });
    e.blank_line();
}

/// `return &Client{` with one member per line.
fn composite(e: &mut GoEmitter, client: &str, member: &str) {
    goln!(e, "return &{client}{{");
    e.indented(|e| e.line(member));
    e.line("}");
}

/// Body of one client method: fill the argument struct, call, then unpack the result struct.
fn emit_call(ctx: &mut GenContext<'_>, e: &mut GoEmitter, def: &ServiceDef, function: &Function) {
    let method = escape_go_string(&function.name);
    let args = ctx.tmp("_args");
    goln!(e, "var {args} {}", args_type(ctx, &def.name, function));
    for arg in &function.args {
        goln!(e, "{args}.{} = {}", ctx.names.publicize(&arg.name), param_name(&arg.name));
    }

    if function.oneway {
        e.line("p.SetLastResponseMeta_(thrift.ResponseMeta{})");
        e.block(
            &format!("if _, err := p.Client_().Call(ctx, \"{method}\", &{args}, nil); err != nil"),
            |e| e.line("return err"),
        );
        e.line("return nil");
        return;
    }

    let meta = ctx.tmp("_meta");
    let result = ctx.tmp("_result");
    goln!(e, "var {result} {}", result_type(ctx, &def.name, function));
    goln!(e, "var {meta} thrift.ResponseMeta");
    goln!(e, "{meta}, _err = p.Client_().Call(ctx, \"{method}\", &{args}, &{result})");
    goln!(e, "p.SetLastResponseMeta_({meta})");
    e.block("if _err != nil", |e| e.line("return"));

    let returns_value = !function.returns.is_void();
    if !function.throws.is_empty() {
        e.switch("switch", |e| {
            for thrown in &function.throws {
                let member = format!("{result}.{}", ctx.names.publicize(&thrown.name));
                e.case(&format!("{member} != nil"), |e| {
                    if returns_value {
                        goln!(e, "return _r, {member}");
                    } else {
                        goln!(e, "return {member}");
                    }
                });
            }
        });
        e.blank_line();
    }

    let schema = ctx.schema;
    if matches!(schema.true_type(&function.returns), Type::Struct(_)) {
        let ret = ctx.tmp("_ret");
        e.block(&format!("if {ret} := {result}.GetSuccess(); {ret} != nil"), |e| {
            goln!(e, "return {ret}, nil");
        });
        goln!(
            e,
            "return nil, thrift.NewTApplicationException({}, \"{method} failed: unknown result\")",
            AppExceptionKind::MissingResult.as_go()
        );
    } else if returns_value {
        goln!(e, "return {result}.GetSuccess(), nil");
    } else {
        e.line("return nil");
    }
}
