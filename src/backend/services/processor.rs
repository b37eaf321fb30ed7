//! Server-side dispatch: a processor holding a method-name registry, and one private processor
//! function per method that decodes arguments, calls the handler and writes the reply.
//!
//! ## Notes
//! - Reply writes funnel through one `_write_err` variable, so only the first failing write is
//!   reported.
//! - Two-way methods start a liveness check when `thrift.ServerConnectivityCheckInterval` is
//!   positive; it cancels the call's context once the transport closes. One-way methods never
//!   start it and never reply.

use idlgo_ast::{Function, ServiceDef, Type};
use idlgo_core::lang::runtime::AppExceptionKind;
use idlgo_core::strings::escape_go_string;

use super::ParentRef;
use super::helpers::{args_type, result_type, success_field};
use crate::backend::context::GenContext;
use crate::backend::errors::GenResult;
use crate::backend::go_emitter::{GoEmitter, goln};
use crate::backend::types::is_pointer_field;

const PROCESSOR_MAP: &str = "map[string]thrift.TProcessorFunction";

pub(super) fn emit_processor(ctx: &mut GenContext<'_>, e: &mut GoEmitter, def: &ServiceDef) -> GenResult<()> {
    let service = ctx.names.publicize(&def.name);
    let processor = format!("{service}Processor");
    let this = ctx.tmp("self");
    let registrations: Vec<(String, String)> = def
        .functions
        .iter()
        .map(|f| (escape_go_string(&f.name), function_processor(ctx, def, f)))
        .collect();

    match ParentRef::of(ctx, def) {
        None => {
            e.block(&format!("type {processor} struct"), |e| {
                goln!(e, "processorMap {PROCESSOR_MAP}");
                goln!(e, "handler {service}");
            });
            e.blank_line();
            e.block(
                &format!("func (p *{processor}) AddToProcessorMap(key string, processor thrift.TProcessorFunction)"),
                |e| e.line("p.processorMap[key] = processor"),
            );
            e.blank_line();
            e.block(
                &format!(
                    "func (p *{processor}) GetProcessorFunction(key string) (processor thrift.TProcessorFunction, ok bool)"
                ),
                |e| {
                    e.line("processor, ok = p.processorMap[key]");
                    e.line("return processor, ok");
                },
            );
            e.blank_line();
            e.block(&format!("func (p *{processor}) ProcessorMap() {PROCESSOR_MAP}"), |e| {
                e.line("return p.processorMap");
            });
            e.blank_line();
            e.block(&format!("func New{processor}(handler {service}) *{processor}"), |e| {
                goln!(e, "{this} := &{processor}{{handler: handler, processorMap: make({PROCESSOR_MAP})}}");
                for (method, function) in &registrations {
                    goln!(e, "{this}.processorMap[\"{method}\"] = &{function}{{handler: handler}}");
                }
                goln!(e, "return {this}");
            });
            e.blank_line();
            let x = ctx.tmp("x");
            emit_process(e, &processor, &x);
        }
        Some(parent) => {
            e.block(&format!("type {processor} struct"), |e| {
                goln!(e, "*{}", parent.type_ref("Processor"));
            });
            e.blank_line();
            e.block(&format!("func New{processor}(handler {service}) *{processor}"), |e| {
                goln!(e, "{this} := &{processor}{{{}(handler)}}", parent.constructor("Processor"));
                for (method, function) in &registrations {
                    goln!(e, "{this}.AddToProcessorMap(\"{method}\", &{function}{{handler: handler}})");
                }
                goln!(e, "return {this}");
            });
            e.blank_line();
        }
    }

    for function in &def.functions {
        emit_process_function(ctx, e, def, function)?;
    }
    e.blank_line();
    Ok(())
}

/// Private processor type of one method (`userServiceProcessorGetUser`).
fn function_processor(ctx: &GenContext<'_>, def: &ServiceDef, function: &Function) -> String {
    format!(
        "{}Processor{}",
        ctx.names.privatize(&def.name),
        ctx.names.publicize(&function.name)
    )
}

/// The registry lookup; an unknown method is drained and answered with `UNKNOWN_METHOD`.
fn emit_process(e: &mut GoEmitter, processor: &str, x: &str) {
    e.block(
        &format!(
            "func (p *{processor}) Process(ctx context.Context, iprot, oprot thrift.TProtocol) (success bool, err thrift.TException)"
        ),
        |e| {
            e.line("name, _, seqId, err2 := iprot.ReadMessageBegin(ctx)");
            e.block("if err2 != nil", |e| e.line("return false, thrift.WrapTException(err2)"));
            e.block("if processor, ok := p.GetProcessorFunction(name); ok", |e| {
                e.line("return processor.Process(ctx, seqId, iprot, oprot)");
            });
            e.line("iprot.Skip(ctx, thrift.STRUCT)");
            e.line("iprot.ReadMessageEnd(ctx)");
            goln!(
                e,
                "{x} := thrift.NewTApplicationException({}, \"Unknown function \" + name)",
                AppExceptionKind::UnknownMethod.as_go()
            );
            e.line("oprot.WriteMessageBegin(ctx, name, thrift.EXCEPTION, seqId)");
            goln!(e, "{x}.Write(ctx, oprot)");
            e.line("oprot.WriteMessageEnd(ctx)");
            e.line("oprot.Flush(ctx)");
            goln!(e, "return false, {x}");
        },
    );
    e.blank_line();
}

fn emit_process_function(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    def: &ServiceDef,
    function: &Function,
) -> GenResult<()> {
    let name = function_processor(ctx, def, function);
    let method = escape_go_string(&function.name);
    let two_way = !function.oneway;
    let write_err = if two_way { ctx.tmp("_write_err") } else { String::new() };
    let read = ctx.options.read_method();
    let write = ctx.options.write_method();

    let mut exception_cases = Vec::with_capacity(function.throws.len());
    for thrown in &function.throws {
        exception_cases.push((ctx.go_type(&thrown.ty, false)?, ctx.names.publicize(&thrown.name)));
    }
    let success = success_field(function);
    let schema = ctx.schema;
    // Structs are already pointers; other pointer-held results are stored by address.
    let success_by_reference = success.as_ref().is_some_and(|field| {
        is_pointer_field(schema, field) && !matches!(schema.true_type(&field.ty), Type::Struct(_))
    });
    let exc = if two_way { ctx.tmp("_exc") } else { String::new() };

    let mut call = vec!["ctx".to_string()];
    call.extend(function.args.iter().map(|arg| format!("args.{}", ctx.names.publicize(&arg.name))));
    let call = format!("p.handler.{}({})", ctx.names.publicize(&function.name), call.join(", "));
    let assign = if success.is_some() { "retval, err2" } else { "err2" };

    e.block(&format!("type {name} struct"), |e| {
        goln!(e, "handler {}", ctx.names.publicize(&def.name));
    });
    e.blank_line();

    let header = format!(
        "func (p *{name}) Process(ctx context.Context, seqId int32, iprot, oprot thrift.TProtocol) (success bool, err thrift.TException)"
    );
    e.block(&header, |e| {
        if two_way {
            goln!(e, "var {write_err} error");
        }
        goln!(e, "args := {}{{}}", args_type(ctx, &def.name, function));
        e.block(&format!("if err2 := args.{read}(ctx, iprot); err2 != nil"), |e| {
            e.line("iprot.ReadMessageEnd(ctx)");
            if two_way {
                goln!(
                    e,
                    "x := thrift.NewTApplicationException({}, err2.Error())",
                    AppExceptionKind::ProtocolError.as_go()
                );
                goln!(e, "oprot.WriteMessageBegin(ctx, \"{method}\", thrift.EXCEPTION, seqId)");
                e.line("x.Write(ctx, oprot)");
                e.line("oprot.WriteMessageEnd(ctx)");
                e.line("oprot.Flush(ctx)");
            }
            e.line("return false, thrift.WrapTException(err2)");
        });
        e.line("iprot.ReadMessageEnd(ctx)");
        e.blank_line();

        e.line("tickerCancel := func() {}");
        if two_way {
            emit_connectivity_check(e);
        } else {
            e.line("_ = tickerCancel");
        }
        e.blank_line();

        if two_way {
            goln!(e, "result := {}{{}}", result_type(ctx, &def.name, function));
        }
        e.line(&format!("if {assign} := {call}; err2 != nil {{"));
        e.indented(|e| {
            e.line("tickerCancel()");
            e.line("err = thrift.WrapTException(err2)");
            let on_failure = |e: &mut GoEmitter| {
                if two_way {
                    e.block("if errors.Is(err2, thrift.ErrAbandonRequest)", |e| {
                        e.line("return false, thrift.WrapTException(err2)");
                    });
                    goln!(
                        e,
                        "{exc} := thrift.NewTApplicationException({}, \"Internal error processing {method}: \" + err2.Error())",
                        AppExceptionKind::InternalError.as_go()
                    );
                    emit_reply(e, &write_err, &method, "thrift.EXCEPTION", &format!("{exc}.Write(ctx, oprot)"));
                }
            };
            if exception_cases.is_empty() || !two_way {
                on_failure(e);
            } else {
                e.switch("switch v := err2.(type)", |e| {
                    for (go_type, member) in &exception_cases {
                        e.case(go_type, |e| goln!(e, "result.{member} = v"));
                    }
                    e.line("default:");
                    e.indented(on_failure);
                });
            }
        });
        if success.is_some() {
            e.line("} else {");
            e.indented(|e| {
                let reference = if success_by_reference { "&" } else { "" };
                goln!(e, "result.Success = {reference}retval");
            });
        }
        e.line("}");

        e.line("tickerCancel()");
        if two_way {
            emit_reply(e, &write_err, &method, "thrift.REPLY", &format!("result.{write}(ctx, oprot)"));
        } else {
            e.line("return true, err");
        }
    });
    e.blank_line();
    Ok(())
}

/// Write a reply message; every step after the first runs only while no write has failed.
fn emit_reply(e: &mut GoEmitter, write_err: &str, method: &str, message_type: &str, payload: &str) {
    let record = |e: &mut GoEmitter| goln!(e, "{write_err} = thrift.WrapTException(err2)");
    e.block(
        &format!("if err2 := oprot.WriteMessageBegin(ctx, \"{method}\", {message_type}, seqId); err2 != nil"),
        record,
    );
    for step in [payload, "oprot.WriteMessageEnd(ctx)", "oprot.Flush(ctx)"] {
        e.block(&format!("if err2 := {step}; {write_err} == nil && err2 != nil"), record);
    }
    e.block(&format!("if {write_err} != nil"), |e| {
        goln!(e, "return false, thrift.WrapTException({write_err})");
    });
    e.line("return true, err");
}

/// Background ticker cancelling the call's context once the transport is closed.
fn emit_connectivity_check(e: &mut GoEmitter) {
    e.comment("Start a goroutine to do server side connectivity check.");
    e.block("if thrift.ServerConnectivityCheckInterval > 0", |e| {
        e.line("var cancel context.CancelFunc");
        e.line("ctx, cancel = context.WithCancel(ctx)");
        e.line("defer cancel()");
        e.line("var tickerCtx context.Context");
        e.line("tickerCtx, tickerCancel = context.WithCancel(context.Background())");
        e.line("defer tickerCancel()");
        e.block_closed_by("go func(ctx context.Context, cancel context.CancelFunc)", "}(tickerCtx, cancel)", |e| {
            e.line("ticker := time.NewTicker(thrift.ServerConnectivityCheckInterval)");
            e.line("defer ticker.Stop()");
            e.block("for", |e| {
                e.switch("select", |e| {
                    e.line("case <-ctx.Done():");
                    e.indented(|e| e.line("return"));
                    e.line("case <-ticker.C:");
                    e.indented(|e| {
                        e.block("if !iprot.Transport().IsOpen()", |e| {
                            e.line("cancel()");
                            e.line("return");
                        });
                    });
                });
            });
        });
    });
}
