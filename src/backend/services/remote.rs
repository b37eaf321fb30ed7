//! Remote command-line tool: a `package main` program that connects a generated client to a
//! server and calls one method with arguments parsed from the command line.
//!
//! ## Notes
//! - Inherited methods are included; a method overridden in a descendant is listed once, with
//!   the helper structs of the service that declares it.
//! - Struct and container arguments are decoded from JSON text through a memory buffer.

use std::collections::HashSet;

use idlgo_ast::{Field, Function, ProgramId, Schema, ServiceDef, Type};
use idlgo_core::strings::escape_go_string;

use super::helpers::args_type;
use crate::backend::context::GenContext;
use crate::backend::errors::{GenResult, GenerateError};
use crate::backend::go_emitter::{GoEmitter, goln};
use crate::backend::imports::emit_remote_imports;

/// A callable method and the service that declares it.
#[derive(Debug, Clone, Copy)]
pub struct RemoteFunction<'s> {
    pub function: &'s Function,
    pub owner: &'s ServiceDef,
}

/// Methods of `def` and its ancestors, nearest declaration first.
pub fn remote_functions<'s>(schema: &'s Schema, def: &'s ServiceDef) -> Vec<RemoteFunction<'s>> {
    let mut seen = HashSet::new();
    let mut functions = Vec::new();
    let mut current = Some(def);
    while let Some(service) = current {
        for function in &service.functions {
            if seen.insert(function.name.as_str()) {
                functions.push(RemoteFunction {
                    function,
                    owner: service,
                });
            }
        }
        current = service.extends.map(|id| schema.service(id));
    }
    functions
}

const HTTP_HEADERS: &[&str] = &[
    "type httpHeaders map[string]string",
    "",
    "func (h httpHeaders) String() string {",
    "\tvar m map[string]string = h",
    "\treturn fmt.Sprintf(\"%s\", m)",
    "}",
    "",
    "func (h httpHeaders) Set(value string) error {",
    "\tparts := strings.Split(value, \": \")",
    "\tif len(parts) != 2 {",
    "\t\treturn fmt.Errorf(\"header should be of format 'Key: Value'\")",
    "\t}",
    "\th[parts[0]] = parts[1]",
    "\treturn nil",
    "}",
    "",
];

const FLAGS: &[&str] = &[
    "flag.Usage = Usage",
    "var host string",
    "var port int",
    "var protocol string",
    "var urlString string",
    "var framed bool",
    "var useHttp bool",
    "headers := make(httpHeaders)",
    "var parsedUrl *url.URL",
    "var trans thrift.TTransport",
    "_ = strconv.Atoi",
    "_ = math.Abs",
    "flag.StringVar(&host, \"h\", \"localhost\", \"Specify host and port\")",
    "flag.IntVar(&port, \"p\", 9090, \"Specify port\")",
    "flag.StringVar(&protocol, \"P\", \"binary\", \"Specify the protocol (binary, compact, simplejson, json)\")",
    "flag.StringVar(&urlString, \"u\", \"\", \"Specify the url\")",
    "flag.BoolVar(&framed, \"framed\", false, \"Use framed transport\")",
    "flag.BoolVar(&useHttp, \"http\", false, \"Use http\")",
    "flag.Var(headers, \"H\", \"Headers to set on the http(s) request (e.g. -H \\\"Key: Value\\\")\")",
    "flag.Parse()",
    "",
    "if len(urlString) > 0 {",
    "\tvar err error",
    "\tparsedUrl, err = url.Parse(urlString)",
    "\tif err != nil {",
    "\t\tfmt.Fprintln(os.Stderr, \"Error parsing URL: \", err)",
    "\t\tflag.Usage()",
    "\t}",
    "\thost = parsedUrl.Host",
    "\tuseHttp = len(parsedUrl.Scheme) <= 0 || parsedUrl.Scheme == \"http\" || parsedUrl.Scheme == \"https\"",
    "} else if useHttp {",
    "\t_, err := url.Parse(fmt.Sprint(\"http://\", host, \":\", port))",
    "\tif err != nil {",
    "\t\tfmt.Fprintln(os.Stderr, \"Error parsing URL: \", err)",
    "\t\tflag.Usage()",
    "\t}",
    "}",
    "",
];

const TRANSPORT: &[&str] = &[
    "cmd := flag.Arg(0)",
    "var err error",
    "var cfg *thrift.TConfiguration = nil",
    "if useHttp {",
    "\ttrans, err = thrift.NewTHttpClient(parsedUrl.String())",
    "\tif len(headers) > 0 {",
    "\t\thttptrans := trans.(*thrift.THttpClient)",
    "\t\tfor key, value := range headers {",
    "\t\t\thttptrans.SetHeader(key, value)",
    "\t\t}",
    "\t}",
    "} else {",
    "\tportStr := fmt.Sprint(port)",
    "\tif strings.Contains(host, \":\") {",
    "\t\thost, portStr, err = net.SplitHostPort(host)",
    "\t\tif err != nil {",
    "\t\t\tfmt.Fprintln(os.Stderr, \"error with host:\", err)",
    "\t\t\tos.Exit(1)",
    "\t\t}",
    "\t}",
    "\ttrans = thrift.NewTSocketConf(net.JoinHostPort(host, portStr), cfg)",
    "\tif err != nil {",
    "\t\tfmt.Fprintln(os.Stderr, \"error resolving address:\", err)",
    "\t\tos.Exit(1)",
    "\t}",
    "\tif framed {",
    "\t\ttrans = thrift.NewTFramedTransportConf(trans, cfg)",
    "\t}",
    "}",
    "if err != nil {",
    "\tfmt.Fprintln(os.Stderr, \"Error creating transport\", err)",
    "\tos.Exit(1)",
    "}",
    "defer trans.Close()",
    "var protocolFactory thrift.TProtocolFactory",
    "switch protocol {",
    "case \"compact\":",
    "\tprotocolFactory = thrift.NewTCompactProtocolFactoryConf(cfg)",
    "case \"simplejson\":",
    "\tprotocolFactory = thrift.NewTSimpleJSONProtocolFactoryConf(cfg)",
    "case \"json\":",
    "\tprotocolFactory = thrift.NewTJSONProtocolFactory()",
    "case \"binary\", \"\":",
    "\tprotocolFactory = thrift.NewTBinaryProtocolFactoryConf(cfg)",
    "default:",
    "\tfmt.Fprintln(os.Stderr, \"Invalid protocol specified: \", protocol)",
    "\tUsage()",
    "\tos.Exit(1)",
    "}",
    "iprot := protocolFactory.GetProtocol(trans)",
    "oprot := protocolFactory.GetProtocol(trans)",
];

fn emit_lines(e: &mut GoEmitter, lines: &[&str]) {
    for line in lines {
        e.line(line);
    }
}

/// Write the body of a remote unit (everything after the `package main` clause).
#[tracing::instrument(skip_all, fields(service = %def.name))]
pub fn emit_remote(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    def: &ServiceDef,
    functions: &[RemoteFunction<'_>],
) -> GenResult<()> {
    let own = emit_remote_imports(ctx, e);

    e.block("func Usage()", |e| {
        e.line(
            "fmt.Fprintln(os.Stderr, \"Usage of \", os.Args[0], \" [-h host:port] [-u url] [-f[ramed]] function [arg1 [arg2...]]:\")",
        );
        e.line("flag.PrintDefaults()");
        e.line("fmt.Fprintln(os.Stderr, \"\\nFunctions:\")");
        for remote in functions {
            goln!(e, "fmt.Fprintln(os.Stderr, \"  {}\")", escape_go_string(&usage_line(ctx.schema, remote.function)));
        }
        e.line("fmt.Fprintln(os.Stderr)");
        e.line("os.Exit(0)");
    });
    e.blank_line();
    emit_lines(e, HTTP_HEADERS);

    e.block("func main()", |e| -> GenResult<()> {
        emit_lines(e, FLAGS);
        emit_lines(e, TRANSPORT);
        goln!(
            e,
            "client := {own}.New{}Client(thrift.NewTStandardClient(iprot, oprot))",
            ctx.names.publicize(&def.name)
        );
        e.block("if err := trans.Open(); err != nil", |e| {
            e.line("fmt.Fprintln(os.Stderr, \"Error opening socket to \", host, \":\", port, \" \", err)");
            e.line("os.Exit(1)");
        });
        e.blank_line();
        e.switch("switch cmd", |e| -> GenResult<()> {
            for remote in functions {
                e.case(&format!("\"{}\"", escape_go_string(&remote.function.name)), |e| {
                    emit_invocation(ctx, e, &own, remote)
                })?;
            }
            e.case("\"\"", |e| e.line("Usage()"));
            e.line("default:");
            e.indented(|e| e.line("fmt.Fprintln(os.Stderr, \"Invalid function \", cmd)"));
            Ok(())
        })
    })?;
    tracing::debug!(functions = functions.len(), "emitted remote");
    Ok(())
}

/// `  i32 count(string prefix, i64 limit)` as listed by `Usage`.
fn usage_line(schema: &Schema, function: &Function) -> String {
    let args: Vec<String> = function
        .args
        .iter()
        .map(|arg| format!("{} {}", schema.display_type(&arg.ty), arg.name))
        .collect();
    format!(
        "{} {}({})",
        schema.display_type(&function.returns),
        function.name,
        args.join(", ")
    )
}

/// One `case` body: check the argument count, parse every argument, call and print.
fn emit_invocation(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    own: &str,
    remote: &RemoteFunction<'_>,
) -> GenResult<()> {
    let function = remote.function;
    let count = function.args.len();
    e.block(&format!("if flag.NArg()-1 != {count}"), |e| {
        goln!(
            e,
            "fmt.Fprintln(os.Stderr, \"{} requires {count} args\")",
            escape_go_string(&ctx.names.publicize(&function.name))
        );
        e.line("flag.Usage()");
    });

    let mut values = vec!["context.Background()".to_string()];
    for (i, arg) in function.args.iter().enumerate() {
        emit_argument(ctx, e, own, remote, arg, i)?;
        values.push(format!("value{i}"));
    }
    goln!(e, "fmt.Print(client.{}({}))", ctx.names.publicize(&function.name), values.join(", "));
    e.line("fmt.Print(\"\\n\")");
    Ok(())
}

/// Package alias under which package `main` sees the definitions of `program`.
fn remote_alias(ctx: &GenContext<'_>, own: &str, program: ProgramId) -> String {
    ctx.module_qualifier(program).unwrap_or_else(|| own.to_string())
}

/// Qualified spelling of a named definition from package `main`.
fn remote_name(ctx: &GenContext<'_>, own: &str, program: ProgramId, name: &str) -> String {
    format!("{}.{}", remote_alias(ctx, own, program), ctx.names.publicize(name))
}

fn emit_parse_failure(e: &mut GoEmitter, err: &str) {
    e.block(&format!("if {err} != nil"), |e| {
        e.line("Usage()");
        e.line("return");
    });
}

/// Parse positional argument `i` into `argvalue<i>`, then bind `value<i>` with the declared type.
fn emit_argument(
    ctx: &mut GenContext<'_>,
    e: &mut GoEmitter,
    own: &str,
    remote: &RemoteFunction<'_>,
    arg: &Field,
    i: usize,
) -> GenResult<()> {
    let schema = ctx.schema;
    let flag_arg = format!("flag.Arg({})", i + 1);
    let resolved = schema.true_type(&arg.ty);
    match resolved {
        Type::Enum(id) => {
            let def = schema.enum_def(*id);
            goln!(e, "tmp{i}, err := (strconv.Atoi({flag_arg}))");
            emit_parse_failure(e, "err");
            goln!(e, "argvalue{i} := {}(tmp{i})", remote_name(ctx, own, def.program, &def.name));
        }
        Type::String => goln!(e, "argvalue{i} := {flag_arg}"),
        Type::Binary => goln!(e, "argvalue{i} := []byte({flag_arg})"),
        Type::Bool => goln!(e, "argvalue{i} := {flag_arg} == \"true\""),
        Type::I8 | Type::I16 | Type::I32 => {
            let err = ctx.tmp("err");
            let go = ctx.go_type(resolved, false)?;
            goln!(e, "tmp{i}, {err} := (strconv.Atoi({flag_arg}))");
            emit_parse_failure(e, &err);
            goln!(e, "argvalue{i} := {go}(tmp{i})");
        }
        Type::I64 => {
            let err = ctx.tmp("err");
            goln!(e, "argvalue{i}, {err} := (strconv.ParseInt({flag_arg}, 10, 64))");
            emit_parse_failure(e, &err);
        }
        Type::Double => {
            let err = ctx.tmp("err");
            goln!(e, "argvalue{i}, {err} := (strconv.ParseFloat({flag_arg}, 64))");
            emit_parse_failure(e, &err);
        }
        Type::Struct(id) => {
            let def = schema.struct_def(*id);
            let target = format!(
                "{}.New{}",
                remote_alias(ctx, own, def.program),
                ctx.names.publicize(&def.name)
            );
            let protocol = emit_json_protocol(ctx, e, &flag_arg);
            let err = ctx.tmp("err");
            goln!(e, "argvalue{i} := {target}()");
            goln!(e, "{err} := argvalue{i}.{}(context.Background(), {protocol})", ctx.options.read_method());
            emit_parse_failure(e, &err);
        }
        Type::Map(..) | Type::Set(_) | Type::List(_) => {
            let holder = format!(
                "{}.New{}",
                remote_alias(ctx, own, remote.owner.program),
                args_type(ctx, &remote.owner.name, remote.function)
            );
            let protocol = emit_json_protocol(ctx, e, &flag_arg);
            let err = ctx.tmp("err");
            let suffix = if arg.id < 0 {
                format!("_{}", -i64::from(arg.id))
            } else {
                arg.id.to_string()
            };
            goln!(e, "containerStruct{i} := {holder}()");
            goln!(e, "{err} := containerStruct{i}.ReadField{suffix}(context.Background(), {protocol})");
            emit_parse_failure(e, &err);
            goln!(e, "argvalue{i} := containerStruct{i}.{}", ctx.names.publicize(&arg.name));
        }
        Type::Void | Type::Typedef(_) => {
            return Err(GenerateError::UnsupportedType {
                ty: schema.display_type(&arg.ty),
                context: "a remote argument".to_string(),
            });
        }
    }

    match &arg.ty {
        Type::Typedef(id) if !matches!(resolved, Type::Struct(_)) => {
            let def = schema.typedef(*id);
            goln!(e, "value{i} := {}(argvalue{i})", remote_name(ctx, own, def.program, &def.name));
        }
        _ => goln!(e, "value{i} := argvalue{i}"),
    }
    Ok(())
}

/// Copy a JSON argument into a memory buffer and return the protocol reading it.
fn emit_json_protocol(ctx: &mut GenContext<'_>, e: &mut GoEmitter, flag_arg: &str) -> String {
    let arg = ctx.tmp("arg");
    let buffer = ctx.tmp("mbTrans");
    let err = ctx.tmp("err");
    let factory = ctx.tmp("factory");
    let protocol = ctx.tmp("jsProt");
    goln!(e, "{arg} := {flag_arg}");
    goln!(e, "{buffer} := thrift.NewTMemoryBufferLen(len({arg}))");
    goln!(e, "defer {buffer}.Close()");
    goln!(e, "_, {err} := {buffer}.WriteString({arg})");
    emit_parse_failure(e, &err);
    goln!(e, "{factory} := thrift.NewTJSONProtocolFactory()");
    goln!(e, "{protocol} := {factory}.GetProtocol({buffer})");
    protocol
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::options::GeneratorOptions;
    use idlgo_ast::load_str;

    const DOC: &str = r#"{"programs": [{"name": "demo",
        "enums": [{"name": "Level", "values": [{"name": "LOW"}]}],
        "typedefs": [{"name": "Tag", "type": "string"}],
        "structs": [{"name": "Query", "fields": [{"id": 1, "name": "text", "type": "string"}]}],
        "services": [
            {"name": "Base", "functions": [
                {"name": "ping", "returns": "void"},
                {"name": "find", "args": [{"id": 1, "name": "q", "type": "Query"}], "returns": "i32"}
            ]},
            {"name": "search_service", "extends": "Base", "functions": [
                {"name": "find", "args": [
                    {"id": 1, "name": "q", "type": "Query"},
                    {"id": 2, "name": "ids", "type": {"list": "i64"}},
                    {"id": 3, "name": "level", "type": "Level"},
                    {"id": 4, "name": "tag", "type": "Tag"},
                    {"id": 5, "name": "limit", "type": "i16"}
                ], "returns": "i32"}
            ]}
        ]}]}"#;

    fn emit() -> String {
        let schema = load_str(DOC).unwrap();
        let options = GeneratorOptions::default();
        let main = schema.main_program().unwrap();
        let mut ctx = GenContext::new(&schema, &options, main);
        let service = schema.service(schema.program(main).services[1]);
        let functions = remote_functions(&schema, service);
        let mut e = GoEmitter::new();
        emit_remote(&mut ctx, &mut e, service, &functions).unwrap();
        e.finish()
    }

    #[test]
    fn test_inherited_functions_listed_once() {
        let schema = load_str(DOC).unwrap();
        let main = schema.main_program().unwrap();
        let service = schema.service(schema.program(main).services[1]);
        let names: Vec<(&str, &str)> = remote_functions(&schema, service)
            .iter()
            .map(|r| (r.function.name.as_str(), r.owner.name.as_str()))
            .collect();
        assert_eq!(names, vec![("find", "search_service"), ("ping", "Base")]);
    }

    #[test]
    fn test_imports_own_package() {
        let code = emit();
        assert!(code.starts_with("import (\n\t\"context\"\n\t\"flag\"\n"));
        assert!(code.contains("\t\"demo\"\n)\n"));
        assert!(code.contains("var _ = demo.GoUnusedProtection__\n"));
        assert!(code.contains("client := demo.NewSearchServiceClient(thrift.NewTStandardClient(iprot, oprot))"));
    }

    #[test]
    fn test_usage_lists_functions() {
        let code = emit();
        assert!(code.contains(
            "fmt.Fprintln(os.Stderr, \"  i32 find(Query q, list<i64> ids, Level level, Tag tag, i16 limit)\")"
        ));
        assert!(code.contains("fmt.Fprintln(os.Stderr, \"  void ping()\")"));
    }

    #[test]
    fn test_argument_parsing() {
        let code = emit();
        assert!(code.contains("\tcase \"find\":\n\t\tif flag.NArg()-1 != 5 {\n"));
        assert!(code.contains("argvalue0 := demo.NewQuery()\n"));
        assert!(code.contains("containerStruct1 := demo.NewSearchServiceFindArgs()\n"));
        assert!(code.contains(".ReadField2(context.Background(), jsProt"));
        assert!(code.contains("argvalue1 := containerStruct1.Ids\n"));
        assert!(code.contains("argvalue2 := demo.Level(tmp2)\n"));
        assert!(code.contains("value3 := demo.Tag(argvalue3)\n"));
        assert!(code.contains("argvalue4 := int16(tmp4)\n"));
        assert!(code.contains("fmt.Print(client.Find(context.Background(), value0, value1, value2, value3, value4))"));
    }
}
