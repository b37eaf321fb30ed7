//! Per-program driver: turns one program of a [`Schema`] into the Go source units of its package.
//!
//! Every program yields three units in its package directory:
//! - `<program>.go` with typedefs, enums, structs and services,
//! - `<program>-consts.go` with constants and their `init()` function,
//! - `GoUnusedProtection__.go`, which gives included packages something to reference.
//!
//! Each service with at least one callable function (inherited ones included) also gets an
//! executable command-line client under `<service>-remote/`, unless `skip_remote` is set.
//!
//! ## Notes
//! - Units are rendered fully in memory; nothing is written here (see [`super::output`]).
//! - The types and consts units share one [`GenContext`], so include aliases agree between them.
//!   Remote units start from a fresh context because they import the generated package itself.

use std::path::PathBuf;

use idlgo_ast::{ProgramId, Schema};
use idlgo_core::lang::runtime::UNUSED_PROTECTION;
use idlgo_core::strings::underscore;

use super::consts::emit_constants;
use super::context::GenContext;
use super::enums::emit_enum;
use super::errors::{GenResult, GenerateError};
use super::go_emitter::{GoEmitter, goln};
use super::imports::{ImportUnit, emit_import_block};
use super::options::GeneratorOptions;
use super::services::emit_service;
use super::services::remote::{emit_remote, remote_functions};
use super::structs::{StructRole, emit_struct};
use super::typedefs::emit_typedef;
use crate::version::IDLGO_VERSION;

/// One rendered source file, addressed relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
    /// Whether the file should be marked executable (remote units).
    pub executable: bool,
}

/// All units rendered for one program.
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    /// IDL name of the program.
    pub program: String,
    /// Go package clause name.
    pub package_name: String,
    /// Package directory relative to the output root (`acme/shared`).
    pub package_dir: PathBuf,
    pub files: Vec<GeneratedFile>,
}

impl GeneratedPackage {
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path.ends_with(name))
    }
}

pub struct GoGenerator<'a> {
    schema: &'a Schema,
    options: &'a GeneratorOptions,
}

impl<'a> GoGenerator<'a> {
    pub fn new(schema: &'a Schema, options: &'a GeneratorOptions) -> Self {
        Self { schema, options }
    }

    /// Generate the document's main program only.
    pub fn generate_main(&self) -> GenResult<GeneratedPackage> {
        let main = self.schema.main_program().ok_or(GenerateError::NoMainProgram)?;
        self.generate(main)
    }

    /// Generate every program in the document, in declaration order.
    pub fn generate_all(&self) -> GenResult<Vec<GeneratedPackage>> {
        self.schema.programs().map(|(id, _)| self.generate(id)).collect()
    }

    #[tracing::instrument(skip_all, fields(program = %self.schema.program(program).name))]
    pub fn generate(&self, program: ProgramId) -> GenResult<GeneratedPackage> {
        let mut ctx = GenContext::new(self.schema, self.options, program);
        let package_name = ctx.package_name();
        let package_dir = PathBuf::from(ctx.local_module().replace('.', "/"));
        let name = &self.schema.program(program).name;

        let mut files = vec![
            GeneratedFile {
                path: package_dir.join(format!("{name}.go")),
                contents: self.types_unit(&mut ctx)?,
                executable: false,
            },
            GeneratedFile {
                path: package_dir.join(format!("{name}-consts.go")),
                contents: self.consts_unit(&mut ctx)?,
                executable: false,
            },
            GeneratedFile {
                path: package_dir.join(format!("{UNUSED_PROTECTION}.go")),
                contents: unused_protection_unit(&package_name),
                executable: false,
            },
        ];

        if !self.options.skip_remote {
            for &id in &self.schema.program(program).services {
                let def = self.schema.service(id);
                let functions = remote_functions(self.schema, def);
                if functions.is_empty() {
                    tracing::debug!(service = %def.name, "no callable functions, skipping remote unit");
                    continue;
                }
                let mut remote_ctx = GenContext::new(self.schema, self.options, program);
                let mut e = unit_header("main");
                emit_remote(&mut remote_ctx, &mut e, def, &functions)?;
                let tool = format!("{}-remote", underscore(&def.name));
                files.push(GeneratedFile {
                    path: package_dir.join(&tool).join(format!("{tool}.go")),
                    contents: e.finish(),
                    executable: true,
                });
            }
        }

        tracing::info!(package = %package_name, units = files.len(), "generated program");
        Ok(GeneratedPackage {
            program: name.clone(),
            package_name,
            package_dir,
            files,
        })
    }

    fn types_unit(&self, ctx: &mut GenContext<'_>) -> GenResult<String> {
        let program = self.schema.program(ctx.program);
        let mut e = unit_header(&ctx.package_name());
        emit_import_block(
            ctx,
            &mut e,
            ImportUnit::Types {
                has_enums: !program.enums.is_empty(),
            },
        );
        for &id in &program.typedefs {
            emit_typedef(ctx, &mut e, self.schema.typedef(id))?;
        }
        for &id in &program.enums {
            emit_enum(ctx, &mut e, self.schema.enum_def(id));
        }
        for &id in &program.structs {
            emit_struct(ctx, &mut e, self.schema.struct_def(id), StructRole::Plain)?;
        }
        for &id in &program.services {
            emit_service(ctx, &mut e, self.schema.service(id))?;
        }
        Ok(e.finish())
    }

    fn consts_unit(&self, ctx: &mut GenContext<'_>) -> GenResult<String> {
        let program = self.schema.program(ctx.program);
        let mut e = unit_header(&ctx.package_name());
        emit_import_block(ctx, &mut e, ImportUnit::Consts);

        let mut init = GoEmitter::new();
        emit_constants(ctx, &program.consts, &mut e, &mut init)?;
        if !program.consts.is_empty() {
            e.blank_line();
        }
        let init = init.finish();
        e.block("func init()", |e| {
            for line in init.lines() {
                e.line(line);
            }
        });
        e.blank_line();
        Ok(e.finish())
    }
}

/// Generated-code marker followed by the package clause.
fn unit_header(package: &str) -> GoEmitter {
    let mut e = GoEmitter::new();
    goln!(e, "// Code generated by idlgo ({IDLGO_VERSION}). DO NOT EDIT.");
    e.blank_line();
    goln!(e, "package {package}");
    e.blank_line();
    e
}

fn unused_protection_unit(package: &str) -> String {
    let mut e = unit_header(package);
    goln!(e, "var {UNUSED_PROTECTION} int;");
    e.blank_line();
    e.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use idlgo_ast::load_str;

    const DOC: &str = r#"{"main": "app", "programs": [
        {"name": "shared", "namespace": "acme.shared",
         "structs": [{"name": "Ref", "fields": [{"id": 1, "name": "key", "type": "string"}]}],
         "services": [{"name": "Base", "functions": [{"name": "ping", "returns": "void"}]}]},
        {"name": "app", "includes": ["shared"],
         "enums": [{"name": "Mode", "values": [{"name": "FAST", "value": 1}]}],
         "consts": [{"name": "limit", "type": "i32", "value": 3}],
         "services": [
            {"name": "Worker", "extends": "shared.Base", "functions": []},
            {"name": "Empty", "functions": []}
         ]}
    ]}"#;

    fn schema() -> Schema {
        load_str(DOC).unwrap()
    }

    fn paths(package: &GeneratedPackage) -> Vec<String> {
        package
            .files
            .iter()
            .map(|f| f.path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_units_of_main_program() {
        let schema = schema();
        let options = GeneratorOptions::default();
        let package = GoGenerator::new(&schema, &options).generate_main().unwrap();
        assert_eq!(package.package_name, "app");
        assert_eq!(
            paths(&package),
            vec![
                "app/app.go",
                "app/app-consts.go",
                "app/GoUnusedProtection__.go",
                "app/worker-remote/worker-remote.go",
            ]
        );
        let remote = package.file("worker-remote.go").unwrap();
        assert!(remote.executable);
        assert!(remote.contents.contains("package main\n"));
        assert!(remote.contents.contains("case \"ping\":"));
    }

    #[test]
    fn test_header_and_unused_protection() {
        let schema = schema();
        let options = GeneratorOptions::default();
        let package = GoGenerator::new(&schema, &options).generate_main().unwrap();
        let guard = &package.file("GoUnusedProtection__.go").unwrap().contents;
        assert!(guard.starts_with(&format!("// Code generated by idlgo ({IDLGO_VERSION}). DO NOT EDIT.\n")));
        assert!(guard.contains("package app\n\nvar GoUnusedProtection__ int;\n"));
    }

    #[test]
    fn test_consts_unit_has_init() {
        let schema = schema();
        let options = GeneratorOptions::default();
        let package = GoGenerator::new(&schema, &options).generate_main().unwrap();
        let consts = &package.file("app-consts.go").unwrap().contents;
        assert!(consts.contains("const Limit = 3\n"));
        assert!(consts.contains("func init() {\n}\n"));
        assert!(consts.contains("\"acme/shared\""));
        assert!(!consts.contains("database/sql/driver"));
    }

    #[test]
    fn test_types_unit_imports_driver_for_enums() {
        let schema = schema();
        let options = GeneratorOptions::default();
        let package = GoGenerator::new(&schema, &options).generate_main().unwrap();
        let types = &package.file("app.go").unwrap().contents;
        assert!(types.contains("\"database/sql/driver\""));
        assert!(types.contains("type Mode int64"));
        assert!(types.contains("*shared.BaseClient"));
    }

    #[test]
    fn test_skip_remote() {
        let schema = schema();
        let options = GeneratorOptions::parse("skip_remote").unwrap();
        let package = GoGenerator::new(&schema, &options).generate_main().unwrap();
        assert_eq!(package.files.len(), 3);
    }

    #[test]
    fn test_generate_all_uses_namespace_dirs() {
        let schema = schema();
        let options = GeneratorOptions::default();
        let packages = GoGenerator::new(&schema, &options).generate_all().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].package_dir, PathBuf::from("acme/shared"));
        assert_eq!(packages[0].package_name, "shared");
        assert!(paths(&packages[0]).contains(&"acme/shared/base-remote/base-remote.go".to_string()));
    }
}
