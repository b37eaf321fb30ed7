//! Per-program generation state.
//!
//! A [`GenContext`] is created for every program being generated and threaded by reference
//! through all emission functions. Nothing it holds outlives the program's generation.

use idlgo_ast::{ProgramId, Schema};

use super::imports::ImportResolver;
use super::naming::NameMangler;
use super::options::GeneratorOptions;

#[derive(Debug)]
pub struct GenContext<'a> {
    pub schema: &'a Schema,
    pub options: &'a GeneratorOptions,
    /// The program whose units are being generated.
    pub program: ProgramId,
    pub names: NameMangler,
    pub imports: ImportResolver,
    tmp_counter: usize,
}

impl<'a> GenContext<'a> {
    pub fn new(schema: &'a Schema, options: &'a GeneratorOptions, program: ProgramId) -> Self {
        Self {
            schema,
            options,
            program,
            names: NameMangler::new(options.ignore_initialisms),
            imports: ImportResolver::default(),
            tmp_counter: 0,
        }
    }

    /// Fresh local identifier (`_args3`), unique within this run.
    pub fn tmp(&mut self, name: &str) -> String {
        let n = self.tmp_counter;
        self.tmp_counter += 1;
        format!("{name}{n}")
    }

    /// Dotted Go module of a program: the `package` option, else its namespace, else its
    /// lower-cased name.
    pub fn go_module(&self, program: ProgramId) -> String {
        if let Some(package) = &self.options.package {
            return package.clone();
        }
        let program = self.schema.program(program);
        match &program.namespace {
            Some(ns) => ns.clone(),
            None => program.name.to_lowercase(),
        }
    }

    pub fn local_module(&self) -> String {
        self.go_module(self.program)
    }

    /// Go package clause name of the program being generated.
    pub fn package_name(&self) -> String {
        last_component(&self.local_module()).to_string()
    }

    /// Import alias under which definitions of `program` are visible, or `None` when they live in
    /// the package being generated.
    pub fn module_qualifier(&self, program: ProgramId) -> Option<String> {
        if program == self.program {
            return None;
        }
        let module = self.go_module(program);
        if module == self.local_module() {
            return None;
        }
        Some(
            self.imports
                .alias_of(&module)
                .map_or_else(|| last_component(&module).to_string(), str::to_string),
        )
    }

    /// Exported spelling of a definition, qualified with its import alias when foreign.
    pub fn qualified_name(&self, program: ProgramId, name: &str) -> String {
        match self.module_qualifier(program) {
            Some(alias) => self.names.publicize(&format!("{alias}.{name}")),
            None => self.names.publicize(name),
        }
    }
}

/// Final segment of a dotted module path.
pub fn last_component(module: &str) -> &str {
    module.rsplit('.').next().unwrap_or(module)
}
