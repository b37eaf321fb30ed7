//! Go code generation backend.
//!
//! The pipeline is:
//! 1. A resolved [`idlgo_ast::Schema`] and [`GeneratorOptions`] go into a [`GoGenerator`]
//! 2. Each program is rendered into in-memory units ([`GeneratedPackage`])
//! 3. [`output::write_package`] places the units below the output root
//!
//! ## Module Organization
//!
//! - `naming.rs` - Identifier mangling (exported/unexported names, initialisms, keywords)
//! - `types.rs` - IDL type to Go type spelling, pointer rules
//! - `consts.rs` - Constant literal rendering and the consts unit body
//! - `enums.rs`, `typedefs.rs` - Named scalar types
//! - `structs/` - Struct, union and exception emission including the binary codec
//! - `services/` - Interfaces, clients, processors and the remote command-line tool
//! - `imports.rs` - Import blocks and include aliasing
//! - `go_emitter.rs` - Low-level Go source string builder
//! - `generator.rs` - Per-program driver producing every unit
//! - `output.rs` - Writing units to disk

pub mod consts;
pub mod context;
pub mod docs;
pub mod enums;
pub mod errors;
pub mod generator;
pub mod go_emitter;
pub mod imports;
pub mod naming;
pub mod options;
pub mod output;
pub mod services;
pub mod structs;
pub mod typedefs;
pub mod types;

pub use errors::{GenResult, GenerateError, OutputError};
pub use generator::{GeneratedFile, GeneratedPackage, GoGenerator};
pub use naming::NameMangler;
pub use options::GeneratorOptions;
