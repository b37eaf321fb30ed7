#![forbid(unsafe_code)]
//! idlgo: Go code generator for resolved Thrift IDL documents
//!
//! The generator reads a document produced by an IDL front end (see [`idlgo_ast`]) and renders,
//! per program, a Go package: typed structs with a binary codec, enums, constants, and for every
//! service an interface, a client, a server-side processor and a command-line remote tool.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Emitted Go text is built from string literals; a malformed definition is
//!   reported as a [`backend::GenerateError`], never as a panic.
//!
//! ## Examples
//! ```rust
//! use idlgo::backend::{GeneratorOptions, GoGenerator};
//!
//! let schema = idlgo_ast::load_str(r#"{"programs": [{"name": "demo",
//!     "consts": [{"name": "answer", "type": "i32", "value": 42}]}]}"#).unwrap();
//! let options = GeneratorOptions::default();
//! let package = GoGenerator::new(&schema, &options).generate_main().unwrap();
//! assert!(package.file("demo-consts.go").unwrap().contents.contains("const Answer = 42"));
//! ```

pub mod backend;
pub mod cli;
pub mod version;

pub use backend::{GeneratedPackage, GeneratorOptions, GoGenerator};
