//! Resolved interface-definition tree and the JSON document loader that produces it.
//!
//! The generator never parses IDL source itself: an upstream front end resolves and validates the
//! definitions and hands them over as a JSON document. This crate turns that document into a
//! [`Schema`] arena where every type reference is already resolved to a typed id.
//!
//! ## Notes
//! - Loading checks that names resolve, not that the IDL is semantically valid.
//! - Union members are coerced to `Optional` once, when their [`StructDef`] is built.
//!
//! ## Examples
//! ```rust
//! let schema = idlgo_ast::load_str(r#"{"programs": [{"name": "demo",
//!     "enums": [{"name": "Color", "values": [{"name": "RED"}, {"name": "GREEN"}]}]}]}"#).unwrap();
//! let demo = schema.main_program().unwrap();
//! assert_eq!(schema.program(demo).enums.len(), 1);
//! ```

pub mod ast;
pub mod document;
pub mod errors;

pub use ast::*;
pub use document::{load_file, load_str};
pub use errors::LoadError;
