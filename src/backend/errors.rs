//! Generation errors.
//!
//! Every variant aborts the current run; partially built units are discarded.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    #[error("unsupported type {ty} in {context}")]
    #[diagnostic(code(idlgo::unsupported_type))]
    UnsupportedType { ty: String, context: String },

    #[error("cannot produce a valid type for a Go map key: {ty}")]
    #[diagnostic(
        code(idlgo::invalid_key_type),
        help("Go map keys must be comparable; use a scalar, string, enum or struct key")
    )]
    InvalidKeyType { ty: String },

    #[error("type error: {owner} has no field {field}")]
    #[diagnostic(code(idlgo::unknown_field))]
    UnknownField { owner: String, field: String },

    #[error("unknown option go:{0}")]
    #[diagnostic(
        code(idlgo::unknown_option),
        help("recognized options: package_prefix, thrift_import, package, ignore_initialisms, read_write_private, skip_remote")
    )]
    UnknownOption(String),

    #[error("cannot render constant {value} as {ty}")]
    #[diagnostic(code(idlgo::invalid_constant))]
    InvalidConstant { ty: String, value: String },

    #[error("document has no main program")]
    #[diagnostic(code(idlgo::no_main_program))]
    NoMainProgram,
}

pub type GenResult<T> = Result<T, GenerateError>;

/// Failure while writing generated units to disk.
#[derive(Debug, Error, Diagnostic)]
pub enum OutputError {
    #[error("failed to write {}: {source}", path.display())]
    #[diagnostic(code(idlgo::write_failed))]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(idlgo::io))]
    Io(#[from] std::io::Error),
}
