//! Errors produced while loading a document into a [`crate::Schema`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("document declares no programs")]
    Empty,

    #[error("program `{0}` is declared twice")]
    DuplicateProgram(String),

    #[error("`{name}` is declared twice in program `{program}`")]
    DuplicateDefinition { program: String, name: String },

    #[error("`{owner}` declares field id {id} twice")]
    DuplicateFieldId { owner: String, id: i32 },

    #[error("`{owner}` declares field `{name}` twice")]
    DuplicateFieldName { owner: String, name: String },

    #[error("unknown program `{name}` referenced from `{from}`")]
    UnknownProgram { name: String, from: String },

    #[error("unknown type `{name}` in program `{program}`")]
    UnknownType { program: String, name: String },

    #[error("`{name}` is not a service (extended by `{service}`)")]
    NotAService { name: String, service: String },

    #[error("typedef `{name}` in program `{program}` refers to itself")]
    CyclicTypedef { program: String, name: String },

    #[error("service `{service}` in program `{program}` extends itself through its `extends` chain")]
    CyclicExtends { program: String, service: String },

    #[error("invalid constant for `{target}` of type {ty}: {reason}")]
    InvalidConstant { target: String, ty: String, reason: String },
}
