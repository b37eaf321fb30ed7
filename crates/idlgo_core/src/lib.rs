//! Provide the canonical Go-side vocabulary and pure string helpers for the idlgo generator.
//!
//! This crate is intentionally small and dependency-free. It holds the tables the generator consults
//! when it turns interface-definition names into Go identifiers, and the spellings of runtime
//! symbols the generated code calls into.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no generator-specific types.
//! - Current scope: Go reserved words (identifier escaping), the initialism dictionary, system
//!   packages, runtime symbol spellings, and string helpers (escaping, snake-casing).

pub mod lang;
pub mod strings;
