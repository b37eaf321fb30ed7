//! Go vocabulary registries.
//!
//! Callers ask these registries instead of scattering string literals for reserved words,
//! initialisms or runtime symbols across the generator.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use idlgo_core::lang::{go_keywords, initialisms};
//!
//! assert!(go_keywords::is_reserved("Type"));
//! assert!(initialisms::is_initialism("HTTP"));
//! ```

pub mod go_keywords;
pub mod initialisms;
pub mod packages;
pub mod runtime;
