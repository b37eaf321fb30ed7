//! idlgo version information.
//!
//! This module exposes the generator version as a single constant so the CLI and the header of
//! every generated unit agree on the same value.
//!
//! ## Notes
//!
//! - The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! - Prefer this constant over repeating `env!("CARGO_PKG_VERSION")` in multiple places.

/// The idlgo version string (for example, `0.1.0`).
pub const IDLGO_VERSION: &str = env!("CARGO_PKG_VERSION");
