//! CLI module for the idlgo generator
//!
//! This module provides the command-line interface for the generator.
//!
//! ## Commands
//!
//! - `generate <input>` - Render Go packages for a resolved IDL document and write them
//! - `check <input>` - Render everything in memory and report problems without writing
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::IDLGO_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Invalid `--gen` options.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic through miette's report handler.
    pub fn diagnostic<D>(err: D, exit_code: ExitCode) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::new(format!("{:?}", miette::Report::new(err)), exit_code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Go code generator for resolved Thrift IDL documents
#[derive(Parser, Debug)]
#[command(name = "idlgo")]
#[command(version = IDLGO_VERSION)]
#[command(about = "Generate Go packages from resolved Thrift IDL documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Go packages and write them below the output directory
    Generate {
        /// Resolved IDL document (JSON)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output root directory
        #[arg(short, long = "out", value_name = "DIR", default_value = "gen-go")]
        out: PathBuf,
        /// Generator options, `key[=value]` pairs separated by commas
        #[arg(short = 'g', long = "gen", value_name = "OPTIONS")]
        options: Vec<String>,
        /// Generate every program of the document, not only the main one
        #[arg(short, long)]
        recurse: bool,
        /// Print the files that would be written without touching the disk
        #[arg(long)]
        dry_run: bool,
    },

    /// Render everything in memory and report errors without writing
    Check {
        /// Resolved IDL document (JSON)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Generator options, `key[=value]` pairs separated by commas
        #[arg(short = 'g', long = "gen", value_name = "OPTIONS")]
        options: Vec<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            input,
            out,
            options,
            recurse,
            dry_run,
        } => commands::generate(&commands::GenerateArgs {
            input: &input,
            out: &out,
            options: &options,
            recurse,
            dry_run,
        }),
        Command::Check { input, options } => commands::check(&input, &options),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["idlgo", "generate", "demo.json"]).unwrap();
        match cli.command {
            Command::Generate {
                input,
                out,
                options,
                recurse,
                dry_run,
            } => {
                assert_eq!(input, PathBuf::from("demo.json"));
                assert_eq!(out, PathBuf::from("gen-go"));
                assert!(options.is_empty());
                assert!(!recurse);
                assert!(!dry_run);
            }
            other => panic!("Expected Generate command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "idlgo",
            "generate",
            "demo.json",
            "-o",
            "out",
            "-g",
            "package_prefix=github.com/acme/",
            "--gen",
            "skip_remote",
            "-r",
            "--dry-run",
        ])
        .unwrap();
        if let Command::Generate {
            out,
            options,
            recurse,
            dry_run,
            ..
        } = cli.command
        {
            assert_eq!(out, PathBuf::from("out"));
            assert_eq!(options, vec!["package_prefix=github.com/acme/", "skip_remote"]);
            assert!(recurse);
            assert!(dry_run);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["idlgo", "check", "demo.json", "-g", "read_write_private"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["idlgo"]).is_err());
    }

    #[test]
    fn test_unknown_option_exit_code() {
        let cli = Cli::try_parse_from(["idlgo", "check", "missing.json", "-g", "frobnicate"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::USAGE);
        assert!(err.message.contains("frobnicate"));
    }
}
