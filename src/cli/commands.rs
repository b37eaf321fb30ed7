//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::{Component, Path};

use idlgo_ast::Schema;

use crate::backend::output::{planned_paths, write_package};
use crate::backend::{GeneratedPackage, GeneratorOptions, GoGenerator};

use super::{CliError, CliResult, ExitCode};

/// Arguments of the `generate` subcommand.
#[derive(Debug)]
pub struct GenerateArgs<'a> {
    pub input: &'a Path,
    pub out: &'a Path,
    pub options: &'a [String],
    pub recurse: bool,
    pub dry_run: bool,
}

/// Render and write (or list, with `--dry-run`) the Go packages of a document.
#[tracing::instrument(skip_all, fields(input = %args.input.display(), recurse = args.recurse))]
pub fn generate(args: &GenerateArgs<'_>) -> CliResult<ExitCode> {
    let options = parse_options(args.options)?;
    let schema = load(args.input)?;
    let packages = render(&schema, &options, args.recurse)?;

    for package in &packages {
        if args.dry_run {
            for path in planned_paths(args.out, package) {
                println!("{}", path.display());
            }
            continue;
        }
        let summary = write_package(args.out, package).map_err(|e| CliError::diagnostic(e, ExitCode::FAILURE))?;
        tracing::info!(
            package = %package.package_dir.display(),
            written = summary.written,
            unchanged = summary.unchanged,
            "package ready"
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Render every program in memory and list the unit paths; nothing is written.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn check(input: &Path, options: &[String]) -> CliResult<ExitCode> {
    let options = parse_options(options)?;
    let schema = load(input)?;
    let packages = render(&schema, &options, true)?;
    for package in &packages {
        for file in &package.files {
            println!("{}", file.path.display());
        }
    }
    let units: usize = packages.iter().map(|p| p.files.len()).sum();
    tracing::info!(programs = packages.len(), units, "document is valid");
    Ok(ExitCode::SUCCESS)
}

/// Join every `--gen` occurrence into one option list and parse it.
fn parse_options(raw: &[String]) -> CliResult<GeneratorOptions> {
    GeneratorOptions::parse(&raw.join(",")).map_err(|e| CliError::diagnostic(e, ExitCode::USAGE))
}

fn load(input: &Path) -> CliResult<Schema> {
    idlgo_ast::load_file(input).map_err(|e| CliError::failure(format!("Error: {}: {e}", input.display())))
}

fn render(schema: &Schema, options: &GeneratorOptions, recurse: bool) -> CliResult<Vec<GeneratedPackage>> {
    let generator = GoGenerator::new(schema, options);
    let packages = if recurse {
        generator.generate_all()
    } else {
        generator.generate_main().map(|package| vec![package])
    }
    .map_err(|e| CliError::diagnostic(e, ExitCode::FAILURE))?;

    for package in &packages {
        for file in &package.files {
            validate_unit_path(&file.path)?;
        }
    }
    Ok(packages)
}

/// Reject unit paths that would escape the output root (absolute or with `..`).
fn validate_unit_path(path: &Path) -> CliResult<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(CliError::failure(format!(
                    "Generated path '{}' escapes the output directory",
                    path.display()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    const DOC: &str = r#"{"programs": [{"name": "demo",
        "structs": [{"name": "Point", "fields": [{"id": 1, "name": "x", "type": "i32"}]}]}]}"#;

    fn write_doc(name: &str, doc: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("demo.json");
        fs::write(&input, doc).unwrap();
        input
    }

    #[test]
    fn test_generate_writes_units() {
        let input = write_doc("idlgo_test_cli_generate", DOC);
        let out = input.with_file_name("gen-go");
        let code = generate(&GenerateArgs {
            input: &input,
            out: &out,
            options: &[],
            recurse: false,
            dry_run: false,
        })
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let types = fs::read_to_string(out.join("demo/demo.go")).unwrap();
        assert!(types.contains("type Point struct {"));
        assert!(out.join("demo/demo-consts.go").exists());
        let _ = fs::remove_dir_all(input.parent().unwrap());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let input = write_doc("idlgo_test_cli_dry_run", DOC);
        let out = input.with_file_name("gen-go");
        generate(&GenerateArgs {
            input: &input,
            out: &out,
            options: &[],
            recurse: true,
            dry_run: true,
        })
        .unwrap();
        assert!(!out.exists());
        let _ = fs::remove_dir_all(input.parent().unwrap());
    }

    #[test]
    fn test_missing_input_fails() {
        let err = check(Path::new("/nonexistent/idlgo.json"), &[]).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("/nonexistent/idlgo.json"));
    }

    #[test]
    fn test_escaping_namespace_is_rejected() {
        let input = write_doc(
            "idlgo_test_cli_escape",
            r#"{"programs": [{"name": "demo", "namespace": "/etc"}]}"#,
        );
        let err = check(&input, &[]).unwrap_err();
        assert!(err.message.contains("escapes the output directory"));
        let _ = fs::remove_dir_all(input.parent().unwrap());
    }

    #[test]
    fn test_validate_unit_path() {
        assert!(validate_unit_path(Path::new("acme/demo/demo.go")).is_ok());
        assert!(validate_unit_path(Path::new("../demo.go")).is_err());
    }
}
