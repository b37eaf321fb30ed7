//! Writes generated packages below an output root.
//!
//! A file whose current contents already match is left untouched, so repeated runs keep
//! modification times stable for build tools watching the tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::errors::OutputError;
use super::generator::{GeneratedFile, GeneratedPackage};

/// Counts of one [`write_package`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub unchanged: usize,
}

#[tracing::instrument(skip_all, fields(package = %package.package_name, root = %root.display()))]
pub fn write_package(root: &Path, package: &GeneratedPackage) -> Result<WriteSummary, OutputError> {
    fs::create_dir_all(root.join(&package.package_dir))?;
    let mut summary = WriteSummary::default();
    for file in &package.files {
        let path = root.join(&file.path);
        if write_file(&path, file).map_err(|source| OutputError::Write { path: path.clone(), source })? {
            summary.written += 1;
        } else {
            summary.unchanged += 1;
        }
    }
    tracing::debug!(written = summary.written, unchanged = summary.unchanged, "wrote package");
    Ok(summary)
}

/// Returns whether the file was (re)written.
fn write_file(path: &Path, file: &GeneratedFile) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let changed = match fs::read_to_string(path) {
        Ok(existing) => existing != file.contents,
        Err(_) => true,
    };
    if changed {
        fs::write(path, &file.contents)?;
    }
    if file.executable {
        mark_executable(path)?;
    }
    Ok(changed)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Paths a package would occupy below `root`, for dry runs.
pub fn planned_paths(root: &Path, package: &GeneratedPackage) -> Vec<PathBuf> {
    package.files.iter().map(|f| root.join(&f.path)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn package() -> GeneratedPackage {
        GeneratedPackage {
            program: "demo".to_string(),
            package_name: "demo".to_string(),
            package_dir: PathBuf::from("acme/demo"),
            files: vec![
                GeneratedFile {
                    path: PathBuf::from("acme/demo/demo.go"),
                    contents: "package demo\n".to_string(),
                    executable: false,
                },
                GeneratedFile {
                    path: PathBuf::from("acme/demo/svc-remote/svc-remote.go"),
                    contents: "package main\n".to_string(),
                    executable: true,
                },
            ],
        }
    }

    #[test]
    fn test_write_then_rewrite_only_changes() {
        let root = std::env::temp_dir().join("idlgo_test_output_rewrite");
        let _ = fs::remove_dir_all(&root);

        let mut package = package();
        let first = write_package(&root, &package).unwrap();
        assert_eq!(first, WriteSummary { written: 2, unchanged: 0 });
        assert_eq!(fs::read_to_string(root.join("acme/demo/demo.go")).unwrap(), "package demo\n");

        package.files[0].contents = "package demo\n\nvar X int\n".to_string();
        let second = write_package(&root, &package).unwrap();
        assert_eq!(second, WriteSummary { written: 1, unchanged: 1 });

        let _ = fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[test]
    fn test_remote_unit_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let root = std::env::temp_dir().join("idlgo_test_output_exec");
        let _ = fs::remove_dir_all(&root);
        write_package(&root, &package()).unwrap();
        let mode = fs::metadata(root.join("acme/demo/svc-remote/svc-remote.go"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_planned_paths_are_rooted() {
        let paths = planned_paths(Path::new("gen-go"), &package());
        assert_eq!(paths[0], PathBuf::from("gen-go/acme/demo/demo.go"));
    }
}
