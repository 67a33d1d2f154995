//! Dependency extraction and the Makefile-style `.d` manifest.
//!
//! Only the top-level import declarations of the compiled file count;
//! nothing is followed transitively.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use tssc_engine::{SourceFile, Statement};

use crate::error::DriverError;

/// Extension the engine gives emitted modules.
pub const OUTPUT_EXTENSION: &str = ".js";

/// Module files referenced by the top-level imports of `file`, in source order.
///
/// Each entry is the import's specifier text plus [`OUTPUT_EXTENSION`],
/// not yet resolved against any directory.
pub fn import_files(file: &SourceFile) -> Vec<String> {
    file.statements()
        .iter()
        .filter_map(Statement::as_import)
        .map(|import| format!("{}{}", import.module_specifier.unquoted(), OUTPUT_EXTENSION))
        .collect()
}

/// Resolves each import against the directory of `output_file`.
pub fn resolve_imports(base_path: &Path, output_file: &Path, imports: &[String]) -> Vec<PathBuf> {
    let output_dir = base_path.join(output_file.parent().unwrap_or_else(|| Path::new("")));
    imports
        .iter()
        .map(|import| normalize(&output_dir.join(import)))
        .collect()
}

/// Removes `.` and `..` components without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `<output_file>.d`
pub fn manifest_path(output_file: &Path) -> PathBuf {
    let mut name = OsString::from(output_file.as_os_str());
    name.push(".d");
    PathBuf::from(name)
}

/// The single manifest line: `<output>: <dep> <dep> ...`
pub fn render_manifest(output_file: &Path, dependencies: &[PathBuf]) -> String {
    let deps: Vec<String> = dependencies
        .iter()
        .map(|dep| dep.display().to_string())
        .collect();
    format!("{}: {}", output_file.display(), deps.join(" "))
}

/// Writes the manifest next to the output file and returns its path.
pub async fn write_manifest(
    base_path: &Path,
    output_file: &Path,
    dependencies: &[PathBuf],
) -> Result<PathBuf, DriverError> {
    let path = base_path.join(manifest_path(output_file));
    let contents = render_manifest(output_file, dependencies);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| DriverError::WriteManifest {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), dependencies = dependencies.len(), "wrote dependency file");
    Ok(path)
}
