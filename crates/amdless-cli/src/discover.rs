//! Input discovery for directory mode.
//!
//! Walks a root directory, keeps files with a requested extension, and drops
//! anything matching an ignore glob. Globs match against paths relative to
//! the root, so `vendor/**` works regardless of where the root itself lives.

use std::path::{Path, PathBuf};

use glob::Pattern;
use miette::{IntoDiagnostic, Result};
use walkdir::WalkDir;

/// Collect convertible files under `dir`, as paths relative to `dir`,
/// sorted for deterministic processing order.
pub fn discover(dir: &Path, exts: &[String], ignore: &[String]) -> Result<Vec<PathBuf>> {
    let patterns = ignore
        .iter()
        .map(|p| Pattern::new(p).into_diagnostic())
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.into_diagnostic()?;
        if !entry.file_type().is_file() {
            continue;
        }
        let has_ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| exts.iter().any(|want| want == e));
        if !has_ext {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or_else(|_| entry.path())
            .to_path_buf();
        if patterns.iter().any(|p| p.matches_path(&rel)) {
            continue;
        }
        files.push(rel);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.js"));
        touch(&dir.path().join("b.ts"));
        touch(&dir.path().join("notes.md"));

        let files = discover(dir.path(), &["js".into()], &[]).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.js")]);

        let files = discover(dir.path(), &["js".into(), "ts".into()], &[]).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.js"), PathBuf::from("b.ts")]);
    }

    #[test]
    fn test_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("z.js"));
        touch(&dir.path().join("sub/deep/a.js"));

        let files = discover(dir.path(), &["js".into()], &[]).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("sub/deep/a.js"), PathBuf::from("z.js")]
        );
    }

    #[test]
    fn test_ignore_globs_are_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("app.js"));
        touch(&dir.path().join("vendor/lib.js"));

        let files = discover(dir.path(), &["js".into()], &["vendor/**".into()]).unwrap();
        assert_eq!(files, vec![PathBuf::from("app.js")]);
    }

    #[test]
    fn test_bad_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), &["js".into()], &["[".into()]).is_err());
    }
}
