//! Source file selection
//!
//! Expands an action's `files` globs against the working tree. Paths are
//! returned relative to the search root and sorted so that every run passes
//! the same argument list to the external tool.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::types::{TidyupError, TidyupResult};

pub const DEFAULT_EXCLUDE_GLOBS: &[&str] = &["**/.git/**", "**/target/**", "**/node_modules/**"];

fn build_glob_set<'p, I>(patterns: I) -> TidyupResult<GlobSet>
where
    I: IntoIterator<Item = &'p str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            TidyupError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| TidyupError::Config(format!("Failed to build glob set: {}", e)))
}

/// Collect files under `root` matching any of `includes` and none of `excludes`.
///
/// Symbolic links are never followed: linked directories are not entered and
/// linked files are not selected.
pub fn collect_matching_files(
    root: &Path,
    includes: &[String],
    excludes: &[String],
) -> TidyupResult<Vec<PathBuf>> {
    let include_set = build_glob_set(includes.iter().map(String::as_str))?;
    let exclude_set = build_glob_set(
        DEFAULT_EXCLUDE_GLOBS
            .iter()
            .copied()
            .chain(excludes.iter().map(String::as_str)),
    )?;

    let mut matches = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(current_dir) = queue.pop_front() {
        let entries = std::fs::read_dir(&current_dir)?;
        for entry in entries.flatten() {
            let path = entry.path();
            let relative_path = path.strip_prefix(root).unwrap_or(&path);

            if exclude_set.is_match(relative_path) {
                continue;
            }

            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }

            if file_type.is_dir() {
                queue.push_back(path);
            } else if include_set.is_match(relative_path) {
                matches.push(relative_path.to_path_buf());
            }
        }
    }

    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_collects_sorted_relative_matches() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "b.py");
        touch(root, "pkg/a.py");
        touch(root, "pkg/readme.md");
        touch(root, "a.py");

        let files = collect_matching_files(root, &["**/*.py".to_string()], &[]).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("b.py"),
                PathBuf::from("pkg/a.py")
            ]
        );
    }

    #[test]
    fn test_default_and_custom_excludes_apply() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "keep.py");
        touch(root, ".git/hooks/pre-commit.py");
        touch(root, "node_modules/dep/x.py");
        touch(root, "build/generated.py");

        let files = collect_matching_files(
            root,
            &["**/*.py".to_string()],
            &["build/**".to_string()],
        )
        .unwrap();
        assert_eq!(files, vec![PathBuf::from("keep.py")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "a.py");
        touch(outside.path(), "elsewhere.py");
        std::os::unix::fs::symlink(".", root.join("loop")).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("vendor")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("elsewhere.py"), root.join("linked.py"))
            .unwrap();

        let files = collect_matching_files(root, &["**/*.py".to_string()], &[]).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.py")]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "main.rs");
        let files =
            collect_matching_files(temp_dir.path(), &["**/*.py".to_string()], &[]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = collect_matching_files(temp_dir.path(), &["a[".to_string()], &[]).unwrap_err();
        assert!(matches!(err, TidyupError::Config(_)));
    }
}
