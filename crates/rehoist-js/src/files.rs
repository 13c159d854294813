// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source file collection.
//!
//! Walks the workspace (or the paths given on the command line) for
//! JavaScript and TypeScript files. Filtering happens on workspace-relative
//! paths.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rehoist_core::error::RehoistError;
use rehoist_core::filter::FileFilterSpec;
use thiserror::Error;
use tracing::trace;
use walkdir::WalkDir;

/// Extensions of the files rehoist analyzes.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

// ============================================================================
// Error Types
// ============================================================================

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// File not found.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// IO error.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

impl From<FileError> for RehoistError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { path } => RehoistError::FileNotFound { path },
            FileError::Io { path, source } => RehoistError::InternalError {
                message: format!("IO error reading {}: {}", path, source),
            },
        }
    }
}

// ============================================================================
// File Collection
// ============================================================================

/// Returns true if `path` has a JavaScript or TypeScript extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Collect every source file under `workspace_root` that passes `filter`.
///
/// Returns `(relative_path, content)` pairs sorted by path.
pub fn collect_source_files(
    workspace_root: &Path,
    filter: &FileFilterSpec,
) -> FileResult<Vec<(String, String)>> {
    collect_source_files_in(workspace_root, &[], filter)
}

/// Collect source files from explicit `paths`.
///
/// Relative paths are resolved against `workspace_root`. A directory is
/// walked and its files are filtered. A file named directly is always
/// taken, whatever its extension or the filter says. With no `paths`, the
/// whole workspace is walked.
pub fn collect_source_files_in(
    workspace_root: &Path,
    paths: &[PathBuf],
    filter: &FileFilterSpec,
) -> FileResult<Vec<(String, String)>> {
    // Keyed by display path: sorted and free of duplicates.
    let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();

    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![workspace_root.to_path_buf()]
    } else {
        paths.iter().map(|p| workspace_root.join(p)).collect()
    };

    for root in roots {
        if root.is_file() {
            files.insert(display_path(workspace_root, &root), root);
            continue;
        }
        if !root.is_dir() {
            return Err(FileError::NotFound {
                path: root.display().to_string(),
            });
        }

        for entry in WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_source_file(path) {
                continue;
            }
            // Only filter on workspace-relative paths, never on the absolute
            // location of the workspace itself.
            let rel_path = path.strip_prefix(workspace_root).unwrap_or(path);
            if !filter.matches(rel_path) {
                trace!(path = %rel_path.display(), "filtered out");
                continue;
            }
            files.insert(display_path(workspace_root, path), path.to_path_buf());
        }
    }

    files
        .into_iter()
        .map(|(display, path)| {
            let content = fs::read_to_string(&path).map_err(|source| FileError::Io {
                path: display.clone(),
                source,
            })?;
            Ok((display, content))
        })
        .collect()
}

/// `path` relative to `workspace_root` when inside it, with `/` separators.
pub fn display_path(workspace_root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(workspace_root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/b.js", "b");
        write(dir.path(), "src/a.mjs", "a");
        write(dir.path(), "src/lib/c.cjs", "c");
        write(dir.path(), "src/lib/d.ts", "d");
        write(dir.path(), "src/readme.md", "not js");
        write(dir.path(), "node_modules/dep/index.js", "dep");
        write(dir.path(), "dist/out.js", "out");
        dir
    }

    fn paths(files: &[(String, String)]) -> Vec<&str> {
        files.iter().map(|(p, _)| p.as_str()).collect()
    }

    #[test]
    fn test_collects_sorted_with_default_exclusions() {
        let dir = workspace();
        let files =
            collect_source_files(dir.path(), &FileFilterSpec::defaults().unwrap()).unwrap();
        assert_eq!(
            paths(&files),
            vec!["src/a.mjs", "src/b.js", "src/lib/c.cjs", "src/lib/d.ts"]
        );
        assert_eq!(files[1].1, "b");
    }

    #[test]
    fn test_user_filter() {
        let dir = workspace();
        let filter =
            FileFilterSpec::new(&["src/**".to_string()], &["src/lib/**".to_string()]).unwrap();
        let files = collect_source_files(dir.path(), &filter).unwrap();
        assert_eq!(paths(&files), vec!["src/a.mjs", "src/b.js"]);
    }

    #[test]
    fn test_explicit_paths() {
        let dir = workspace();
        let filter = FileFilterSpec::defaults().unwrap();
        let files = collect_source_files_in(
            dir.path(),
            &[PathBuf::from("src/lib"), PathBuf::from("dist/out.js")],
            &filter,
        )
        .unwrap();
        assert_eq!(
            paths(&files),
            vec!["dist/out.js", "src/lib/c.cjs", "src/lib/d.ts"]
        );
    }

    #[test]
    fn test_missing_path() {
        let dir = workspace();
        let err = collect_source_files_in(
            dir.path(),
            &[PathBuf::from("nope")],
            &FileFilterSpec::defaults().unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("a/b.js")));
        assert!(is_source_file(Path::new("b.mjs")));
        assert!(is_source_file(Path::new("b.jsx")));
        assert!(is_source_file(Path::new("b.ts")));
        assert!(is_source_file(Path::new("b.cts")));
        assert!(is_source_file(Path::new("b.tsx")));
        assert!(!is_source_file(Path::new("b.json")));
        assert!(!is_source_file(Path::new("Makefile")));
    }
}
