//! Path normalization utilities
//!
//! Ensures all paths are normalized to use '/' as separator and are relative to the walk root.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Resolve the walk root once, falling back to the path as given when it
/// cannot be canonicalized.
pub fn resolve_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

/// Get the file name component as a string (empty when absent)
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("src/main.py");
        assert_eq!(normalize_path(path), "src/main.py");
    }

    #[test]
    fn test_normalize_path_nested() {
        let path = Path::new("a/b/c/d.py");
        assert_eq!(normalize_path(path), "a/b/c/d.py");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/app.py");
        assert_eq!(make_relative(path, root), Some("src/app.py".to_string()));
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/project");
        let path = Path::new("/other/file.py");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_resolve_root_existing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let resolved = resolve_root(temp.path());
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }

    #[test]
    fn test_resolve_root_missing_dir_kept() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(resolve_root(path), PathBuf::from("/definitely/not/here"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("src/main.py")), "main.py");
        assert_eq!(file_name(Path::new("/")), "");
    }
}
