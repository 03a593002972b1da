//! Directory walker
//!
//! Pre-order traversal built on walkdir. Within a directory, files are
//! yielded before subdirectories; each group keeps the order the
//! filesystem listing returned. Directories holding a virtual-environment
//! marker are pruned together with their own files.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::paths::{make_relative, normalize_path};

/// File whose presence marks a directory as a virtual-environment root
pub const VENV_MARKER: &str = "pyvenv.cfg";

/// A file discovered by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Path relative to the walk root, using '/' as separator
    pub relative: String,
}

/// One step of the walk
#[derive(Debug)]
pub enum WalkEvent {
    File(CandidateFile),
    /// An entry that could not be visited; the walk carries on
    Error { relative: String, message: String },
}

/// Check whether a directory is the root of a virtual environment
pub fn is_venv_root(dir: &Path) -> bool {
    dir.join(VENV_MARKER).is_file()
}

fn keep_entry(entry: &DirEntry) -> bool {
    !(entry.file_type().is_dir() && is_venv_root(entry.path()))
}

/// Walk `root` lazily, yielding every reachable file outside pruned subtrees
pub fn walk(root: &Path) -> impl Iterator<Item = WalkEvent> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
        .into_iter()
        .filter_entry(keep_entry)
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                // Symlinks are not descended into but may still point at a regular file
                if entry.file_type().is_dir() || !entry.path().is_file() {
                    return None;
                }
                let relative = make_relative(entry.path(), root)?;
                Some(WalkEvent::File(CandidateFile {
                    path: entry.into_path(),
                    relative,
                }))
            }
            Err(err) => {
                // A failure on the root itself has an empty relative path
                let relative = err
                    .path()
                    .and_then(|p| make_relative(p, root))
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| normalize_path(root));
                let message = err
                    .io_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| err.to_string());
                Some(WalkEvent::Error { relative, message })
            }
        })
}
