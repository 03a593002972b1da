//! Aggregation flow - walk, filter, read and format into one document

use std::path::Path;
use tracing::{debug, warn};

use crate::core::error::PatternError;
use crate::core::file_reader::{read_and_format, BlockOutcome};
use crate::core::model::{AggregatedDocument, FileWarning};
use crate::core::pattern::PatternFilter;
use crate::core::walker::{walk, WalkEvent};

/// Default include patterns (common text/source files)
pub const DEFAULT_INCLUDE: &[&str] = &[
    "*.py", "*.html", "*.js", "*.css", "*.json", "*.yaml", "*.txt", "*.md",
];

/// Default exclude patterns (compiled artifacts, packaging metadata, temp paths)
pub const DEFAULT_EXCLUDE: &[&str] = &["*.pyc", "*egg-info*", "*tmp*"];

/// Options for the aggregation walk
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Drop files whose content is empty after trimming
    pub ignore_empty: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            ignore_empty: false,
        }
    }
}

/// Aggregate every selected file under `root` into one document
pub fn aggregate(
    root: &Path,
    options: &AggregateOptions,
) -> Result<AggregatedDocument, PatternError> {
    let filter = PatternFilter::new(&options.include, &options.exclude)?;

    let mut blocks = Vec::new();
    let mut warnings = Vec::new();

    for event in walk(root) {
        let candidate = match event {
            WalkEvent::File(candidate) => candidate,
            WalkEvent::Error { relative, message } => {
                warn!("skipping {}: {}", relative, message);
                warnings.push(FileWarning::walk(&relative, message));
                continue;
            }
        };

        if !filter.matches(&candidate.relative) {
            continue;
        }

        match read_and_format(&candidate.path, &candidate.relative, options.ignore_empty) {
            BlockOutcome::Block(block) => {
                debug!("included {} (fenced: {})", block.path, block.fenced);
                blocks.push(block);
            }
            BlockOutcome::SkippedEmpty => debug!("skipped empty {}", candidate.relative),
            BlockOutcome::Skipped(warning) => {
                debug!("skipped {}: {}", warning.path, warning.code.as_str());
                warnings.push(warning);
            }
        }
    }

    debug!(
        "aggregated {} files with {} warnings",
        blocks.len(),
        warnings.len()
    );
    Ok(AggregatedDocument::assemble(blocks, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::WarningCode;
    use std::fs;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn options(include: &[&str], exclude: &[&str], ignore_empty: bool) -> AggregateOptions {
        AggregateOptions {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            ignore_empty,
        }
    }

    #[test]
    fn test_aggregate_empty_tree() {
        let temp = tempdir().unwrap();
        let doc = aggregate(temp.path(), &AggregateOptions::default()).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_aggregate_single_code_file() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("main.py"), b"print(1)");

        let doc = aggregate(temp.path(), &options(&["*.py"], &[], false)).unwrap();
        assert_eq!(doc.text(), "---\nFile: `main.py`\n\n```\nprint(1)\n```\n");
    }

    #[test]
    fn test_aggregate_markdown_unfenced() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("notes.md"), b"print(1)");

        let doc = aggregate(temp.path(), &options(&["*.py", "*.md"], &[], false)).unwrap();
        assert_eq!(doc.text(), "---\nFile: `notes.md`\n\nprint(1)\n");
        assert!(!doc.blocks()[0].fenced);
    }

    #[test]
    fn test_aggregate_exclude_nested() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("src/app.py"), b"a = 1");
        write_file(&temp.path().join("build/egg-info/x.py"), b"b = 2");

        let doc = aggregate(temp.path(), &options(&["*.py"], &["*egg-info*"], false)).unwrap();
        assert_eq!(doc.paths(), vec!["src/app.py"]);
    }

    #[test]
    fn test_aggregate_prunes_venv() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("app.py"), b"x = 1");
        write_file(&temp.path().join("env/pyvenv.cfg"), b"home = /usr/bin");
        write_file(&temp.path().join("env/lib/secret.py"), b"password = 1");

        let doc = aggregate(temp.path(), &options(&["*.py"], &[], false)).unwrap();
        assert_eq!(doc.paths(), vec!["app.py"]);
        assert!(!doc.text().contains("secret"));
    }

    #[test]
    fn test_aggregate_ignore_empty() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("empty.txt"), b"");

        let skipped = aggregate(temp.path(), &options(&["*.txt"], &[], true)).unwrap();
        assert!(skipped.is_empty());
        assert!(skipped.warnings().is_empty());

        let kept = aggregate(temp.path(), &options(&["*.txt"], &[], false)).unwrap();
        assert_eq!(kept.paths(), vec!["empty.txt"]);
        assert_eq!(kept.text(), "---\nFile: `empty.txt`\n\n\n");
    }

    #[test]
    fn test_aggregate_whitespace_only_is_empty() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("blank.txt"), b"\n  \n");

        let doc = aggregate(temp.path(), &options(&["*.txt"], &[], true)).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_aggregate_skips_invalid_utf8_with_one_warning() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("good.txt"), b"fine");
        write_file(&temp.path().join("data/bad.txt"), &[0x66, 0x6f, 0xff, 0xfe]);

        let doc = aggregate(temp.path(), &options(&["*.txt"], &[], false)).unwrap();
        assert_eq!(doc.paths(), vec!["good.txt"]);
        assert_eq!(doc.warnings().len(), 1);
        assert_eq!(doc.warnings()[0].code, WarningCode::FileSkippedEncoding);
        assert_eq!(doc.warnings()[0].path, "data/bad.txt");
    }

    #[test]
    fn test_aggregate_normalizes_crlf() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("win.py"), b"a = 1\r\nb = 2\r\n");

        let doc = aggregate(temp.path(), &options(&["*.py"], &[], false)).unwrap();
        assert!(!doc.text().contains('\r'));
        assert_eq!(
            doc.text(),
            "---\nFile: `win.py`\n\n```\na = 1\nb = 2\n\n```\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_aggregate_skips_unreadable_directory_with_one_warning() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.txt"), b"a");
        write_file(&temp.path().join("z.txt"), b"z");
        write_file(&temp.path().join("locked/inner.txt"), b"secret");
        let locked = temp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let doc = aggregate(temp.path(), &options(&["*.txt"], &[], false));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let doc = doc.unwrap();

        let mut paths = doc.paths();
        paths.sort();
        assert_eq!(paths, vec!["a.txt", "z.txt"]);
        assert_eq!(doc.warnings().len(), 1);
        assert_eq!(doc.warnings()[0].code, WarningCode::WalkError);
        assert_eq!(doc.warnings()[0].path, "locked");
    }

    #[cfg(unix)]
    #[test]
    fn test_aggregate_skips_unreadable_file_with_one_warning() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        write_file(&temp.path().join("ok.txt"), b"ok");
        let locked = temp.path().join("locked.txt");
        write_file(&locked, b"secret");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::File::open(&locked).is_ok() {
            return;
        }

        let doc = aggregate(temp.path(), &options(&["*.txt"], &[], false)).unwrap();
        assert_eq!(doc.paths(), vec!["ok.txt"]);
        assert_eq!(doc.warnings().len(), 1);
        assert_eq!(doc.warnings()[0].code, WarningCode::FileUnreadable);
        assert_eq!(doc.warnings()[0].path, "locked.txt");
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("a.py"), b"a");
        write_file(&temp.path().join("b.md"), b"b");
        write_file(&temp.path().join("pkg/c.json"), b"{}");
        write_file(&temp.path().join("pkg/deep/d.txt"), b"d");

        let opts = AggregateOptions::default();
        let first = aggregate(temp.path(), &opts).unwrap();
        let second = aggregate(temp.path(), &opts).unwrap();
        assert_eq!(first.text(), second.text());
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_aggregate_invalid_pattern() {
        let temp = tempdir().unwrap();
        let err = aggregate(temp.path(), &options(&["[oops"], &[], false)).unwrap_err();
        assert_eq!(err.pattern, "[oops");
    }

    #[test]
    fn test_default_options() {
        let opts = AggregateOptions::default();
        assert_eq!(opts.include.len(), 8);
        assert!(opts.exclude.contains(&"*tmp*".to_string()));
        assert!(!opts.ignore_empty);
    }
}
