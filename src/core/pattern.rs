//! Include/exclude pattern filtering
//!
//! Patterns use shell-glob syntax (`*`, `?`, `[...]`, `[!...]`) and are matched
//! against the whole relative path string. `*` is not separator-aware, so
//! `*.py` matches `src/foo.py` as well as `foo.py`.

use glob::{MatchOptions, Pattern};

use crate::core::error::PatternError;

/// Plain filename-glob semantics applied to a full path string
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled include/exclude pattern sets
#[derive(Debug, Clone)]
pub struct PatternFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PatternFilter {
    /// Compile both pattern sets, failing on the first invalid pattern
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, PatternError> {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    /// True iff the path matches some include pattern and no exclude pattern
    pub fn matches(&self, relative_path: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>, PatternError> {
    patterns
        .iter()
        .map(|p| {
            let p = p.as_ref();
            Pattern::new(p).map_err(|e| PatternError {
                pattern: p.to_string(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

/// One-shot form of [`PatternFilter::matches`], compiling on every call.
///
/// An invalid pattern never matches.
#[cfg(test)]
pub fn matches<S: AsRef<str>>(relative_path: &str, include: &[S], exclude: &[S]) -> bool {
    let hit = |pattern: &S| {
        Pattern::new(pattern.as_ref())
            .map(|p| p.matches_with(relative_path, MATCH_OPTIONS))
            .unwrap_or(false)
    };
    include.iter().any(&hit) && !exclude.iter().any(&hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_star_crosses_separators() {
        assert!(matches("src/app.py", &["*.py"], &NONE));
        assert!(matches("app.py", &["*.py"], &NONE));
    }

    #[test]
    fn test_exclude_wins() {
        assert!(!matches(
            "build/egg-info/x.py",
            &["*.py"],
            &["*egg-info*"]
        ));
    }

    #[test]
    fn test_no_include_match() {
        assert!(!matches("src/app.rs", &["*.py", "*.md"], &NONE));
    }

    #[test]
    fn test_empty_include_selects_nothing() {
        assert!(!matches("app.py", &NONE, &NONE));
    }

    #[test]
    fn test_question_mark_and_class() {
        assert!(matches("a1.txt", &["a?.txt"], &NONE));
        assert!(!matches("a12.txt", &["a?.txt"], &NONE));
        assert!(matches("b.c", &["[abc].c"], &NONE));
        assert!(!matches("d.c", &["[abc].c"], &NONE));
        assert!(matches("d.c", &["[!abc].c"], &NONE));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches("README.MD", &["*.md"], &NONE));
    }

    #[test]
    fn test_hidden_files_match_star() {
        assert!(matches(".github/workflow.yaml", &["*.yaml"], &NONE));
    }

    #[test]
    fn test_default_excludes() {
        let include = ["*.py", "*.txt"];
        let exclude = ["*.pyc", "*egg-info*", "*tmp*"];
        assert!(!matches("pkg/tmpdata/a.py", &include, &exclude));
        assert!(!matches("pkg.egg-info/SOURCES.txt", &include, &exclude));
        assert!(matches("pkg/mod.py", &include, &exclude));
    }

    #[test]
    fn test_filter_compiles_once() {
        let filter = PatternFilter::new(&["*.py"], &["tests/*"]).unwrap();
        assert!(filter.matches("src/app.py"));
        assert!(!filter.matches("tests/test_app.py"));
        assert!(!filter.matches("src/app.rs"));
    }

    #[test]
    fn test_filter_rejects_invalid_pattern() {
        let err = PatternFilter::new(&["[*.py"], &NONE).unwrap_err();
        assert_eq!(err.pattern, "[*.py");
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        assert!(!matches("a.py", &["[*.py"], &NONE));
    }
}
