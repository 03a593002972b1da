//! Aggregation data model
//!
//! The walk produces [`FormattedBlock`]s which are assembled into one
//! immutable [`AggregatedDocument`]. Token metrics for the document are
//! carried by [`MetricsReport`].

use serde::{Deserialize, Serialize};

/// Warning codes for files skipped during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// File contains invalid UTF-8 sequences
    FileSkippedEncoding,
    /// File could not be opened or read
    FileUnreadable,
    /// Directory entry could not be listed
    WalkError,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::FileSkippedEncoding => "FILE_SKIPPED_ENCODING",
            WarningCode::FileUnreadable => "FILE_UNREADABLE",
            WarningCode::WalkError => "WALK_ERROR",
        }
    }
}

/// A structured, non-fatal warning raised while aggregating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWarning {
    pub code: WarningCode,

    /// Path relative to the walk root, using '/' as separator
    pub path: String,

    /// Human-readable message, printed to the console as-is
    pub message: String,
}

impl FileWarning {
    pub fn new(code: WarningCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Warning for a file that failed UTF-8 decoding
    pub fn encoding(path: &str) -> Self {
        Self::new(
            WarningCode::FileSkippedEncoding,
            path,
            format!("Unable to read {} as UTF-8. Skipping.", path),
        )
    }

    /// Warning for a file that could not be read at all
    pub fn unreadable(path: &str, err: &std::io::Error) -> Self {
        Self::new(
            WarningCode::FileUnreadable,
            path,
            format!("Unable to read {}: {}. Skipping.", path, err),
        )
    }

    /// Warning for a directory entry the walk could not visit
    pub fn walk(path: &str, err: impl std::fmt::Display) -> Self {
        Self::new(
            WarningCode::WalkError,
            path,
            format!("Unable to traverse {}: {}. Skipping.", path, err),
        )
    }
}

/// The rendered unit of output for one included file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBlock {
    /// Path relative to the walk root
    pub path: String,

    /// Whether the content was wrapped in a code fence
    pub fenced: bool,

    /// Header, body and trailing separator, joined with newlines on assembly
    pub parts: [String; 3],
}

/// Ordered concatenation of every included file
#[derive(Debug, Clone, Default)]
pub struct AggregatedDocument {
    blocks: Vec<FormattedBlock>,
    text: String,
    warnings: Vec<FileWarning>,
}

impl AggregatedDocument {
    /// Assemble the document; the text is fixed from here on
    pub fn assemble(blocks: Vec<FormattedBlock>, warnings: Vec<FileWarning>) -> Self {
        let text = blocks
            .iter()
            .flat_map(|b| b.parts.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            blocks,
            text,
            warnings,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn blocks(&self) -> &[FormattedBlock] {
        &self.blocks
    }

    pub fn warnings(&self) -> &[FileWarning] {
        &self.warnings
    }

    /// Relative paths of the included files, in walk order
    pub fn paths(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Counts returned by a token counter for one text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenCounts {
    pub total_tokens: u64,
    pub total_billable_characters: u64,
}

/// One labelled row of the metrics report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
}

/// Ordered (label, value) rows describing the document's token footprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub model: String,
    pub counts: TokenCounts,
}

impl MetricsReport {
    pub fn new(model: impl Into<String>, counts: TokenCounts) -> Self {
        Self {
            model: model.into(),
            counts,
        }
    }

    /// Rows in display order: model, token count, billable character count
    pub fn rows(&self) -> Vec<MetricRow> {
        vec![
            MetricRow {
                label: "Model".to_string(),
                value: self.model.clone(),
            },
            MetricRow {
                label: "Token Count".to_string(),
                value: self.counts.total_tokens.to_string(),
            },
            MetricRow {
                label: "Billable Character Count".to_string(),
                value: self.counts.total_billable_characters.to_string(),
            },
        ]
    }
}
