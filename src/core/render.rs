//! Renderer module
//!
//! Formats per-file blocks of the aggregated document and renders the
//! metrics report as a table or JSON.

use crate::core::model::{FormattedBlock, MetricsReport};
use crate::core::paths::file_name;

/// File name suffixes whose content is wrapped in a code fence
pub const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".json", ".js", ".html", ".css", ".java", ".cpp", ".c", ".h", ".yaml", ".yml",
];

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Box-drawn table (default)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Check whether a file's content should be fenced, by file name suffix
pub fn is_code_file(relative: &str) -> bool {
    let name = file_name(std::path::Path::new(relative));
    CODE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Build the block for one file: header, (optionally fenced) body, separator
pub fn format_block(relative: &str, content: &str) -> FormattedBlock {
    let fenced = is_code_file(relative);
    let body = if fenced {
        format!("```\n{}\n```", content)
    } else {
        content.to_string()
    };

    FormattedBlock {
        path: relative.to_string(),
        fenced,
        parts: [format!("---\nFile: `{}`\n", relative), body, String::new()],
    }
}

/// Render the metrics report in the selected format
pub fn render_report(report: &MetricsReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Table => render_table(report),
        ReportFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
    }
}

/// Render report rows as a two-column box table
fn render_table(report: &MetricsReport) -> String {
    let rows = report.rows();
    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|r| r.value.chars().count()).max().unwrap_or(0);

    let mut output = String::new();
    output.push_str(&format!(
        "┌─{:─<lw$}─┬─{:─<vw$}─┐\n",
        "",
        "",
        lw = label_width,
        vw = value_width
    ));

    for row in &rows {
        output.push_str(&format!(
            "│ {:<lw$} │ {:>vw$} │\n",
            row.label,
            row.value,
            lw = label_width,
            vw = value_width
        ));
    }

    output.push_str(&format!(
        "└─{:─<lw$}─┴─{:─<vw$}─┘",
        "",
        "",
        lw = label_width,
        vw = value_width
    ));

    output
}
