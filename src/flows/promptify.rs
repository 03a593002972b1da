//! End-to-end flow - aggregate, report, then deliver to file and clipboard
//!
//! Only pattern, model and tokenizer errors abort the run. Output-file and
//! clipboard failures are printed and the run carries on.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backends::clipboard::copy_to_clipboard;
use crate::backends::output::write_output;
use crate::core::error::PromptifyError;
use crate::core::model::MetricsReport;
use crate::core::render::{render_report, ReportFormat};
use crate::core::tokenizer::TokenCounter;
use crate::flows::aggregate::{aggregate, AggregateOptions};
use crate::flows::report::report;

/// Everything a run needs besides the token counter
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub model: String,
    pub aggregate: AggregateOptions,
    /// Output file; relative paths resolve against the invocation directory
    pub output: PathBuf,
    pub clipboard: bool,
    pub report_format: ReportFormat,
}

/// Outcome of the delivery steps, for callers that want to inspect it
#[derive(Debug)]
pub struct RunSummary {
    pub report: MetricsReport,
    pub files: usize,
    pub written: bool,
    pub copied: bool,
}

/// Run the whole pipeline for `root`
pub fn run_promptify(
    root: &Path,
    options: &RunOptions,
    counter: &dyn TokenCounter,
) -> Result<RunSummary> {
    let document = aggregate(root, &options.aggregate)
        .map_err(PromptifyError::from)
        .context("Failed to aggregate files")?;

    for warning in document.warnings() {
        println!("Warning: {}", warning.message);
    }
    if document.is_empty() {
        warn!("no files under {} matched the include patterns", root.display());
    }
    let fenced = document.blocks().iter().filter(|b| b.fenced).count();
    info!(
        "aggregated {} files ({} fenced) from {}",
        document.len(),
        fenced,
        root.display()
    );
    debug!("included: {:?}", document.paths());

    let metrics = report(counter, &options.model, document.text())?;
    println!("{}", render_report(&metrics, options.report_format));

    let written = match write_output(&options.output, document.text()) {
        Ok(()) => {
            println!("Output written to {}", options.output.display());
            true
        }
        Err(e) => {
            warn!("write to {} failed: {}", options.output.display(), e);
            println!("Failed to write to file: {}", e);
            false
        }
    };

    let copied = if options.clipboard {
        match copy_to_clipboard(document.text()) {
            Ok(()) => {
                println!("Contents copied to clipboard");
                true
            }
            Err(e) => {
                warn!("clipboard copy failed: {}", e);
                println!("Failed to copy contents to clipboard: {}", e);
                false
            }
        }
    } else {
        false
    };

    Ok(RunSummary {
        report: metrics,
        files: document.len(),
        written,
        copied,
    })
}
