//! CLI module - Command-line interface definition and handler

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::backends::output::DEFAULT_OUTPUT_FILE;
use crate::backends::vertex::{VertexConfig, VertexTokenCounter, DEFAULT_LOCATION};
use crate::core::paths::resolve_root;
use crate::core::render::ReportFormat;
use crate::core::tokenizer::{Encoding, LocalTokenCounter, TokenCounter, DEFAULT_MODEL};
use crate::flows::aggregate::{AggregateOptions, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
use crate::flows::promptify::{run_promptify, RunOptions};

/// promptify - aggregate file contents based on include and exclude patterns.
#[derive(Parser, Debug)]
#[command(name = "promptify")]
#[command(
    author,
    version,
    about,
    long_about = r#"promptify walks a directory tree, selects files with glob patterns and
concatenates them into one Markdown document ready to paste into a prompt.

Each included file becomes a block:

    ---
    File: `path/to/file.py`

    ```
    <content>
    ```

Source files (.py .json .js .html .css .java .cpp .c .h .yaml .yml) are fenced,
everything else is inserted verbatim. Directories containing pyvenv.cfg are
skipped. Files that are not valid UTF-8 are skipped with a warning.

The document's token and billable character counts are printed as a table,
then the document is written to output.md and copied to the clipboard.

Examples:
    promptify
    promptify --include "*.py" "*.md" --exclude "tests/*" --ignore-empty
    promptify --model gemini-1.5-pro --project my-gcp-project
    promptify --offline --encoding o200k --no-clipboard
"#
)]
pub struct Cli {
    /// Generative model whose tokenizer is used for the report.
    #[arg(long, default_value = DEFAULT_MODEL, value_name = "MODEL")]
    pub model: String,

    /// File patterns to include.
    #[arg(
        long,
        num_args = 1..,
        default_values = DEFAULT_INCLUDE.iter().copied(),
        value_name = "PATTERN",
        long_help = "Glob patterns matched against each file's path relative to ROOT.\n\n\
A file is selected when it matches at least one include pattern and no exclude\n\
pattern. '*' also matches '/', so \"*.py\" selects Python files at any depth."
    )]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[arg(
        long,
        num_args = 1..,
        default_values = DEFAULT_EXCLUDE.iter().copied(),
        value_name = "PATTERN"
    )]
    pub exclude: Vec<String>,

    /// Ignore empty files.
    #[arg(
        long,
        long_help = "Leave out files whose content is empty or whitespace only."
    )]
    pub ignore_empty: bool,

    /// Root directory to aggregate.
    #[arg(
        long,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory to aggregate (defaults to the current directory).\n\n\
All paths in the document are relative to this root."
    )]
    pub root: PathBuf,

    /// File the document is written to.
    #[arg(
        long,
        default_value = DEFAULT_OUTPUT_FILE,
        value_name = "FILE",
        long_help = "File the document is written to. Relative paths resolve against the\n\
current directory, not ROOT. A failed write is reported but does not fail the run."
    )]
    pub output: PathBuf,

    /// Do not copy the document to the clipboard.
    #[arg(long)]
    pub no_clipboard: bool,

    /// Estimate tokens locally instead of calling Vertex AI.
    #[arg(
        long,
        long_help = "Estimate tokens locally with tiktoken instead of calling the Vertex AI\n\
countTokens API. Billable characters are counted as non-whitespace characters.\n\n\
The model name is still validated."
    )]
    pub offline: bool,

    /// Local encoding for --offline (cl100k/o200k/heuristic).
    #[arg(
        long,
        default_value = "cl100k",
        value_parser = ["cl100k", "o200k", "heuristic"],
        value_name = "NAME"
    )]
    pub encoding: String,

    /// Google Cloud project for Vertex AI.
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT", value_name = "PROJECT")]
    pub project: Option<String>,

    /// Vertex AI region.
    #[arg(
        long,
        env = "GOOGLE_CLOUD_LOCATION",
        default_value = DEFAULT_LOCATION,
        value_name = "REGION"
    )]
    pub location: String,

    /// OAuth access token (defaults to `gcloud auth print-access-token`).
    #[arg(
        long,
        env = "GOOGLE_ACCESS_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub access_token: Option<String>,

    /// Timeout for the token count request, in seconds.
    #[arg(long, default_value = "60", value_name = "SECS")]
    pub timeout: u64,

    /// Report format (table, json).
    #[arg(long, default_value = "table", value_name = "FORMAT")]
    pub report_format: ReportFormat,

    /// Quiet mode (errors only in the log).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug log on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log level filter implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let root = resolve_root(&cli.root);
    let metadata = fs::metadata(&root)
        .with_context(|| format!("Cannot read root directory {}", cli.root.display()))?;
    if !metadata.is_dir() {
        bail!("Root is not a directory: {}", cli.root.display());
    }

    let options = RunOptions {
        model: cli.model.clone(),
        aggregate: AggregateOptions {
            include: cli.include.clone(),
            exclude: cli.exclude.clone(),
            ignore_empty: cli.ignore_empty,
        },
        output: cli.output.clone(),
        clipboard: !cli.no_clipboard,
        report_format: cli.report_format,
    };
    debug!("root: {}, options: {:?}", root.display(), options);

    let counter: Box<dyn TokenCounter> = if cli.offline {
        let encoding: Encoding = cli.encoding.parse().map_err(anyhow::Error::msg)?;
        Box::new(LocalTokenCounter::new(encoding))
    } else {
        Box::new(VertexTokenCounter::new(VertexConfig {
            project: cli.project,
            location: cli.location,
            access_token: cli.access_token,
            timeout_seconds: cli.timeout,
        })?)
    };

    let summary = run_promptify(&root, &options, counter.as_ref())?;
    debug!(
        "done: {} files, {} tokens, written: {}, copied: {}",
        summary.files, summary.report.counts.total_tokens, summary.written, summary.copied
    );
    Ok(())
}
