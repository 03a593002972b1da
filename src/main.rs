//! promptify - aggregate a source tree into one prompt-ready document
//!
//! promptify provides:
//! - Directory walking with glob include/exclude filters
//! - Virtual-environment pruning and strict UTF-8 reading
//! - Token and billable character counts from the model's tokenizer
//! - Delivery to output.md and the system clipboard
//!
//! Exit codes:
//!   0 - Success (file and clipboard failures are reported, not fatal)
//!   1 - Invalid pattern, unsupported model or tokenizer failure

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;
mod flows;

fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.log_level());

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG takes precedence over the verbosity flags
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
