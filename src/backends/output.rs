//! Output artifact writer

use std::fs;
use std::io;
use std::path::Path;

/// Default output file, relative to the invocation directory
pub const DEFAULT_OUTPUT_FILE: &str = "output.md";

/// Write the aggregated document as UTF-8, replacing any previous file
pub fn write_output(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text.as_bytes())
}
