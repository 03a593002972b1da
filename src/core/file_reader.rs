//! Strict UTF-8 file reading
//!
//! Files are read whole and decoded as UTF-8. There is no lossy fallback:
//! a file that fails decoding is reported as [`ReadOutcome::NotUtf8`] and
//! left out of the document. Line endings are normalized to `\n`.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::core::model::{FileWarning, FormattedBlock};
use crate::core::render::format_block;

/// Result of reading a file
#[derive(Debug)]
pub enum ReadOutcome {
    Text(String),
    NotUtf8,
    Unreadable(io::Error),
}

/// Result of reading and formatting one candidate
#[derive(Debug)]
pub enum BlockOutcome {
    Block(FormattedBlock),
    /// Whitespace-only content with ignore-empty enabled
    SkippedEmpty,
    Skipped(FileWarning),
}

/// Read a file as UTF-8 text
pub fn read_text(path: &Path) -> ReadOutcome {
    let bytes = match read_file_bytes(path) {
        Ok(b) => b,
        Err(e) => return ReadOutcome::Unreadable(e),
    };

    match String::from_utf8(bytes) {
        Ok(content) => ReadOutcome::Text(normalize_newlines(content)),
        Err(_) => ReadOutcome::NotUtf8,
    }
}

/// Turn `\r\n` and lone `\r` into `\n`
fn normalize_newlines(content: String) -> String {
    if !content.contains('\r') {
        return content;
    }
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Read file bytes; the handle is dropped as soon as the content is captured
fn read_file_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let size = file.metadata().map(|m| m.len() as usize).unwrap_or(0);

    let mut reader = io::BufReader::new(file);
    let mut buffer = Vec::with_capacity(size);
    reader.read_to_end(&mut buffer)?;

    Ok(buffer)
}

/// Read one candidate and turn it into a block, or say why it was skipped
pub fn read_and_format(path: &Path, relative: &str, ignore_empty: bool) -> BlockOutcome {
    let content = match read_text(path) {
        ReadOutcome::Text(content) => content,
        ReadOutcome::NotUtf8 => return BlockOutcome::Skipped(FileWarning::encoding(relative)),
        ReadOutcome::Unreadable(e) => {
            return BlockOutcome::Skipped(FileWarning::unreadable(relative, &e))
        }
    };

    if ignore_empty && content.trim().is_empty() {
        return BlockOutcome::SkippedEmpty;
    }

    BlockOutcome::Block(format_block(relative, &content))
}
