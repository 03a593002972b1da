//! System clipboard
//!
//! Pipes text into the first platform clipboard tool found on PATH.

use thiserror::Error;
use tracing::debug;

use crate::core::util::{command_exists, pipe_to_command};

/// Clipboard tools in probe order: (program, args)
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard tool found (tried pbcopy, wl-copy, xclip, xsel, clip)")]
    NoBackend,

    #[error("{program} failed: {source}")]
    Failed {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Find the clipboard tool to use on this machine
pub fn get_clipboard_command() -> Option<(&'static str, &'static [&'static str])> {
    CLIPBOARD_COMMANDS
        .iter()
        .copied()
        .find(|(program, _)| command_exists(program))
}

/// Copy text to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let (program, args) = get_clipboard_command().ok_or(ClipboardError::NoBackend)?;
    copy_with(program, args, text)
}

fn copy_with(program: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    debug!("copying {} bytes with {}", text.len(), program);
    pipe_to_command(program, args, text)
        .map_err(|source| ClipboardError::Failed { program, source })
}
