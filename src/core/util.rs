//! Common utilities

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Check if a command is available in PATH
pub fn command_exists(cmd: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| is_executable_in(&dir, cmd)))
        .unwrap_or(false)
}

fn is_executable_in(dir: &Path, cmd: &str) -> bool {
    if dir.join(cmd).is_file() {
        return true;
    }
    // Windows resolves `clip` to `clip.exe` through PATHEXT
    executable_extensions()
        .iter()
        .any(|ext| dir.join(format!("{}{}", cmd, ext)).is_file())
}

fn executable_extensions() -> Vec<String> {
    if !cfg!(windows) {
        return Vec::new();
    }
    env::var_os("PATHEXT")
        .unwrap_or_else(|| OsString::from(".COM;.EXE;.BAT;.CMD"))
        .to_string_lossy()
        .split(';')
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Feed `input` to a command on stdin and wait for it to exit.
///
/// stdout and stderr go to null. Tools like xclip leave a child serving the
/// selection, which must not hold any pipe of ours open.
pub fn pipe_to_command(program: &str, args: &[&str], input: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(io::Error::other(format!("{} exited with {}", program, status)));
    }
    Ok(())
}
