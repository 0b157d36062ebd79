//! Interactive confirmation for destructive commands.
//!
//! Kept apart from clap parsing: `--yes` is a flag, the typed prompt is not.

use std::io::{self, BufRead, Write};

use crate::error::AppError;

/// The only answer that lets a destructive command proceed.
pub const CONFIRM_WORD: &str = "yes";

/// Print `prompt`, read one line, and report whether it was the confirm word.
///
/// End of input counts as "no".
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool, AppError> {
    write!(output, "{prompt}")
        .and_then(|_| output.flush())
        .map_err(|e| AppError::config(format!("Failed to write prompt: {e}")))?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::config(format!("Failed to read input: {e}")))?;

    Ok(bytes > 0 && is_confirmation(&line))
}

/// Confirm against the real terminal.
pub fn confirm_stdin(prompt: &str) -> Result<bool, AppError> {
    let stdin = io::stdin();
    confirm(prompt, &mut stdin.lock(), &mut io::stdout())
}

pub fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(CONFIRM_WORD)
}
