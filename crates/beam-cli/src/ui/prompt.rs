//! Minimal interactive prompt.

use crossterm::style::Stylize;
use std::io::{BufRead, Write};

/// Ask a question on the terminal and return the trimmed answer.
///
/// When a default is supplied it is shown in the prompt and returned on an
/// empty answer; otherwise the question repeats until something is typed.
pub fn ask(question: &str, default: Option<&str>) -> std::io::Result<String> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    ask_with(question, default, &mut std::io::stdout(), &mut lines)
}

fn ask_with<W: Write, I: Iterator<Item = std::io::Result<String>>>(
    question: &str,
    default: Option<&str>,
    out: &mut W,
    lines: &mut I,
) -> std::io::Result<String> {
    loop {
        match default {
            Some(value) => write!(out, "{} {question} [{value}]: ", "?".green())?,
            None => write!(out, "{} {question}: ", "?".green())?,
        }
        out.flush()?;

        let answer = match lines.next() {
            Some(line) => line?,
            None => {
                // EOF on stdin: fall back to the default or give up.
                if let Some(value) = default {
                    return Ok(value.to_string());
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no answer provided",
                ));
            }
        };
        let answer = answer.trim();

        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        if let Some(value) = default {
            return Ok(value.to_string());
        }
        // No answer and no default: ask again.
    }
}
