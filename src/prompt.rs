//! Interactive source confirmation
//!
//! Before sorting, the user confirms the source folder:
//! - a path that does not resolve to a directory asks for another one
//!   (an empty answer means the current folder)
//! - an existing folder asks `y / n / another path`
//!
//! Input and output are generic so the dialogue can be scripted.

use crate::error::{Error, Result};
use crossterm::style::Stylize;
use rust_i18n::t;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// What the user decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Sort this (canonical) directory
    Proceed(PathBuf),
    /// The user answered `n`
    Abort,
}

/// Resolve a candidate to an existing directory
fn resolve_dir(candidate: &Path) -> Option<PathBuf> {
    let candidate = if candidate.as_os_str().is_empty() {
        Path::new(".")
    } else {
        candidate
    };
    fs::canonicalize(candidate).ok().filter(|p| p.is_dir())
}

/// Read one trimmed line; end of input is an error
fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::InputClosed);
    }
    Ok(line.trim().to_string())
}

/// Ask until the user confirms a directory or aborts
pub fn confirm_source<R: BufRead, W: Write>(
    initial: &Path,
    mut input: R,
    mut output: W,
) -> Result<Confirmation> {
    let mut candidate = initial.to_path_buf();

    loop {
        match resolve_dir(&candidate) {
            None => {
                let question = t!(
                    "prompt_missing_source",
                    path = candidate.display().to_string()
                );
                write!(output, "\n{}", question.to_string().yellow())?;
                output.flush()?;
                candidate = PathBuf::from(read_answer(&mut input)?);
            }
            Some(resolved) => {
                let question = t!(
                    "prompt_confirm_source",
                    path = resolved.display().to_string()
                );
                write!(output, "\n{}", question.to_string().green())?;
                output.flush()?;

                let answer = read_answer(&mut input)?;
                match answer.to_lowercase().as_str() {
                    "n" => return Ok(Confirmation::Abort),
                    "y" => return Ok(Confirmation::Proceed(resolved)),
                    _ => candidate = PathBuf::from(answer),
                }
            }
        }
    }
}
