/*
 * error_parser.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Parse lessc error output into structured error information.
 */

//! Parse `lessc` error output.
//!
//! With `--no-color`, `lessc` reports a failure on stderr as a header line
//! followed by a few lines of source context:
//!
//! ```text
//! NameError: variable @undefined is undefined in - on line 3, column 10:
//! 2 .test {
//! 3   color: @undefined;
//! 4 }
//! ```
//!
//! The header carries the error type, the message, the file (`-` when the
//! source came from stdin), and a 1-based line and column. Any of the
//! location parts may be missing.

use once_cell::sync::Lazy;
use regex::Regex;

/// The pseudo-filename `lessc` reports for source read from stdin.
pub const STDIN_FILENAME: &str = "-";

// Tried in order. The message is greedy in the first pattern so the file
// is whatever follows the last " in " before the location; messages such as
// "They cannot be in the root" contain " in " themselves.
static ERROR_HEADERS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(
            r"^(?P<kind>[A-Za-z]*Error): (?P<message>.*) in (?P<file>.+?) on line (?P<line>\d+), column (?P<column>\d+):?\s*$",
        )
        .unwrap(),
        Regex::new(
            r"^(?P<kind>[A-Za-z]*Error): (?P<message>.*?) on line (?P<line>\d+), column (?P<column>\d+):?\s*$",
        )
        .unwrap(),
        Regex::new(r"^(?P<kind>[A-Za-z]*Error): (?P<message>.*?)\s*$").unwrap(),
    ]
});

/// Structured information from `lessc` stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessErrorInfo {
    /// Error type such as `NameError` or `ParseError`, when reported
    pub kind: Option<String>,

    /// The human-readable message, without type or location
    pub message: String,

    /// File as reported by lessc; `-` means the stdin source
    pub file: Option<String>,

    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl LessErrorInfo {
    /// Whether the error is located in the source that was piped to stdin.
    pub fn is_in_stdin(&self) -> bool {
        match &self.file {
            Some(file) => file == STDIN_FILENAME,
            None => self.line.is_some(),
        }
    }
}

/// Parse `lessc` stderr.
///
/// Returns `None` when stderr has no text at all. When no error header is
/// found the first non-empty line becomes the message.
pub fn parse_lessc_error(stderr: &str) -> Option<LessErrorInfo> {
    let mut lines = stderr.lines().map(str::trim).filter(|line| !line.is_empty());

    if let Some(info) = stderr.lines().find_map(parse_header) {
        return Some(info);
    }

    lines.next().map(|line| LessErrorInfo {
        kind: None,
        message: line.to_string(),
        file: None,
        line: None,
        column: None,
    })
}

fn parse_header(line: &str) -> Option<LessErrorInfo> {
    let line = line.trim();
    let caps = ERROR_HEADERS.iter().find_map(|re| re.captures(line))?;
    let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse().ok());

    Some(LessErrorInfo {
        kind: caps.name("kind").map(|m| m.as_str().to_string()),
        message: caps["message"].to_string(),
        file: caps.name("file").map(|m| m.as_str().to_string()),
        line: number("line"),
        column: number("column"),
    })
}
