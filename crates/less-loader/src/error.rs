//! Error types for Less compilation.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong between reading a `.less` file and getting
/// CSS back.
///
/// The load handler turns every variant into the same diagnostic shape; the
/// variants exist for logging and for callers using the compiler directly.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The requested file could not be read as UTF-8 text
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A caller-supplied option has an unusable value
    #[error("Invalid value for option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    /// No Less compiler executable could be located
    #[error(
        "lessc executable not found (install it with `npm install -g less` or set the LESSC environment variable)"
    )]
    CompilerNotFound,

    /// The compiler process could not be started or awaited
    #[error("Failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler rejected the input
    #[error("{message}")]
    Compilation {
        message: String,
        /// File the compiler attributed the error to
        file: Option<PathBuf>,
        /// 1-based line
        line: Option<u32>,
        /// 1-based column
        column: Option<u32>,
    },
}

impl CompileError {
    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// A compilation error with no location information.
    pub fn compilation(message: impl Into<String>) -> Self {
        Self::Compilation {
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    /// Line and column of the error, if the compiler attributed it to `file`.
    ///
    /// Errors located in another file (an import, say) return `None`.
    pub fn position_in(&self, file: &Path) -> Option<(u32, u32)> {
        match self {
            CompileError::Compilation {
                file: Some(error_file),
                line: Some(line),
                column: Some(column),
                ..
            } if error_file == file => Some((*line, *column)),
            _ => None,
        }
    }
}
