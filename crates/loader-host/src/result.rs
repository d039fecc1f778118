/*
 * result.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Load results and the diagnostics they carry back to the host.
 */

//! Load results.
//!
//! A [`LoadResult`] is what a load handler hands back for one request:
//! either transformed contents, or one or more error [`Message`]s. Both
//! forms declare a [`Loader`] so the host knows which stage the output
//! belongs to even when the load failed.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The kind of asset a load produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Css,
    Js,
    Json,
    Text,
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Loader::Css => "css",
            Loader::Js => "js",
            Loader::Json => "json",
            Loader::Text => "text",
        };
        f.write_str(name)
    }
}

/// Source position a message is attributed to.
///
/// Line and column are 1-based when known; `0` means "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// Attribute to a file without a known position.
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: 0,
            column: 0,
        }
    }

    /// Attribute to a specific position in a file.
    pub fn at(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A diagnostic reported by a load handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Outcome of one load request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResult {
    pub contents: String,
    pub loader: Loader,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Message>,
}

impl LoadResult {
    /// A successful load producing `contents` for the given loader.
    pub fn asset(contents: impl Into<String>, loader: Loader) -> Self {
        Self {
            contents: contents.into(),
            loader,
            errors: Vec::new(),
        }
    }

    /// A successful stylesheet load.
    pub fn css(contents: impl Into<String>) -> Self {
        Self::asset(contents, Loader::Css)
    }

    /// A failed load: empty contents plus the given error.
    ///
    /// Failed results always carry at least one message; use
    /// [`LoadResult::with_error`] to attach more.
    pub fn failed(error: Message, loader: Loader) -> Self {
        Self {
            contents: String::new(),
            loader,
            errors: vec![error],
        }
    }

    pub fn with_error(mut self, error: Message) -> Self {
        self.errors.push(error);
        self
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
