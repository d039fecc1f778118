/*
 * filter.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Path filters that decide which load rule handles a request.
 */

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::error::{HostError, HostResult};

/// A regular expression matched against the string form of a load path.
///
/// Matching is case-sensitive and unanchored unless the pattern anchors
/// itself; [`LoadFilter::extension`] anchors at the end of the path.
#[derive(Clone)]
pub struct LoadFilter {
    regex: Regex,
}

impl LoadFilter {
    /// Compile a filter from a regular expression.
    pub fn new(pattern: &str) -> HostResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| HostError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Filter matching paths that end in `.{ext}`.
    pub fn extension(ext: &str) -> HostResult<Self> {
        Self::new(&format!(r"\.{}$", regex::escape(ext)))
    }

    /// The pattern this filter was compiled from.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Test a path against the filter.
    ///
    /// Non-UTF-8 paths are matched on their lossy string form.
    pub fn matches(&self, path: &Path) -> bool {
        self.regex.is_match(&path.to_string_lossy())
    }
}

impl fmt::Debug for LoadFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LoadFilter").field(&self.pattern()).finish()
    }
}
