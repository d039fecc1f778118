/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Read-only build configuration handed to plugins.
 */

//! Build configuration.
//!
//! [`BuildConfig`] is the read-only view of the build that plugins may
//! consult. Hosts construct it once per build and share it behind an `Arc`;
//! plugins never mutate it.
//!
//! The configuration deserializes from the JSON shape bundlers commonly use:
//!
//! ```json
//! { "minify": true }
//! { "minify": { "whitespace": true, "syntax": false } }
//! ```

use serde::{Deserialize, Serialize};

/// Build-wide settings visible to plugins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Minification setting, if the build specified one.
    pub minify: Option<Minify>,
}

impl BuildConfig {
    /// Create a configuration with minification on or off.
    pub fn with_minify(enabled: bool) -> Self {
        Self {
            minify: Some(Minify::Enabled(enabled)),
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Whether any form of minification was requested.
    pub fn minify_enabled(&self) -> bool {
        self.minify.as_ref().is_some_and(Minify::is_enabled)
    }
}

/// Minification setting: a plain switch or a per-aspect table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Minify {
    Enabled(bool),
    Granular(MinifyOptions),
}

impl Minify {
    /// A granular table counts as enabled regardless of its contents,
    /// matching how bundlers coerce the setting to a boolean.
    pub fn is_enabled(&self) -> bool {
        match self {
            Minify::Enabled(enabled) => *enabled,
            Minify::Granular(_) => true,
        }
    }
}

/// Per-aspect minification switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyOptions {
    pub whitespace: bool,
    pub syntax: bool,
    pub identifiers: bool,
}
