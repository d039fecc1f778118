/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-request compile options and the caller override table.
 */

//! Compile options.
//!
//! Every request gets a fresh [`CompileOptions`] built in two steps:
//!
//! 1. Defaults computed from the request: `filename` is the requested path,
//!    `paths` is the directory containing it, `compress` mirrors the build's
//!    minify setting.
//! 2. The caller's [`LessOptions`] table applied on top, key by key. A key
//!    present in the table replaces the computed value wholesale (nested
//!    values are never merged). Keys other than the three defaults are kept
//!    in [`CompileOptions::extra`] and passed through to the compiler.
//!
//! Option names follow the Less JavaScript API (`strictMath`, `globalVars`,
//! ...), so a table written for the JavaScript loader works unchanged.

use std::path::{Path, PathBuf};

use loader_host::BuildConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CompileError;

pub const FILENAME: &str = "filename";
pub const PATHS: &str = "paths";
pub const COMPRESS: &str = "compress";

/// Caller-supplied option overrides, keyed by Less option name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessOptions(Map<String, Value>);

impl LessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an override table from a JSON object.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for LessOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Options for compiling one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Source file, used for relative import resolution and error attribution
    pub filename: PathBuf,
    /// Directories searched for imports
    pub paths: Vec<PathBuf>,
    /// Produce compressed output
    pub compress: bool,
    /// Any other options, passed through to the compiler
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Directory of the requested file; unaffected by a `filename` override
    #[serde(skip)]
    pub request_dir: Option<PathBuf>,
}

impl CompileOptions {
    /// Defaults derived from the request path and build configuration.
    pub fn defaults_for(path: &Path, config: &BuildConfig) -> Self {
        let request_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Self {
            filename: path.to_path_buf(),
            paths: request_dir.iter().cloned().collect(),
            compress: config.minify_enabled(),
            extra: Map::new(),
            request_dir,
        }
    }

    /// Defaults for the request with the caller's overrides applied.
    pub fn resolve(
        path: &Path,
        config: &BuildConfig,
        overrides: &LessOptions,
    ) -> Result<Self, CompileError> {
        let mut options = Self::defaults_for(path, config);
        for (key, value) in overrides.iter() {
            match key.as_str() {
                FILENAME => options.filename = parse_override(key, value)?,
                PATHS => options.paths = parse_override(key, value)?,
                COMPRESS => options.compress = parse_override(key, value)?,
                _ => {
                    options.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(options)
    }

    /// Directory the compiler should run in: the requested file's directory,
    /// even when `filename` was overridden.
    pub fn working_dir(&self) -> Option<&Path> {
        self.request_dir.as_deref()
    }
}

fn parse_override<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, CompileError> {
    serde_json::from_value(value.clone())
        .map_err(|e| CompileError::invalid_option(key, e.to_string()))
}
