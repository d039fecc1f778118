//! Less stylesheet loader plugin.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - The `less-loader` plugin, claiming paths that end in `.less`
//! - Per-request compile options with caller overrides
//! - The `LessCompiler` boundary and a `lessc` subprocess backend
//! - Parsing of `lessc` error output into located diagnostics

mod compiler;
mod error;
mod error_parser;
mod lessc;
mod options;
mod plugin;

pub use compiler::LessCompiler;
pub use error::CompileError;
pub use error_parser::{LessErrorInfo, STDIN_FILENAME, parse_lessc_error};
pub use lessc::{LESSC_ENV, LesscCompiler, find_lessc, lessc_args};
pub use options::{COMPRESS, CompileOptions, FILENAME, LessOptions, PATHS};
pub use plugin::{
    FAILURE_PREFIX, LESS_EXTENSION, LessLoadHandler, LessPlugin, PLUGIN_NAME, failure_result,
    less_plugin, less_plugin_with,
};
