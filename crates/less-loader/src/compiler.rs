/*
 * compiler.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The boundary between the loader and a Less compiler implementation.
 */

use async_trait::async_trait;

use crate::error::CompileError;
use crate::options::CompileOptions;

/// A Less compiler.
///
/// Implementations receive the file's text and the resolved options for one
/// request and return CSS. They are shared across concurrent loads, so they
/// must not keep per-request state.
///
/// Whatever shape the underlying compiler reports errors in, implementations
/// normalize it into a [`CompileError`] before returning.
#[async_trait]
pub trait LessCompiler: Send + Sync {
    /// Backend name, for logging.
    fn name(&self) -> &str;

    async fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, CompileError>;
}
