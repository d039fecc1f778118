/*
 * plugin.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The less-loader plugin: `.less` load rule and its handler.
 */

//! The `less-loader` plugin.
//!
//! [`LessPlugin`] registers one load rule matching paths that end in
//! `.less`. Its handler reads the file, resolves [`CompileOptions`] for the
//! request, and hands both to a [`LessCompiler`]. Every outcome is a
//! [`LoadResult`] declaring the CSS loader:
//!
//! - success: the compiled CSS
//! - any failure (unreadable file, bad option, compiler error): empty
//!   contents and a single error message prefixed with
//!   `Less compilation failed: `, attributed to the requested file
//!
//! # Example
//!
//! ```ignore
//! use less_loader::{less_plugin, less_plugin_with, LessOptions};
//! use loader_host::{BuildConfig, PluginDriver};
//!
//! let mut driver = PluginDriver::new(BuildConfig::with_minify(true));
//! driver.register(&less_plugin())?;
//!
//! // Or with extra compiler options
//! let plugin = less_plugin_with(LessOptions::new().set("math", "always"));
//!
//! let output = driver.build(["/project/styles/main.less"]).await;
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use loader_host::{
    BuildConfig, HostResult, LoadFilter, LoadResult, Loader, Location, Message, OnLoad,
    OnLoadArgs, Plugin, PluginBuild,
};
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::compiler::LessCompiler;
use crate::error::CompileError;
use crate::lessc::LesscCompiler;
use crate::options::{CompileOptions, LessOptions};

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "less-loader";

/// File extension the plugin claims.
pub const LESS_EXTENSION: &str = "less";

/// Prefix of every failure message.
pub const FAILURE_PREFIX: &str = "Less compilation failed: ";

/// Plugin compiling `.less` files to CSS.
///
/// Cloning is cheap: options and compiler are shared. The default `lessc`
/// backend is located on first use, so a plugin given its own compiler
/// through [`LessPlugin::with_compiler`] never searches for `lessc`.
#[derive(Clone)]
pub struct LessPlugin {
    options: Arc<LessOptions>,
    compiler: Arc<OnceCell<Arc<dyn LessCompiler>>>,
}

impl LessPlugin {
    /// A plugin with no option overrides, using `lessc`.
    pub fn new() -> Self {
        Self::with_options(LessOptions::new())
    }

    /// A plugin applying `options` on top of the per-request defaults.
    pub fn with_options(options: LessOptions) -> Self {
        Self {
            options: Arc::new(options),
            compiler: Arc::new(OnceCell::new()),
        }
    }

    /// Replace the compiler backend.
    pub fn with_compiler(mut self, compiler: Arc<dyn LessCompiler>) -> Self {
        self.compiler = Arc::new(OnceCell::with_value(compiler));
        self
    }

    /// The compiler backend, locating `lessc` if none was given.
    pub fn compiler(&self) -> &Arc<dyn LessCompiler> {
        self.compiler.get_or_init(|| Arc::new(LesscCompiler::discover()))
    }

    pub fn options(&self) -> &LessOptions {
        &self.options
    }

    pub fn compiler_name(&self) -> &str {
        self.compiler().name()
    }

    /// The load handler this plugin registers.
    pub fn handler(&self) -> LessLoadHandler {
        LessLoadHandler {
            options: Arc::clone(&self.options),
            compiler: Arc::clone(self.compiler()),
        }
    }
}

impl Default for LessPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LessPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessPlugin")
            .field("options", &self.options)
            .field("compiler", &self.compiler.get().map(|c| c.name()))
            .finish()
    }
}

impl Plugin for LessPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn setup(&self, build: &mut PluginBuild) -> HostResult<()> {
        build.on_load(LoadFilter::extension(LESS_EXTENSION)?, Arc::new(self.handler()));
        Ok(())
    }
}

/// Plugin with no option overrides.
pub fn less_plugin() -> LessPlugin {
    LessPlugin::new()
}

/// Plugin closing over caller-supplied option overrides.
///
/// With an empty table this behaves exactly like [`less_plugin`].
pub fn less_plugin_with(options: LessOptions) -> LessPlugin {
    LessPlugin::with_options(options)
}

/// Load handler for `.less` files.
pub struct LessLoadHandler {
    options: Arc<LessOptions>,
    compiler: Arc<dyn LessCompiler>,
}

impl LessLoadHandler {
    /// Read and compile one file, returning the CSS or the first failure.
    pub async fn compile_file(
        &self,
        path: &Path,
        config: &BuildConfig,
    ) -> Result<String, CompileError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CompileError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let options = CompileOptions::resolve(path, config, &self.options)?;
        debug!(
            path = %path.display(),
            compress = options.compress,
            compiler = self.compiler.name(),
            "Compiling less"
        );

        self.compiler.compile(&source, &options).await
    }
}

#[async_trait]
impl OnLoad for LessLoadHandler {
    async fn on_load(&self, args: &OnLoadArgs, config: &BuildConfig) -> LoadResult {
        match self.compile_file(&args.path, config).await {
            Ok(css) => LoadResult::css(css),
            Err(err) => {
                warn!(path = %args.path.display(), error = %err, "Less compilation failed");
                failure_result(&args.path, &err)
            }
        }
    }
}

/// The diagnostic result for a failed request.
///
/// The location always names `path`. Line and column come from the compiler
/// when it located the error in `path` itself, and are `0` otherwise.
pub fn failure_result(path: &Path, err: &CompileError) -> LoadResult {
    let location = match err.position_in(path) {
        Some((line, column)) => Location::at(path, line, column),
        None => Location::file(path),
    };
    let message = Message::new(format!("{}{}", FAILURE_PREFIX, err)).at(location);
    LoadResult::failed(message, Loader::Css)
}
