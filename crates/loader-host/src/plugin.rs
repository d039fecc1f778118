/*
 * plugin.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Plugin registration contract.
 */

//! Plugin registration contract.
//!
//! A [`Plugin`] has a name and a setup routine. During setup it receives a
//! mutable [`PluginBuild`] handle and registers load rules on it: a
//! [`LoadFilter`] paired with an [`OnLoad`] handler. The host later offers
//! every requested path to the first rule whose filter matches.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use loader_host::{
//!     BuildConfig, HostResult, LoadFilter, LoadResult, Loader, OnLoad, OnLoadArgs, Plugin,
//!     PluginBuild,
//! };
//! use std::sync::Arc;
//!
//! struct Uppercase;
//!
//! #[async_trait]
//! impl OnLoad for Uppercase {
//!     async fn on_load(&self, args: &OnLoadArgs, _config: &BuildConfig) -> LoadResult {
//!         let text = tokio::fs::read_to_string(&args.path).await.unwrap_or_default();
//!         LoadResult::asset(text.to_uppercase(), Loader::Text)
//!     }
//! }
//!
//! struct UppercasePlugin;
//!
//! impl Plugin for UppercasePlugin {
//!     fn name(&self) -> &str { "uppercase" }
//!
//!     fn setup(&self, build: &mut PluginBuild) -> HostResult<()> {
//!         build.on_load(LoadFilter::extension("txt")?, Arc::new(Uppercase));
//!         Ok(())
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BuildConfig;
use crate::error::HostResult;
use crate::filter::LoadFilter;
use crate::result::LoadResult;

/// Arguments for one load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnLoadArgs {
    /// Absolute path of the requested file
    pub path: PathBuf,
}

impl OnLoadArgs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Handler invoked for every path matching a load rule.
///
/// Handlers must always produce a [`LoadResult`]; failures are reported
/// through its error messages, never by panicking or returning early.
///
/// # Thread Safety
///
/// Handlers are shared behind an `Arc` and may run concurrently for many
/// distinct paths, so they must be `Send + Sync` and keep no mutable state
/// between invocations.
#[async_trait]
pub trait OnLoad: Send + Sync {
    /// Produce the result for one request.
    ///
    /// `config` is the read-only build configuration for the current build.
    async fn on_load(&self, args: &OnLoadArgs, config: &BuildConfig) -> LoadResult;
}

/// A registered filter/handler pair.
#[derive(Clone)]
pub struct LoadRule {
    /// Name of the plugin that registered this rule
    pub plugin: String,
    pub filter: LoadFilter,
    pub handler: Arc<dyn OnLoad>,
}

impl std::fmt::Debug for LoadRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadRule")
            .field("plugin", &self.plugin)
            .field("filter", &self.filter)
            .field("handler", &"<OnLoad>")
            .finish()
    }
}

/// Mutable build handle passed to [`Plugin::setup`].
#[derive(Debug)]
pub struct PluginBuild {
    config: Arc<BuildConfig>,
    plugin: String,
    rules: Vec<LoadRule>,
}

impl PluginBuild {
    /// Create a handle for the named plugin.
    pub fn new(plugin: impl Into<String>, config: Arc<BuildConfig>) -> Self {
        Self {
            config,
            plugin: plugin.into(),
            rules: Vec::new(),
        }
    }

    /// The build configuration (read-only).
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Register a load rule.
    pub fn on_load(&mut self, filter: LoadFilter, handler: Arc<dyn OnLoad>) {
        tracing::debug!(
            plugin = %self.plugin,
            filter = filter.pattern(),
            "Registering load rule"
        );
        self.rules.push(LoadRule {
            plugin: self.plugin.clone(),
            filter,
            handler,
        });
    }

    /// Rules registered so far, in registration order.
    pub fn rules(&self) -> &[LoadRule] {
        &self.rules
    }

    pub(crate) fn into_rules(self) -> Vec<LoadRule> {
        self.rules
    }
}

/// A build plugin.
pub trait Plugin: Send + Sync {
    /// Human-readable name, used for logging and in rule attribution.
    fn name(&self) -> &str;

    /// Register load rules on the build handle.
    fn setup(&self, build: &mut PluginBuild) -> HostResult<()>;
}
