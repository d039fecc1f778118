/*
 * driver.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * In-process host that runs plugin setup and dispatches loads.
 */

//! In-process plugin driver.
//!
//! [`PluginDriver`] plays the host role of the load-hook contract. It runs
//! each plugin's setup against a [`PluginBuild`] handle, keeps the resulting
//! load rules in registration order, and dispatches requested paths to the
//! first rule whose filter matches.
//!
//! [`PluginDriver::build`] loads many paths concurrently. Every matched path
//! yields exactly one [`LoadResult`]; a failing load never stops the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::BuildConfig;
use crate::error::HostResult;
use crate::plugin::{LoadRule, OnLoadArgs, Plugin, PluginBuild};
use crate::result::{LoadResult, Loader, Location, Message};

/// A load produced by a registered rule.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub path: PathBuf,
    /// Plugin whose rule handled the path
    pub plugin: String,
    pub result: LoadResult,
}

/// Outcome of a [`PluginDriver::build`] call.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Loaded paths, in the order they were requested
    pub outputs: Vec<LoadedModule>,
    /// Requested paths no rule matched
    pub unmatched: Vec<PathBuf>,
}

impl BuildOutput {
    /// True when no load reported an error.
    pub fn success(&self) -> bool {
        self.outputs.iter().all(|m| m.result.is_success())
    }

    /// All error messages, in output order.
    pub fn logs(&self) -> impl Iterator<Item = &Message> {
        self.outputs.iter().flat_map(|m| m.result.errors.iter())
    }

    /// The output for a specific path, if it was loaded.
    pub fn output_for(&self, path: &Path) -> Option<&LoadedModule> {
        self.outputs.iter().find(|m| m.path == path)
    }
}

/// Host driver holding the build configuration and registered load rules.
#[derive(Debug)]
pub struct PluginDriver {
    config: Arc<BuildConfig>,
    rules: Vec<LoadRule>,
}

impl PluginDriver {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config: Arc::new(config),
            rules: Vec::new(),
        }
    }

    /// Create a driver and register every plugin in order.
    pub fn with_plugins(config: BuildConfig, plugins: &[&dyn Plugin]) -> HostResult<Self> {
        let mut driver = Self::new(config);
        for plugin in plugins {
            driver.register(*plugin)?;
        }
        Ok(driver)
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run a plugin's setup and keep the rules it registered.
    pub fn register(&mut self, plugin: &dyn Plugin) -> HostResult<()> {
        let mut build = PluginBuild::new(plugin.name(), Arc::clone(&self.config));
        plugin.setup(&mut build)?;
        let rules = build.into_rules();
        debug!(plugin = plugin.name(), rules = rules.len(), "Registered plugin");
        self.rules.extend(rules);
        Ok(())
    }

    /// Registered rules in dispatch order.
    pub fn rules(&self) -> &[LoadRule] {
        &self.rules
    }

    /// The first rule whose filter matches `path`.
    pub fn find_rule(&self, path: &Path) -> Option<&LoadRule> {
        self.rules.iter().find(|rule| rule.filter.matches(path))
    }

    /// Load one path. Returns `None` when no rule matches.
    pub async fn load(&self, path: impl Into<PathBuf>) -> Option<LoadResult> {
        let args = OnLoadArgs::new(path);
        let rule = self.find_rule(&args.path)?;
        debug!(path = %args.path.display(), plugin = %rule.plugin, "Dispatching load");
        Some(rule.handler.on_load(&args, &self.config).await)
    }

    /// Load every path concurrently.
    ///
    /// Each matched path runs on its own task; outputs keep the request
    /// order. A handler that panics is reported as an error for its path.
    pub async fn build<I, P>(&self, paths: I) -> BuildOutput
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut output = BuildOutput::default();
        let mut pending = Vec::new();

        for path in paths {
            let args = OnLoadArgs::new(path);
            let Some(rule) = self.find_rule(&args.path) else {
                debug!(path = %args.path.display(), "No load rule matched");
                output.unmatched.push(args.path);
                continue;
            };

            let handler = Arc::clone(&rule.handler);
            let config = Arc::clone(&self.config);
            let task_args = args.clone();
            let task =
                tokio::spawn(async move { handler.on_load(&task_args, &config).await });
            pending.push((args.path, rule.plugin.clone(), task));
        }

        for (path, plugin, task) in pending {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(path = %path.display(), plugin = %plugin, error = %err, "Load task failed");
                    LoadResult::failed(
                        Message::new(format!(
                            "Load handler of plugin `{}` did not complete: {}",
                            plugin, err
                        ))
                        .at(Location::file(&path)),
                        Loader::Text,
                    )
                }
            };

            if !result.is_success() {
                debug!(path = %path.display(), errors = result.errors.len(), "Load reported errors");
            }

            output.outputs.push(LoadedModule {
                path,
                plugin,
                result,
            });
        }

        output
    }
}
