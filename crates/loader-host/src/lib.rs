/*
 * loader-host
 * Copyright (c) 2025 Posit, PBC
 *
 * Load-hook contract between a bundler host and asset transform plugins.
 *
 * A plugin registers load rules (a path filter plus an async handler) on a
 * mutable build handle. The host offers each requested path to the first
 * matching rule and receives a LoadResult: transformed contents, or error
 * messages the host reports without aborting the rest of the build.
 */

mod config;
mod driver;
mod error;
mod filter;
mod plugin;
mod result;

pub use config::{BuildConfig, Minify, MinifyOptions};
pub use driver::{BuildOutput, LoadedModule, PluginDriver};
pub use error::{HostError, HostResult};
pub use filter::LoadFilter;
pub use plugin::{LoadRule, OnLoad, OnLoadArgs, Plugin, PluginBuild};
pub use result::{LoadResult, Loader, Location, Message};
