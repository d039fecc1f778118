//! Error types for plugin registration.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors raised while plugins register themselves with a host.
///
/// Load handlers never produce these: a failed load is reported as a
/// [`crate::LoadResult`] carrying error messages.
#[derive(Debug, Error)]
pub enum HostError {
    /// A load filter pattern is not a valid regular expression
    #[error("Invalid load filter `{pattern}`: {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A plugin's setup routine failed
    #[error("Plugin `{plugin}` failed during setup: {message}")]
    Setup { plugin: String, message: String },
}

impl HostError {
    /// Create a Setup error for the named plugin.
    pub fn setup(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Setup {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}
