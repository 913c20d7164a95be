//! Logging handle threaded through dispatch and validation.
//!
//! The `log` facade is process-wide, but nothing in the library reaches for
//! it without a [`LogContext`]: the context carries the log target, so every
//! record names the component and phase that produced it. Binaries install the
//! `env_logger` backend once with [`init_logging`].

use anyhow::{Context, Result};
use env_logger::Env;
use log::LevelFilter;

/// Log target root for every record the client emits.
pub const COMPONENT: &str = "DataCatalogConnectorClient";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogContext {
    target: String,
}

impl LogContext {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            target: component.into(),
        }
    }

    /// Derive a context for one phase, e.g. `DataCatalogConnectorClient::get-asset`.
    pub fn scoped(&self, phase: &str) -> Self {
        Self {
            target: format!("{}::{phase}", self.target),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new(COMPONENT)
    }
}

/// Install the `env_logger` backend.
///
/// `RUST_LOG` is honored; without it the filter defaults to `info`. An
/// explicit `level` (from `--log-level`) wins over both.
pub fn init_logging(level: Option<LevelFilter>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder
        .format_timestamp_millis()
        .try_init()
        .context("installing the log backend")
}
