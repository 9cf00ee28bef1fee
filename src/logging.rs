//! Logger setup on top of the `log` facade.
//!
//! `run_with_config` calls [`init_logging`] before opening a window, so demos
//! only need to touch this to change the filter.

use std::sync::Once;

/// Filter applied when neither an explicit filter nor `RUST_LOG` is set.
/// wgpu's internals are chatty at `info`.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax
/// (e.g. `"debug"` or `"firstlight=debug,wgpu=warn"`).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter string that [`init_logging`] will apply.
    ///
    /// Precedence: explicit filter, then `RUST_LOG`, then the built-in default.
    pub fn resolved_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&config.resolved_filter());
        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding apps).
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig::default().filter("firstlight=trace");
        assert_eq!(config.resolved_filter(), "firstlight=trace");
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default().filter("warn"));
        init_logging(LoggingConfig::default().filter("trace"));
        log::warn!("still alive");
    }
}
