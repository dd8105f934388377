//! # Logging
//!
//! Installs an [env_logger] backend for the [log] macros used throughout the crate.

use std::sync::Once;

/// # Logging Config
///
/// `filter` follows the `env_logger` filter syntax, e.g. `"info"` or `"fae=debug,winit=warn"`.
/// When it is `None` the `RUST_LOG` environment variable is used, then `info`.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Explicit filter directives.
    pub filter: Option<String>,
    /// Whether to color output.
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Calls after the first are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::warn!("a logger was already installed");
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_twice_does_not_panic() {
        init_logging(LoggingConfig {
            filter: Some("warn".to_string()),
            ..LoggingConfig::default()
        });
        init_logging(LoggingConfig::default());

        assert!(INIT.is_completed());
    }
}
