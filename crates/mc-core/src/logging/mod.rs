//! Structured logging for the evaluator.
//!
//! Two output modes, selected by [`LogConfig`]:
//! - human-readable console output for interactive use
//! - JSON lines for batch/automated runs
//!
//! The walker emits one `tracing` span per formula node it visits
//! (`target: "mc_core::walker"`, with the node's kind and result size)
//! and logs recoverable errors (mode mismatches, degraded results) at
//! `warn` rather than failing the whole evaluation. Callers that embed
//! `mc-core` as a library initialize logging once via [`init_logging`];
//! tests can use [`init_default_logging`].

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any evaluation occurs. Respects
/// `MC_LOG`, `RUST_LOG`, and `MC_LOG_FORMAT`.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mc_core={}", config.level)));

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .init();
            }
        }
        LogFormat::Jsonl => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
    }
}

/// Initialize logging with defaults, ignoring a "logging already
/// initialized" error (harmless when several tests in one binary each
/// call this).
pub fn init_default_logging() {
    let config = LogConfig::from_env(None, None);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mc_core={}", config.level)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Info);
    }
}
