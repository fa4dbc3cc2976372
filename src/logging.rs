use std::io::IsTerminal;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::shared::config::{CONFIG, LoggingConfig};

pub fn init() -> anyhow::Result<()> {
    init_with(&CONFIG.logging)
}

/// Console logs go to stderr; stdout belongs to command output. An empty
/// `log_dir` disables the rolling file.
pub fn init_with(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_filter(level(&cfg.console_level)?);

    let file_layer = if cfg.log_dir.is_empty() {
        None
    } else {
        let appender = tracing_appender::rolling::daily(&cfg.log_dir, "colseg.log");
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(appender)
                .with_filter(level(&cfg.file_level)?),
        )
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(target: "colseg::logging", log_dir = %cfg.log_dir, "Logging initialized");
    Ok(())
}

fn level(name: &str) -> anyhow::Result<LevelFilter> {
    name.parse::<LevelFilter>()
        .with_context(|| format!("invalid log level {name:?}"))
}

#[cfg(test)]
pub fn init_for_tests() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("colseg=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
