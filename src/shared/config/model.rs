use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub reader: ReaderConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ReaderConfig {
    /// Used when a segment header stores 0 rows per block.
    pub default_rows_per_block: u32,
    /// Newest column data version this build understands. Newer files are read with a warning.
    pub max_supported_version: u16,
}

#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    pub index_stream_cache_max_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub console_level: String,
    pub file_level: String,
}

use std::env;

fn builder_with_defaults()
-> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("reader.default_rows_per_block", 1024)?
        .set_default("reader.max_supported_version", 1)?
        .set_default("cache.index_stream_cache_max_bytes", 256 * 1024 * 1024)?
        .set_default("logging.log_dir", "logs")?
        .set_default("logging.console_level", "info")?
        .set_default("logging.file_level", "debug")
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("COLSEG_CONFIG").unwrap_or_else(|_| "config".to_string());

    let settings: Settings = builder_with_defaults()?
        .add_source(config::File::with_name(&config_path).required(false))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

/// Parses settings from an in-memory TOML document layered over the defaults.
pub fn settings_from_toml(toml: &str) -> Result<Settings, config::ConfigError> {
    builder_with_defaults()?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}
