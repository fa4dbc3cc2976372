use crate::shared::config::model::settings_from_toml;

#[test]
fn defaults_apply_without_any_source() {
    let settings = settings_from_toml("").expect("defaults");
    assert_eq!(settings.reader.default_rows_per_block, 1024);
    assert_eq!(settings.reader.max_supported_version, 1);
    assert_eq!(settings.cache.index_stream_cache_max_bytes, 256 * 1024 * 1024);
    assert_eq!(settings.logging.console_level, "info");
}

#[test]
fn toml_overrides_individual_keys() {
    let settings = settings_from_toml(
        r#"
        [reader]
        default_rows_per_block = 4096

        [cache]
        index_stream_cache_max_bytes = 1024
        "#,
    )
    .expect("parse");
    assert_eq!(settings.reader.default_rows_per_block, 4096);
    assert_eq!(settings.reader.max_supported_version, 1);
    assert_eq!(settings.cache.index_stream_cache_max_bytes, 1024);
    assert_eq!(settings.logging.log_dir, "logs");
}
