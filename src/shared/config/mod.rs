pub mod global;
pub mod model;

pub use global::CONFIG;
pub use model::{CacheConfig, LoggingConfig, ReaderConfig, Settings, load_settings};

#[cfg(test)]
mod model_test;
