use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::config::model::{Settings, load_settings};

/// Process-wide settings, loaded on first access from `$COLSEG_CONFIG` (or
/// `config.*` in the working directory) layered over built-in defaults.
pub static CONFIG: Lazy<Arc<Settings>> =
    Lazy::new(|| Arc::new(load_settings().expect("Failed to load colseg configuration")));
