use std::path::PathBuf;

use tracing::warn;
use url::Url;

use crate::api::{ApiConfig, DEFAULT_BACKEND_URL};

pub const BACKEND_URL_VAR: &str = "YT_AUDIO_BACKEND_URL";
pub const SAVE_DIR_VAR: &str = "YT_AUDIO_SAVE_DIR";

/// Runtime settings, read from the environment (and a `.env` file if present).
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// When set, downloads go straight into this directory instead of a dialog.
    pub save_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api = match lookup(BACKEND_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => match Url::parse(raw.trim()) {
                Ok(url) => ApiConfig::new(url.as_str()),
                Err(e) => {
                    warn!(value = %raw, error = %e, "Ignoring invalid {}, using {}", BACKEND_URL_VAR, DEFAULT_BACKEND_URL);
                    ApiConfig::default()
                }
            },
            None => ApiConfig::default(),
        };

        let save_dir = lookup(SAVE_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self { api, save_dir }
    }
}
