//! Persistence and pacing settings.

use std::path::PathBuf;

use serde::Deserialize;

/// Save file used on native targets.
pub const DEFAULT_SAVE_FILE: &str = "stormidle_save.json";

/// localStorage key used in the browser.
pub const DEFAULT_STORAGE_KEY: &str = "stormidle_save";

/// Max time offline that counts towards progress.
pub const MAX_OFFLINE_SECONDS: u64 = 3_600;

/// Seconds of play between autosaves.
pub const AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

/// Host-tunable settings. Every field is optional when deserialized, so a
/// host can embed this in its own settings file and override a single value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub save_path: PathBuf,
    pub storage_key: String,
    pub max_offline_seconds: u64,
    pub autosave_interval_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            max_offline_seconds: MAX_OFFLINE_SECONDS,
            autosave_interval_secs: AUTOSAVE_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    pub fn with_max_offline_seconds(mut self, secs: u64) -> Self {
        self.max_offline_seconds = secs;
        self
    }
}
