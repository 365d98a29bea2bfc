//! Loading and saving the nine-line config file

use std::fs;
use std::path::Path;

use simsync_core::AppConfig;

/// Default config file name, resolved next to the working directory
pub const CONFIG_FILE: &str = "config.txt";

/// Load the config, falling back to defaults wholesale when the file
/// is missing or any line fails to parse. A partial config is never
/// applied.
pub fn load_config(path: impl AsRef<Path>) -> AppConfig {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(text) => match AppConfig::from_lines(text.lines()) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "config unusable, using defaults");
                AppConfig::default()
            }
        },
        Err(error) => {
            tracing::info!(%error, path = %path.display(), "no config file, using defaults");
            AppConfig::default()
        }
    }
}

/// Persist the config. Failure is reported, not fatal.
pub fn save_config(path: impl AsRef<Path>, config: &AppConfig) -> bool {
    let path = path.as_ref();
    match fs::write(path, config.to_lines()) {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "config save failed");
            false
        }
    }
}
