//! Settings path resolution helpers.

use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "skillbox";

/// File name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "config.toml";

/// Default global settings directory, e.g. `~/.config/skillbox`.
pub fn default_config_dir(home_dir: &Path) -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join(APP_DIR_NAME))
        .unwrap_or_else(|| home_dir.join(".config").join(APP_DIR_NAME))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE_NAME)
}
