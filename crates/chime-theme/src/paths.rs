//! Platform paths for installed sound themes and chime configuration.
//!
//! # Directory Structure
//!
//! - **User sound themes**: `$XDG_DATA_HOME/sounds/` (Linux, usually `~/.local/share/sounds/`)
//! - **User config**: `~/.config/chime/` (Linux)

use std::path::{Path, PathBuf};

use crate::error::ThemeError;

/// Application name used for directory paths.
const APP_NAME: &str = "chime";

/// Subdirectory of the data directory holding sound themes.
const SOUNDS_SUBDIR: &str = "sounds";

/// Name of the configuration file inside [`user_config_dir`].
const CONFIG_FILE: &str = "config.toml";

/// Returns the directory user sound themes are installed into.
///
/// Returns a fallback path if the data directory cannot be determined.
pub fn user_sounds_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SOUNDS_SUBDIR)
}

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default configuration file path.
pub fn user_config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the user's home directory, where file pickers start.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Directory name a theme is installed under: the letters and digits of
/// its name, lowercased.
///
/// # Example
///
/// ```rust
/// use chime_theme::paths::install_dir_name;
///
/// assert_eq!(install_dir_name("My Cool Theme!"), "mycooltheme");
/// ```
pub fn install_dir_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Full install directory for a theme named `name` under `sounds_root`.
pub fn install_path(sounds_root: &Path, name: &str) -> Result<PathBuf, ThemeError> {
    let dir_name = install_dir_name(name);
    if dir_name.is_empty() {
        return Err(ThemeError::EmptyInstallName { name: name.to_string() });
    }
    Ok(sounds_root.join(dir_name))
}
