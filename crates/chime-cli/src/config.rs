//! User configuration.
//!
//! Read from `~/.config/chime/config.toml` or the file given with
//! `--config`. Every key is optional:
//!
//! ```toml
//! [dialog]
//! program = "kdialog"
//! title = "Sound theme maker"
//! icon = "preferences-desktop-sound"
//! bus_candidates = ["qdbus6", "qdbus", "qdbus-qt5"]
//!
//! [editor]
//! audio_filter = "audio/flac audio/mpeg audio/vnd.wave audio/ogg audio/aac"
//! sounds_dir = "/home/me/.local/share/sounds"
//! ```

use chime_dialog::{DEFAULT_BUS_CANDIDATES, Kdialog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// MIME types offered when importing a sound.
pub const DEFAULT_AUDIO_FILTER: &str = "audio/flac audio/mpeg audio/vnd.wave audio/ogg audio/aac";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How dialogs are shown.
    pub dialog: DialogConfig,
    /// Editor behavior.
    pub editor: EditorConfig,
}

/// `[dialog]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// kdialog program name or path.
    pub program: String,
    /// Base window title.
    pub title: String,
    /// Icon for passive popups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// D-Bus tools tried for progress bars, in order.
    pub bus_candidates: Vec<String>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            program: "kdialog".to_string(),
            title: "Sound theme maker".to_string(),
            icon: None,
            bus_candidates: DEFAULT_BUS_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[editor]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// MIME filter of the sound import picker.
    pub audio_filter: String,
    /// Where themes are installed; the user sounds directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sounds_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            audio_filter: DEFAULT_AUDIO_FILTER.to_string(),
            sounds_dir: None,
        }
    }
}

impl Config {
    /// Parse a configuration file's contents.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `path`, or the default config file when `None`.
    ///
    /// Falls back to defaults with a warning when the file cannot be read or
    /// parsed. A missing default file is not worth a warning.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = path.map_or_else(chime_theme::user_config_file, Path::to_path_buf);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot read config, using defaults"
                );
                return Self::default();
            }
        };

        match Self::from_toml(&text) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Root directory themes are installed under.
    pub fn sounds_dir(&self) -> PathBuf {
        self.editor
            .sounds_dir
            .clone()
            .unwrap_or_else(chime_theme::user_sounds_dir)
    }

    /// Dialog facade configured from the `[dialog]` table.
    pub fn kdialog(&self) -> Kdialog {
        self.configure(Kdialog::new(&self.dialog.program))
    }

    /// Apply title, icon and bus candidates to an existing facade.
    pub fn configure(&self, kd: Kdialog) -> Kdialog {
        let mut kd = kd.with_bus_candidates(self.dialog.bus_candidates.iter().cloned());
        kd.set_title(self.dialog.title.clone());
        kd.set_icon(self.dialog.icon.clone());
        kd
    }
}
