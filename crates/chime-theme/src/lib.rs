//! Sound theme model, persistence and packaging for chime.
//!
//! # Features
//!
//! - **Catalog**: the 80 freedesktop sound events a theme can define
//! - **Themes**: edit names, comments and sound bindings with change tracking
//! - **Persistence**: load and save themes as JSON
//! - **Export**: package a theme as a freedesktop sound theme directory
//! - **Paths**: platform-specific install and config directories
//!
//! # Example
//!
//! ```rust,no_run
//! use chime_theme::{Theme, export_theme, user_sounds_dir};
//!
//! let mut theme = Theme::new();
//! theme.set_name("Chimes");
//! theme.assign_sound("bell", Some("/usr/share/sounds/ding.ogg".into())).unwrap();
//! theme.save("chimes.json").unwrap();
//!
//! let dest = user_sounds_dir().join("chimes");
//! export_theme(&theme, &dest, |event, _| println!("copied {event}")).unwrap();
//! ```

mod error;
mod export;
mod events;
mod theme;

/// Platform-specific paths for installed themes and configuration.
pub mod paths;

pub use error::ThemeError;
pub use events::{SOUND_EVENTS, event_index, is_sound_event};
pub use export::{ExportSummary, INDEX_FILE, STEREO_DIR, export_theme, index_theme, install_theme};
pub use paths::{
    home_dir, install_dir_name, install_path, user_config_dir, user_config_file, user_sounds_dir,
};
pub use theme::{DEFAULT_COMMENT, DEFAULT_NAME, Theme};
