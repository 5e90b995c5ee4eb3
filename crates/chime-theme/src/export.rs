//! Freedesktop sound theme packaging.
//!
//! An exported theme is a directory holding an `index.theme` descriptor and a
//! `stereo/` folder with one file per bound event, named after the event and
//! keeping the source file's extension:
//!
//! ```text
//! <dest>/index.theme
//! <dest>/stereo/bell.wav
//! <dest>/stereo/message.ogg
//! ```
//!
//! The package is built in a private staging directory first and then merged
//! into the destination, overwriting files that already exist there and
//! leaving the rest alone. The staging directory is removed whether or not
//! the export succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ThemeError;
use crate::paths::install_path;
use crate::theme::Theme;

/// Name of the only output profile directory written.
pub const STEREO_DIR: &str = "stereo";

/// Name of the theme descriptor file.
pub const INDEX_FILE: &str = "index.theme";

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Directory the theme was written to.
    pub dest: PathBuf,
    /// Number of sound files copied.
    pub sounds: usize,
}

/// Render the `index.theme` descriptor.
///
/// Name and comment are escaped as desktop entry values, so line breaks
/// cannot start new keys.
pub fn index_theme(theme: &Theme) -> String {
    format!(
        "[Sound Theme]\n\
         Name={}\n\
         Comment={}\n\
         Directories={STEREO_DIR}\n\
         Example=theme-demo\n\
         \n\
         [{STEREO_DIR}]\n\
         OutputProfile=stereo\n\n",
        escape_value(theme.name()),
        escape_value(theme.comment()),
    )
}

/// Escape a desktop entry string value.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Staged file name for a sound bound to `event`.
fn staged_name(event: &str, source: &Path) -> String {
    match source.extension() {
        Some(ext) => format!("{event}.{}", ext.to_string_lossy()),
        None => event.to_string(),
    }
}

/// Export a saved theme into `dest`.
///
/// `on_sound` is called once after each sound file is staged, with the event
/// id and the source file. Fails with [`ThemeError::Unsaved`] if the theme
/// has unsaved changes.
pub fn export_theme(
    theme: &Theme,
    dest: &Path,
    mut on_sound: impl FnMut(&str, &Path),
) -> Result<ExportSummary, ThemeError> {
    if theme.is_modified() {
        return Err(ThemeError::Unsaved {
            name: theme.name().to_string(),
        });
    }

    let staging = tempfile::Builder::new()
        .prefix("chime-export-")
        .tempdir()
        .map_err(|e| ThemeError::create_dir(std::env::temp_dir(), e))?;
    let stereo = staging.path().join(STEREO_DIR);
    fs::create_dir(&stereo).map_err(|e| ThemeError::create_dir(&stereo, e))?;

    let index = staging.path().join(INDEX_FILE);
    fs::write(&index, index_theme(theme)).map_err(|e| ThemeError::write_file(&index, e))?;

    let mut sounds = 0;
    for (event, source) in theme.bound_sounds() {
        let target = stereo.join(staged_name(event, source));
        fs::copy(source, &target).map_err(|e| ThemeError::copy(source, &target, e))?;
        tracing::debug!(event, source = %source.display(), "staged sound");
        sounds += 1;
        on_sound(event, source);
    }

    merge_tree(staging.path(), dest)?;
    tracing::info!(name = theme.name(), dest = %dest.display(), sounds, "exported theme");

    Ok(ExportSummary {
        dest: dest.to_path_buf(),
        sounds,
    })
}

/// Install a saved theme under `sounds_root`, in a directory named after
/// the theme.
pub fn install_theme(
    theme: &Theme,
    sounds_root: &Path,
    on_sound: impl FnMut(&str, &Path),
) -> Result<ExportSummary, ThemeError> {
    if theme.is_modified() {
        return Err(ThemeError::Unsaved {
            name: theme.name().to_string(),
        });
    }
    let dest = install_path(sounds_root, theme.name())?;
    fs::create_dir_all(&dest).map_err(|e| ThemeError::create_dir(&dest, e))?;
    export_theme(theme, &dest, on_sound)
}

/// Copy everything under `from` into `to`, creating directories as needed.
fn merge_tree(from: &Path, to: &Path) -> Result<(), ThemeError> {
    fs::create_dir_all(to).map_err(|e| ThemeError::create_dir(to, e))?;
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| ThemeError::create_dir(&target, e))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(|e| ThemeError::copy(entry.path(), &target, e))?;
        }
    }
    Ok(())
}
