//! Error types for theme operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or exporting a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file
    #[error("failed to copy '{from}' to '{to}': {source}")]
    Copy {
        /// Source file.
        from: PathBuf,
        /// Destination file.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON
    #[error("failed to parse JSON in '{path}'")]
    Json {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parser error with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// Theme could not be serialized
    #[error("failed to serialize theme: {0}")]
    Serialize(#[source] serde_json::Error),

    /// JSON is well formed but not shaped like a theme
    #[error("this doesn't look like a sound theme: {reason}")]
    NotATheme {
        /// Which part of the document is wrong.
        reason: &'static str,
    },

    /// Sound id outside the event catalog
    #[error("unknown sound ID: {0}")]
    UnknownSound(String),

    /// A bound sound file does not exist
    #[error("missing sound for '{event}': {path}")]
    MissingSound {
        /// Event the file is bound to.
        event: String,
        /// Path that does not exist.
        path: PathBuf,
    },

    /// The theme has changes that are not on disk yet
    #[error("theme '{name}' has unsaved changes")]
    Unsaved {
        /// Theme name.
        name: String,
    },

    /// The theme name has no characters usable as a directory name
    #[error("theme name '{name}' has no letters or digits to install under")]
    EmptyInstallName {
        /// Theme name.
        name: String,
    },

    /// Failed to walk the staging tree
    #[error("failed to walk staging directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ThemeError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a copy error.
    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::Copy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Create a not-a-theme error.
    pub fn not_a_theme(reason: &'static str) -> Self {
        ThemeError::NotATheme { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let expected = std::path::Path::new("/some/theme.json");
        let err = ThemeError::read_file(expected, mock_io_err());
        assert!(matches!(err, ThemeError::ReadFile { ref path, .. } if path == expected));
    }

    #[test]
    fn copy_display_names_both_ends() {
        let err = ThemeError::copy("/a/bell.wav", "/b/stereo/bell.wav", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("/a/bell.wav"), "got: {msg}");
        assert!(msg.contains("/b/stereo/bell.wav"), "got: {msg}");
    }

    #[test]
    fn not_a_theme_display() {
        let err = ThemeError::not_a_theme("'sounds' must be an object");
        assert_eq!(
            err.to_string(),
            "this doesn't look like a sound theme: 'sounds' must be an object"
        );
    }

    #[test]
    fn unknown_sound_display() {
        let err = ThemeError::UnknownSound("door-slam".to_string());
        assert_eq!(err.to_string(), "unknown sound ID: door-slam");
    }

    #[test]
    fn json_source_is_parser_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ThemeError::Json {
            path: "/t.json".into(),
            source,
        };
        assert!(err.source().is_some(), "Json must expose parser error");
        assert!(err.to_string().contains("/t.json"));
    }

    #[test]
    fn io_variants_expose_source() {
        assert!(ThemeError::write_file("/x", mock_io_err()).source().is_some());
        assert!(ThemeError::create_dir("/x", mock_io_err()).source().is_some());
        assert!(ThemeError::copy("/x", "/y", mock_io_err()).source().is_some());
    }

    #[test]
    fn validation_variants_have_no_source() {
        assert!(ThemeError::not_a_theme("x").source().is_none());
        assert!(ThemeError::UnknownSound("x".into()).source().is_none());
    }
}
