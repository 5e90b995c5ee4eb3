//! Theme model and JSON persistence.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::ThemeError;
use crate::events::{SOUND_EVENTS, event_index};

/// Name given to new themes.
pub const DEFAULT_NAME: &str = "Sound theme";

/// Comment given to new themes.
pub const DEFAULT_COMMENT: &str = "This is a sound theme!";

/// A sound theme being edited.
///
/// Holds one optional sound file per catalog event, the files imported so far
/// and the JSON file the theme was last opened from or saved to.
///
/// # JSON Format
///
/// ```json
/// {
///     "name": "Chimes",
///     "comment": "Soft bells",
///     "sounds": {
///         "alarm-clock-elapsed": null,
///         "bell": "/home/me/sounds/ding.ogg",
///         ...
///     }
/// }
/// ```
///
/// Saved files list every catalog event. Files being opened may leave events
/// out; those stay unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    comment: String,
    sounds: Vec<Option<PathBuf>>,
    imported: Vec<PathBuf>,
    path: Option<PathBuf>,
    modified: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            sounds: vec![None; SOUND_EVENTS.len()],
            imported: Vec::new(),
            path: None,
            modified: false,
        }
    }
}

impl Theme {
    /// Create an empty, unmodified theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the theme.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.modified = true;
    }

    /// Theme comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Change the comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
        self.modified = true;
    }

    /// Sound bound to `event`.
    pub fn sound(&self, event: &str) -> Result<Option<&Path>, ThemeError> {
        let index = event_index(event).ok_or_else(|| ThemeError::UnknownSound(event.to_string()))?;
        Ok(self.sounds[index].as_deref())
    }

    /// Every event with its binding, in catalog order.
    pub fn sounds(&self) -> impl Iterator<Item = (&'static str, Option<&Path>)> + '_ {
        SOUND_EVENTS
            .iter()
            .copied()
            .zip(self.sounds.iter().map(Option::as_deref))
    }

    /// Events that have a sound, in catalog order.
    pub fn bound_sounds(&self) -> impl Iterator<Item = (&'static str, &Path)> + '_ {
        self.sounds().filter_map(|(event, path)| path.map(|path| (event, path)))
    }

    /// Bind `path` to `event`, or unset it with `None`.
    pub fn assign_sound(&mut self, event: &str, path: Option<PathBuf>) -> Result<(), ThemeError> {
        let index = event_index(event).ok_or_else(|| ThemeError::UnknownSound(event.to_string()))?;
        self.sounds[index] = path;
        self.modified = true;
        Ok(())
    }

    /// Files imported so far, oldest first.
    pub fn imported(&self) -> &[PathBuf] {
        &self.imported
    }

    /// Remember an imported file.
    pub fn import_sound(&mut self, path: impl Into<PathBuf>) {
        self.imported.push(path.into());
        self.modified = true;
    }

    /// File the theme was opened from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether there are changes not yet saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Flag the theme as changed.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// The bound path if there is one, else the name.
    pub fn file_info(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => self.name.clone(),
        }
    }

    /// Load a theme from a JSON file.
    ///
    /// Every non-null sound must name an existing file and is also recorded
    /// as imported. The returned theme is bound to `path` and unmodified.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::read_file(path, e))?;
        let data: Value = serde_json::from_str(&content).map_err(|source| ThemeError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let mut theme = Self::from_value(data)?;
        theme.path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), name = %theme.name, "opened theme");
        Ok(theme)
    }

    /// Build a theme from a parsed JSON document. The result has no bound
    /// path.
    pub fn from_value(data: Value) -> Result<Self, ThemeError> {
        let Value::Object(root) = data else {
            return Err(ThemeError::not_a_theme("the document must be an object"));
        };

        let mut theme = Self::new();
        match (root.get("name"), root.get("comment")) {
            (Some(Value::String(name)), Some(Value::String(comment))) => {
                theme.name.clone_from(name);
                theme.comment.clone_from(comment);
            }
            _ => return Err(ThemeError::not_a_theme("'name' and 'comment' must be strings")),
        }
        let Some(Value::Object(sounds)) = root.get("sounds") else {
            return Err(ThemeError::not_a_theme("'sounds' must be an object"));
        };

        for (event, value) in sounds {
            let bound = match value {
                Value::Null => None,
                Value::String(file) => {
                    let file = PathBuf::from(file);
                    if !file.exists() {
                        return Err(ThemeError::MissingSound {
                            event: event.clone(),
                            path: file,
                        });
                    }
                    theme.imported.push(file.clone());
                    Some(file)
                }
                _ => return Err(ThemeError::not_a_theme("sound entries must be strings or null")),
            };
            let index = event_index(event).ok_or_else(|| ThemeError::UnknownSound(event.clone()))?;
            theme.sounds[index] = bound;
        }

        Ok(theme)
    }

    /// Save the theme to a JSON file, binding it to `path`.
    ///
    /// On success the theme is no longer modified. On failure nothing about
    /// the theme changes.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), ThemeError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ThemeError::create_dir(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| ThemeError::write_file(path, e))?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        tracing::info!(path = %path.display(), name = %self.name, "saved theme");
        Ok(())
    }

    /// Render the theme as 4-space indented JSON listing every event.
    pub fn to_json(&self) -> Result<String, ThemeError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        ThemeFile { theme: self }
            .serialize(&mut serializer)
            .map_err(ThemeError::Serialize)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// On-disk shape of a theme, with sounds in catalog order.
struct ThemeFile<'a> {
    theme: &'a Theme,
}

struct SoundTable<'a> {
    theme: &'a Theme,
}

impl Serialize for ThemeFile<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("name", &self.theme.name)?;
        map.serialize_entry("comment", &self.theme.comment)?;
        map.serialize_entry("sounds", &SoundTable { theme: self.theme })?;
        map.end()
    }
}

impl Serialize for SoundTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SOUND_EVENTS.len()))?;
        for (event, path) in self.theme.sounds() {
            map.serialize_entry(event, &path)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn from_json(text: &str) -> Result<Theme, ThemeError> {
        Theme::from_value(serde_json::from_str(text).unwrap())
    }

    #[test]
    fn new_theme_defaults() {
        let theme = Theme::new();
        assert_eq!(theme.name(), "Sound theme");
        assert_eq!(theme.comment(), "This is a sound theme!");
        assert_eq!(theme.sounds().count(), 80);
        assert_eq!(theme.bound_sounds().count(), 0);
        assert!(!theme.is_modified());
        assert_eq!(theme.file_info(), "Sound theme");
    }

    #[test]
    fn mutations_mark_modified() {
        let mut theme = Theme::new();
        theme.set_comment("quiet");
        assert!(theme.is_modified());

        let mut theme = Theme::new();
        theme.assign_sound("bell", Some("/tmp/bell.wav".into())).unwrap();
        assert!(theme.is_modified());
        assert_eq!(theme.sound("bell").unwrap(), Some(Path::new("/tmp/bell.wav")));
    }

    #[test]
    fn unknown_event_is_rejected() {
        let mut theme = Theme::new();
        assert!(matches!(
            theme.assign_sound("door-slam", None),
            Err(ThemeError::UnknownSound(ref id)) if id == "door-slam"
        ));
        assert!(!theme.is_modified());
    }

    #[test]
    fn json_lists_every_event_in_order() {
        let mut theme = Theme::new();
        theme.assign_sound("bell", Some("/s/bell.ogg".into())).unwrap();
        let json = theme.to_json().unwrap();

        assert!(json.starts_with("{\n    \"name\": \"Sound theme\",\n"));
        assert!(json.contains("        \"alarm-clock-elapsed\": null,\n"));
        assert!(json.contains("        \"bell\": \"/s/bell.ogg\",\n"));
        let first = json.find("message-connectivity-problem").unwrap();
        let second = json.find("message-connectivity-error\"").unwrap();
        assert!(first < second);
        assert_eq!(json.matches(": null").count(), 79);
    }

    #[test]
    fn save_binds_path_and_clears_modified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("themes").join("t.json");
        let mut theme = Theme::new();
        theme.set_name("Chimes");

        theme.save(&path).unwrap();
        assert!(!theme.is_modified());
        assert_eq!(theme.path(), Some(path.as_path()));
        assert_eq!(theme.file_info(), path.display().to_string());
    }

    #[test]
    fn from_json_rejects_non_objects() {
        for text in ["[]", "42", "\"theme\"", "null"] {
            assert!(matches!(from_json(text), Err(ThemeError::NotATheme { .. })), "{text}");
        }
    }

    #[test]
    fn from_json_requires_string_name_and_comment() {
        let missing = r#"{"name": "x", "sounds": {}}"#;
        let wrong_type = r#"{"name": 3, "comment": "c", "sounds": {}}"#;
        assert!(matches!(from_json(missing), Err(ThemeError::NotATheme { .. })));
        assert!(matches!(from_json(wrong_type), Err(ThemeError::NotATheme { .. })));
    }

    #[test]
    fn from_json_requires_sounds_object() {
        let text = r#"{"name": "x", "comment": "c", "sounds": []}"#;
        assert!(matches!(from_json(text), Err(ThemeError::NotATheme { .. })));
    }

    #[test]
    fn from_json_rejects_unknown_ids() {
        let text = r#"{"name": "x", "comment": "c", "sounds": {"door-slam": null}}"#;
        assert!(matches!(
            from_json(text),
            Err(ThemeError::UnknownSound(ref id)) if id == "door-slam"
        ));
    }

    #[test]
    fn from_json_rejects_missing_files() {
        let text = r#"{"name": "x", "comment": "c", "sounds": {"bell": "/no/such/file.wav"}}"#;
        assert!(matches!(from_json(text), Err(ThemeError::MissingSound { .. })));
    }

    #[test]
    fn partial_sounds_leave_the_rest_unset() {
        let dir = TempDir::new().unwrap();
        let bell = dir.path().join("bell.wav");
        std::fs::write(&bell, b"RIFF").unwrap();
        let text = serde_json::json!({
            "name": "Partial",
            "comment": "",
            "sounds": { "bell": bell, "message": null },
        })
        .to_string();

        let theme = from_json(&text).unwrap();
        assert_eq!(theme.sound("bell").unwrap(), Some(bell.as_path()));
        assert_eq!(theme.imported(), [bell.clone()]);
        assert_eq!(theme.bound_sounds().count(), 1);
        assert!(!theme.is_modified());
        assert!(theme.path().is_none());
    }

    #[test]
    fn load_reports_bad_json_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Theme::load(&path).unwrap_err();
        assert!(matches!(err, ThemeError::Json { path: ref p, .. } if *p == path));
    }
}
