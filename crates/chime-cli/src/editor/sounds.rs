//! Sound binding menus.

use std::path::PathBuf;

use chime_theme::Theme;

use super::session::EditorSession;

const IMPORT_SOUND: &str = "Import sound... ";
const UNSET_SOUND: &str = "Unset sound... ";

enum SoundChoice {
    Import,
    Unset,
    Use(PathBuf),
}

/// Flat `tag, label` menu entries, one per event.
fn sound_menu_items(theme: &Theme) -> Vec<String> {
    theme
        .sounds()
        .flat_map(|(event, sound)| {
            let binding =
                sound.map_or_else(|| "None".to_string(), |path| path.display().to_string());
            [event.to_string(), format!("{event} ({binding})")]
        })
        .collect()
}

impl EditorSession {
    pub(super) fn edit_sounds(&mut self) -> anyhow::Result<()> {
        loop {
            let theme = self.current()?;
            let title = format!("Editing sounds in theme {}", theme.name());
            let items = sound_menu_items(theme);
            self.kd.set_title(title);

            let Some(event) = self.kd.menu("Choose a sound to define:", &items)? else {
                return Ok(());
            };
            self.edit_sound(&event)?;
        }
    }

    /// Rebind one event. Any cancel leaves the binding as it was.
    fn edit_sound(&mut self, event: &str) -> anyhow::Result<()> {
        let imported = self.current()?.imported().to_vec();

        let choice = if imported.is_empty() {
            SoundChoice::Import
        } else {
            let mut items: Vec<String> =
                imported.iter().map(|path| path.display().to_string()).collect();
            items.push(UNSET_SOUND.to_string());
            items.push(IMPORT_SOUND.to_string());

            let prompt = format!("Choose a sound to use for {event}.");
            let Some(answer) = self.kd.combobox(&prompt, &items)? else {
                return Ok(());
            };
            match answer.as_str() {
                IMPORT_SOUND => SoundChoice::Import,
                UNSET_SOUND => SoundChoice::Unset,
                _ => {
                    let known = items
                        .iter()
                        .position(|item| *item == answer)
                        .and_then(|i| imported.get(i));
                    SoundChoice::Use(known.cloned().unwrap_or_else(|| PathBuf::from(&answer)))
                }
            }
        };

        let sound = match choice {
            SoundChoice::Import => match self.import_sound()? {
                Some(path) => Some(path),
                None => return Ok(()),
            },
            SoundChoice::Unset => None,
            SoundChoice::Use(path) => Some(path),
        };

        self.current_mut()?.assign_sound(event, sound)?;
        Ok(())
    }

    /// Pick an audio file and remember it as imported.
    fn import_sound(&mut self) -> anyhow::Result<Option<PathBuf>> {
        let picked = self.kd.open_file(Some(&self.audio_filter), &self.browse_dir, false)?;
        let Some(paths) = picked else {
            return Ok(None);
        };
        let Some(path) = paths.into_iter().next() else {
            return Ok(None);
        };

        self.current_mut()?.import_sound(path.clone());
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            self.browse_dir = parent.to_path_buf();
            if self.follow_imports
                && let Err(e) = std::env::set_current_dir(parent)
            {
                tracing::warn!(
                    dir = %parent.display(),
                    error = %e,
                    "cannot change working directory"
                );
            }
        }
        tracing::debug!(path = %path.display(), "imported sound");
        Ok(Some(path))
    }
}
