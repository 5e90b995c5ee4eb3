//! Editor state and the main menu loop.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chime_dialog::{Diagnostic, Kdialog};
use chime_theme::Theme;

use crate::config::Config;

pub(super) const MENU_PROMPT: &str = "What would you like to do?";
pub(super) const JSON_FILTER: &str = "application/json";

#[rustfmt::skip]
const MAIN_MENU: [&str; 6] = [
    "0", "Create a new theme",
    "2", "Open theme JSON",
    "1", "Import an existing theme",
];

const SERIOUS_ERROR: &str = "A serious error has occurred. Details are shown below.";
const NOT_IMPLEMENTED: &str = "This functionality is not implemented.";

/// Consecutive failures that could not be shown before the editor gives up.
const MAX_UNREPORTED_FAILURES: u32 = 3;

/// What the main menu asks the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOutcome {
    /// Show the main menu again.
    Continue,
    /// Leave the editor.
    Quit,
    /// The user picked something that does not exist yet.
    NotSupported(&'static str),
}

/// Everything the interactive editor works on.
pub struct EditorSession {
    pub(super) kd: Kdialog,
    pub(super) theme: Option<Theme>,
    pub(super) app_title: String,
    pub(super) home: PathBuf,
    /// Where open pickers start; follows the last imported sound.
    pub(super) browse_dir: PathBuf,
    pub(super) sounds_dir: PathBuf,
    pub(super) audio_filter: String,
    /// Also move the process working directory on import.
    pub(super) follow_imports: bool,
}

impl EditorSession {
    /// Session with no theme loaded.
    pub fn new(kd: Kdialog, config: &Config) -> Self {
        let home = chime_theme::home_dir();
        let browse_dir = std::env::current_dir().unwrap_or_else(|_| home.clone());
        Self {
            kd,
            theme: None,
            app_title: config.dialog.title.clone(),
            home,
            browse_dir,
            sounds_dir: config.sounds_dir(),
            audio_filter: config.editor.audio_filter.clone(),
            follow_imports: true,
        }
    }

    /// Use `home` for save pickers and as the first browse directory, and
    /// install under `sounds_dir`.
    #[cfg(test)]
    pub fn with_dirs(mut self, home: impl Into<PathBuf>, sounds_dir: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self.browse_dir.clone_from(&self.home);
        self.sounds_dir = sounds_dir.into();
        self
    }

    /// Whether importing a sound also changes the process working directory.
    #[cfg(test)]
    pub fn follow_imports(mut self, follow: bool) -> Self {
        self.follow_imports = follow;
        self
    }

    /// Theme being edited, if any.
    #[cfg(test)]
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Directory the next open picker starts in.
    #[cfg(test)]
    pub fn browse_dir(&self) -> &Path {
        &self.browse_dir
    }

    /// Run the editor until the user leaves the main menu.
    ///
    /// With `initial`, that theme file is opened and edited first. Failures
    /// inside an action are shown in an error dialog and the main menu comes
    /// back. Gives up only when several failures in a row cannot be shown.
    pub fn run(&mut self, initial: Option<&Path>) -> anyhow::Result<()> {
        let mut pending =
            initial.map(|path| self.open_and_edit(path).map(|()| MainMenuOutcome::Continue));
        let mut unreported = 0;

        loop {
            let outcome = pending.take().unwrap_or_else(|| self.main_menu());
            let shown = match outcome {
                Ok(MainMenuOutcome::Quit) => return Ok(()),
                Ok(MainMenuOutcome::Continue) => Ok(()),
                Ok(MainMenuOutcome::NotSupported(feature)) => {
                    tracing::info!(feature, "feature not supported");
                    self.kd.error(NOT_IMPLEMENTED, None).map(drop)
                }
                Err(err) => {
                    tracing::error!(error = %format!("{err:#}"), "editor action failed");
                    let source: &(dyn std::error::Error + 'static) = err.as_ref();
                    self.kd
                        .show_diagnostic(SERIOUS_ERROR, &Diagnostic::from_error(source))
                        .map(drop)
                }
            };

            match shown {
                Ok(()) => unreported = 0,
                Err(e) => {
                    unreported += 1;
                    tracing::error!(error = %e, "could not show error dialog");
                    if unreported >= MAX_UNREPORTED_FAILURES {
                        return Err(
                            anyhow::Error::new(e).context("dialogs keep failing, giving up")
                        );
                    }
                }
            }
        }
    }

    fn main_menu(&mut self) -> anyhow::Result<MainMenuOutcome> {
        self.kd.set_title(self.app_title.clone());
        match self.kd.menu(MENU_PROMPT, &MAIN_MENU)?.as_deref() {
            Some("0") => {
                self.new_theme()?;
                Ok(MainMenuOutcome::Continue)
            }
            Some("1") => Ok(MainMenuOutcome::NotSupported("importing an existing theme")),
            Some("2") => {
                self.open_json()?;
                Ok(MainMenuOutcome::Continue)
            }
            _ => Ok(MainMenuOutcome::Quit),
        }
    }

    fn new_theme(&mut self) -> anyhow::Result<()> {
        let mut theme = Theme::new();
        theme.mark_modified();
        self.theme = Some(theme);
        self.prompt_name()?;
        self.edit_loop()
    }

    fn open_json(&mut self) -> anyhow::Result<()> {
        self.kd.set_title("Open theme JSON");
        let Some(paths) = self.kd.open_file(Some(JSON_FILTER), &self.browse_dir, false)? else {
            return Ok(());
        };
        match paths.into_iter().next() {
            Some(path) => self.open_and_edit(&path),
            None => Ok(()),
        }
    }

    fn open_and_edit(&mut self, path: &Path) -> anyhow::Result<()> {
        if self.open_path(path)? {
            self.edit_loop()
        } else {
            Ok(())
        }
    }

    /// Load `path` as the current theme. `Ok(false)` when the file was
    /// rejected; the reason has then been shown and no theme is loaded.
    fn open_path(&mut self, path: &Path) -> anyhow::Result<bool> {
        self.kd.set_title("Open theme JSON");
        self.theme = None;
        match Theme::load(path) {
            Ok(theme) => {
                self.theme = Some(theme);
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot open theme");
                let text = format!("An error occurred parsing {}:", path.display());
                self.kd.show_diagnostic(&text, &Diagnostic::from_error(&err))?;
                Ok(false)
            }
        }
    }

    pub(super) fn current(&self) -> anyhow::Result<&Theme> {
        self.theme.as_ref().context("no theme is open")
    }

    pub(super) fn current_mut(&mut self) -> anyhow::Result<&mut Theme> {
        self.theme.as_mut().context("no theme is open")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::testing::{calls_with, session};
    use chime_dialog::ScriptedRunner;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn cancel_on_main_menu_quits() {
        let home = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let mut editor = session(&runner, home.path());

        editor.run(None).unwrap();
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            [
                "--title", "Sound theme maker", "--menu", "What would you like to do?",
                "0", "Create a new theme", "2", "Open theme JSON", "1", "Import an existing theme",
            ]
        );
    }

    #[test]
    fn new_theme_save_then_leave() {
        let home = TempDir::new().unwrap();
        let target = home.path().join("chimes.json");
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .reply(0, "0\n")
            .reply(0, "Chimes\n")
            .reply(0, "3\n")
            .reply(0, &format!("{}\n", target.display()));
        let mut editor = session(&runner, home.path());

        editor.run(None).unwrap();

        let theme = editor.theme().unwrap();
        assert_eq!(theme.name(), "Chimes");
        assert!(!theme.is_modified());
        assert_eq!(theme.path(), Some(target.as_path()));
        assert!(target.is_file());

        let menus = calls_with(&runner, "--menu");
        assert_eq!(menus[1].args[1], "Sound theme maker (Chimes)");
        assert_eq!(menus[2].args[1], format!("Sound theme maker ({})", target.display()));
        assert!(calls_with(&runner, "--warningyesnocancel").is_empty());
    }

    #[test]
    fn unsaved_changes_prompt_cancel_then_no() {
        let home = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .reply(0, "0\n")
            .reply(0, "Draft\n")
            .reply(1, "")
            .reply(2, "")
            .reply(1, "")
            .reply(1, "");
        let mut editor = session(&runner, home.path());

        editor.run(None).unwrap();

        let prompts = calls_with(&runner, "--warningyesnocancel");
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].args.last().unwrap(), "Save changes to Draft?");
        assert!(editor.theme().unwrap().is_modified());
        assert_eq!(runner.remaining(), 0);
    }

    #[test]
    fn import_existing_is_reported_as_not_implemented() {
        let home = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "1\n").reply(0, "");
        let mut editor = session(&runner, home.path());

        editor.run(None).unwrap();

        let errors = calls_with(&runner, "--error");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].args.last().unwrap(), "This functionality is not implemented.");
    }

    #[test]
    fn bad_theme_file_is_shown_and_not_loaded() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("bad.json");
        let json = r#"{"name": "Bad", "comment": "", "sounds": {"kettle": null}}"#;
        std::fs::write(&path, json).unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "2\n").reply(0, &format!("{}\n", path.display())).reply(0, "");
        let mut editor = session(&runner, home.path());

        editor.run(None).unwrap();

        assert!(editor.theme().is_none());
        let shown = calls_with(&runner, "--detailederror");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].args[1], "Open theme JSON");
        assert_eq!(shown[0].args[3], format!("An error occurred parsing {}:", path.display()));
        assert!(shown[0].args[4].contains("kettle"), "details: {}", shown[0].args[4]);
    }

    #[test]
    fn initial_file_opens_straight_into_edit_loop() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("theme.json");
        let mut theme = Theme::new();
        theme.set_name("Ready");
        theme.save(&path).unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let mut editor = session(&runner, home.path());

        editor.run(Some(&path)).unwrap();

        let menus = calls_with(&runner, "--menu");
        assert_eq!(menus[0].args[1], format!("Sound theme maker ({})", path.display()));
        assert_eq!(menus[1].args[1], "Sound theme maker");
        assert_eq!(editor.theme().unwrap().name(), "Ready");
    }

    #[test]
    fn failed_action_shows_serious_error_and_returns_to_menu() {
        let home = TempDir::new().unwrap();
        let blocker = home.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .reply(0, "0\n")
            .reply(0, "Doomed\n")
            .reply(0, "3\n")
            .reply(0, &format!("{}\n", blocker.join("t.json").display()))
            .reply(0, "");
        let mut editor = session(&runner, home.path());

        editor.run(None).unwrap();

        let shown = calls_with(&runner, "--detailederror");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].args[3], "A serious error has occurred. Details are shown below.");
        assert!(
            shown[0].args[4].starts_with("cannot save theme to"),
            "details: {}",
            shown[0].args[4]
        );
        assert_eq!(calls_with(&runner, "--menu").len(), 3);
    }

    #[test]
    fn gives_up_when_dialogs_cannot_start() {
        let home = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        for _ in 0..6 {
            runner.reply_missing();
        }
        let mut editor = session(&runner, home.path());

        let err = editor.run(None).unwrap_err();
        assert!(format!("{err:#}").contains("dialogs keep failing"));
        assert_eq!(runner.remaining(), 0);
    }
}
