//! The edit loop and its theme-wide actions.

use std::path::Path;

use anyhow::Context;
use chime_dialog::{Outcome, ProgressBar, Style};
use chime_theme::{Theme, export_theme, install_theme};

use super::session::{EditorSession, JSON_FILTER, MENU_PROMPT};

#[rustfmt::skip]
const EDIT_MENU: [&str; 12] = [
    "0", "Set theme name",
    "1", "Set theme comment",
    "2", "Edit sounds",
    "3", "Save theme",
    "5", "Export theme",
    "4", "Install theme",
];

/// Result of a save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Saved {
    Written,
    Cancelled,
}

impl EditorSession {
    pub(super) fn edit_loop(&mut self) -> anyhow::Result<()> {
        loop {
            let file_info = self.current()?.file_info();
            self.kd.set_title(format!("{} ({file_info})", self.app_title));

            match self.kd.menu(MENU_PROMPT, &EDIT_MENU)?.as_deref() {
                Some("0") => self.prompt_name()?,
                Some("1") => self.prompt_comment()?,
                Some("2") => self.edit_sounds()?,
                Some("3") => {
                    self.save(false)?;
                }
                Some("4") => self.install()?,
                Some("5") => self.export()?,
                _ => {
                    if self.confirm_leave(&file_info)? {
                        return Ok(());
                    }
                }
            }
        }
    }

    pub(super) fn prompt_name(&mut self) -> anyhow::Result<()> {
        let current = self.current()?.name().to_string();
        if let Some(name) = self.kd.inputbox("Enter theme name...", Some(&current))? {
            self.current_mut()?.set_name(name);
        }
        Ok(())
    }

    fn prompt_comment(&mut self) -> anyhow::Result<()> {
        let current = self.current()?.comment().to_string();
        if let Some(comment) = self.kd.inputbox("Enter theme comment...", Some(&current))? {
            self.current_mut()?.set_comment(comment);
        }
        Ok(())
    }

    /// Ask about unsaved changes. `true` when the edit loop may end.
    fn confirm_leave(&mut self, file_info: &str) -> anyhow::Result<bool> {
        if !self.current()?.is_modified() {
            return Ok(true);
        }
        let question = format!("Save changes to {file_info}?");
        match self.kd.yesnocancel(&question, Style::Warning)? {
            Outcome::Yes => Ok(self.save(false)? == Saved::Written),
            Outcome::No => Ok(true),
            _ => Ok(false),
        }
    }

    /// Save to the bound file, asking for one when there is none or when
    /// `choose` is set.
    pub(super) fn save(&mut self, choose: bool) -> anyhow::Result<Saved> {
        self.kd.set_title("Save theme");
        let bound = self.current()?.path().map(Path::to_path_buf);
        let path = match bound {
            Some(path) if !choose => path,
            _ => match self.kd.save_file(Some(JSON_FILTER), &self.home)? {
                Some(path) => path,
                None => return Ok(Saved::Cancelled),
            },
        };

        self.current_mut()?
            .save(&path)
            .with_context(|| format!("cannot save theme to {}", path.display()))?;
        Ok(Saved::Written)
    }

    fn export(&mut self) -> anyhow::Result<()> {
        self.kd.set_title("Export theme");
        if self.current()?.is_modified() {
            self.kd.msgbox("To export your theme, you must save it first.")?;
            if self.save(false)? == Saved::Cancelled {
                return Ok(());
            }
            self.kd.set_title("Export theme");
        }

        let Some(dest) = self.kd.save_file(Some("inode/directory"), &self.home)? else {
            return Ok(());
        };

        let theme = self.current()?;
        let mut bar = self.open_progress(theme, "Exporting");
        export_theme(theme, &dest, |event, _| advance(&mut bar, event))
            .with_context(|| format!("cannot export theme to {}", dest.display()))?;
        drop(bar);

        self.kd.msgbox("Theme export success!")?;
        Ok(())
    }

    fn install(&mut self) -> anyhow::Result<()> {
        self.kd.set_title("Install theme");
        let theme = self.current()?;
        if theme.is_modified() {
            self.kd.msgbox("To install your theme, you must save it first.")?;
            return Ok(());
        }

        let mut bar = self.open_progress(theme, "Installing");
        install_theme(theme, &self.sounds_dir, |event, _| advance(&mut bar, event))
            .with_context(|| format!("cannot install theme under {}", self.sounds_dir.display()))?;
        drop(bar);

        self.kd.msgbox("Theme installation success!")?;
        Ok(())
    }

    /// Progress bar over the sounds of `theme`, if one can be shown.
    fn open_progress(&self, theme: &Theme, verb: &str) -> Option<ProgressBar> {
        let count = theme.bound_sounds().count() as u32;
        if count == 0 {
            return None;
        }
        let label = format!("{verb} {}...", theme.name());
        match self.kd.progressbar(&label, count, true, None) {
            Ok(bar) => Some(bar),
            Err(e) => {
                tracing::warn!(error = %e, "continuing without a progress bar");
                None
            }
        }
    }
}

fn advance(bar: &mut Option<ProgressBar>, event: &str) {
    if let Some(progress) = bar.as_mut()
        && let Err(e) = progress.advance()
    {
        tracing::debug!(event, error = %e, "progress bar stopped");
        *bar = None;
    }
}
