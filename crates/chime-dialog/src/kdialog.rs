//! Typed entry points for every dialog kind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::DialogError;
use crate::diagnostic::Diagnostic;
use crate::invoker::{CommandRunner, DisplayConfig, Invoker, SystemRunner};
use crate::progress::{BusTransport, DEFAULT_BUS_CANDIDATES, ProgressBar};
use crate::request::{
    CheckItem, DialogReply, DialogRequest, Labels, MenuItem, Outcome, Style, TextSource,
};

/// Result of a dialog call.
pub(crate) type Result<T> = std::result::Result<T, DialogError>;

/// Facade over the `kdialog` program.
///
/// Each method builds a [`DialogRequest`], runs it and unwraps the reply to
/// the type that kind produces. [`Kdialog::show`] takes a request directly
/// for button label overrides and other options the shortcuts leave out.
#[derive(Debug, Clone)]
pub struct Kdialog {
    invoker: Invoker,
    bus_candidates: Vec<String>,
}

impl Default for Kdialog {
    fn default() -> Self {
        Self::new("kdialog")
    }
}

impl Kdialog {
    /// Facade running `program` as a real child process.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(Arc::new(SystemRunner), program)
    }

    /// Facade running `program` through `runner`.
    pub fn with_runner(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            invoker: Invoker::new(runner, program),
            bus_candidates: DEFAULT_BUS_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the D-Bus tools probed for progress bars.
    pub fn with_bus_candidates(
        mut self,
        candidates: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.bus_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Window title and popup icon in effect.
    pub fn display(&self) -> &DisplayConfig {
        self.invoker.display()
    }

    /// Set the window title used by every following dialog.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.invoker.display_mut().title = Some(title.into());
    }

    /// Let the dialog program pick its own window title.
    pub fn clear_title(&mut self) {
        self.invoker.display_mut().title = None;
    }

    /// Set the icon used by passive popups.
    pub fn set_icon(&mut self, icon: Option<String>) {
        self.invoker.display_mut().icon = icon;
    }

    /// Version string reported by `kdialog -v`.
    pub fn version(&self) -> Result<String> {
        let program = self.invoker.program();
        let raw = self
            .invoker
            .runner()
            .run(program, &["-v".to_string()], None)
            .map_err(|e| DialogError::spawn(program, e))?;
        if raw.status != 0 {
            return Err(DialogError::unexpected_status("version", raw.status));
        }
        Ok(String::from_utf8_lossy(&raw.stdout).trim_end().to_string())
    }

    /// Run any request and return its raw reply.
    pub fn show(&self, request: &DialogRequest) -> Result<DialogReply> {
        let command = request.to_command()?;
        let invocation = self.invoker.invoke(&command.args, command.stdin.as_deref())?;
        request.interpret(invocation.status, invocation.output)
    }

    /// Yes/No question.
    pub fn yesno(&self, text: &str, style: Style) -> Result<Outcome> {
        let request = DialogRequest::YesNo {
            text: text.to_string(),
            style,
            labels: Labels::default(),
        };
        self.outcome(&request)
    }

    /// Yes/No/Cancel question.
    pub fn yesnocancel(&self, text: &str, style: Style) -> Result<Outcome> {
        let request = DialogRequest::YesNoCancel {
            text: text.to_string(),
            style,
            labels: Labels::default(),
        };
        self.outcome(&request)
    }

    /// Warning with Continue/Cancel.
    pub fn warning_continue_cancel(&self, text: &str) -> Result<Outcome> {
        let request = DialogRequest::WarningContinueCancel {
            text: text.to_string(),
            labels: Labels::default(),
        };
        self.outcome(&request)
    }

    /// Sorry message; `None` when closed without pressing OK.
    pub fn sorry(&self, text: &str, details: Option<&str>) -> Result<Option<Outcome>> {
        let request = DialogRequest::Sorry {
            text: text.to_string(),
            details: details.map(str::to_string),
            labels: Labels::default(),
        };
        self.acknowledgement(&request)
    }

    /// Alias of [`sorry`](Self::sorry).
    pub fn warning(&self, text: &str, details: Option<&str>) -> Result<Option<Outcome>> {
        self.sorry(text, details)
    }

    /// Error message; `None` when closed without pressing OK.
    pub fn error(&self, text: &str, details: Option<&str>) -> Result<Option<Outcome>> {
        let request = DialogRequest::Error {
            text: text.to_string(),
            details: details.map(str::to_string),
            labels: Labels::default(),
        };
        self.acknowledgement(&request)
    }

    /// Alias of [`error`](Self::error).
    pub fn alert(&self, text: &str, details: Option<&str>) -> Result<Option<Outcome>> {
        self.error(text, details)
    }

    /// Detailed error dialog carrying a rendered [`Diagnostic`].
    pub fn show_diagnostic(&self, text: &str, diagnostic: &Diagnostic) -> Result<Option<Outcome>> {
        self.error(text, Some(&diagnostic.render()))
    }

    /// Detailed sorry dialog carrying a rendered [`Diagnostic`].
    pub fn sorry_diagnostic(&self, text: &str, diagnostic: &Diagnostic) -> Result<Option<Outcome>> {
        self.sorry(text, Some(&diagnostic.render()))
    }

    /// Plain message box.
    pub fn msgbox(&self, text: &str) -> Result<()> {
        let request = DialogRequest::MsgBox {
            text: text.to_string(),
            labels: Labels::default(),
        };
        self.show(&request).map(drop)
    }

    /// Single line text entry.
    pub fn inputbox(&self, text: &str, init: Option<&str>) -> Result<Option<String>> {
        let request = DialogRequest::InputBox {
            text: text.to_string(),
            init: init.map(str::to_string),
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Hidden text entry.
    pub fn password(&self, text: &str) -> Result<Option<String>> {
        let request = DialogRequest::Password {
            text: text.to_string(),
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Hidden text entry asking for the value twice.
    pub fn newpassword(&self, text: &str) -> Result<Option<String>> {
        let request = DialogRequest::NewPassword {
            text: text.to_string(),
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Multi-line text entry.
    pub fn textinputbox(&self, text: &str, init: Option<&str>) -> Result<Option<String>> {
        let request = DialogRequest::TextInputBox {
            text: text.to_string(),
            init: init.map(str::to_string),
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Show a file or inline text read-only.
    pub fn textbox(&self, source: TextSource) -> Result<()> {
        let request = DialogRequest::TextBox {
            source,
            labels: Labels::default(),
        };
        self.show(&request).map(drop)
    }

    /// Show an image.
    pub fn imgbox(&self, path: &Path) -> Result<()> {
        let request = DialogRequest::ImgBox {
            path: path.to_path_buf(),
            labels: Labels::default(),
        };
        self.show(&request).map(drop)
    }

    /// Show an image with a text entry.
    pub fn imginputbox(&self, path: &Path, text: &str) -> Result<Option<String>> {
        let request = DialogRequest::ImgInputBox {
            path: path.to_path_buf(),
            text: text.to_string(),
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Drop-down chooser returning the chosen entry.
    pub fn combobox<S: AsRef<str>>(&self, text: &str, items: &[S]) -> Result<Option<String>> {
        let request = DialogRequest::ComboBox {
            text: text.to_string(),
            items: items.iter().map(|s| s.as_ref().to_string()).collect(),
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Menu from flat `tag, label` pairs, returning the chosen tag.
    pub fn menu<S: AsRef<str>>(&self, text: &str, items: &[S]) -> Result<Option<String>> {
        self.menu_items(text, MenuItem::from_flat(items)?)
    }

    /// Menu from typed items, returning the chosen tag.
    pub fn menu_items(&self, text: &str, items: Vec<MenuItem>) -> Result<Option<String>> {
        let request = DialogRequest::Menu {
            text: text.to_string(),
            items,
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Checklist from flat `tag, label, on|off` triples, returning the
    /// checked tags.
    pub fn checklist<S: AsRef<str>>(&self, text: &str, items: &[S]) -> Result<Option<Vec<String>>> {
        let request = DialogRequest::CheckList {
            text: text.to_string(),
            items: CheckItem::from_flat("checklist", items)?,
            labels: Labels::default(),
        };
        match self.show(&request)? {
            DialogReply::List(tags) => Ok(tags),
            other => Err(mismatch(&request, &other)),
        }
    }

    /// Radio list from flat `tag, label, on|off` triples, returning the
    /// chosen tag.
    pub fn radiolist<S: AsRef<str>>(&self, text: &str, items: &[S]) -> Result<Option<String>> {
        let request = DialogRequest::RadioList {
            text: text.to_string(),
            items: CheckItem::from_flat("radiolist", items)?,
            labels: Labels::default(),
        };
        self.text(&request)
    }

    /// Integer slider; the step defaults to a tenth of `max`.
    pub fn slider(&self, text: &str, min: i64, max: i64, step: Option<i64>) -> Result<Option<i64>> {
        let request = DialogRequest::Slider {
            text: text.to_string(),
            min,
            max,
            step,
            labels: Labels::default(),
        };
        match self.show(&request)? {
            DialogReply::Number(value) => Ok(value),
            other => Err(mismatch(&request, &other)),
        }
    }

    /// File open picker.
    pub fn open_file(
        &self,
        filter: Option<&str>,
        start_dir: &Path,
        multiple: bool,
    ) -> Result<Option<Vec<PathBuf>>> {
        let request = DialogRequest::OpenFile {
            filter: filter.map(str::to_string),
            start_dir: start_dir.to_path_buf(),
            multiple,
        };
        match self.show(&request)? {
            DialogReply::List(paths) => {
                Ok(paths.map(|paths| paths.into_iter().map(PathBuf::from).collect()))
            }
            other => Err(mismatch(&request, &other)),
        }
    }

    /// File save picker.
    pub fn save_file(&self, filter: Option<&str>, start_dir: &Path) -> Result<Option<PathBuf>> {
        let request = DialogRequest::SaveFile {
            filter: filter.map(str::to_string),
            start_dir: start_dir.to_path_buf(),
        };
        Ok(self.text(&request)?.map(PathBuf::from))
    }

    /// Directory picker.
    pub fn existing_directory(&self, start_dir: &Path) -> Result<Option<PathBuf>> {
        let request = DialogRequest::ExistingDirectory {
            start_dir: start_dir.to_path_buf(),
        };
        Ok(self.text(&request)?.map(PathBuf::from))
    }

    /// Notification using the configured icon.
    pub fn passive_popup(&self, text: &str, timeout: Option<u32>) -> Result<()> {
        let request = DialogRequest::PassivePopup {
            text: text.to_string(),
            timeout,
            icon: self.display().icon.clone(),
        };
        self.show(&request).map(drop)
    }

    /// Let the user choose the popup icon. Keeps the current icon when
    /// cancelled.
    pub fn choose_icon(&mut self) -> Result<Option<String>> {
        let icon = self.text(&DialogRequest::GetIcon)?;
        if icon.is_some() {
            self.set_icon(icon.clone());
        }
        Ok(icon)
    }

    /// Open a progress bar with `count` steps.
    ///
    /// Fails when the dialog cannot be opened or no D-Bus tool can reach it.
    /// Without a working D-Bus tool no window is opened at all.
    pub fn progressbar(
        &self,
        label: &str,
        count: u32,
        auto_close: bool,
        cancel_label: Option<&str>,
    ) -> Result<ProgressBar> {
        let request = DialogRequest::ProgressBar {
            label: label.to_string(),
            count,
            labels: Labels {
                cancel: cancel_label.map(str::to_string),
                ..Labels::default()
            },
        };
        let runner = self.invoker.runner().clone();
        let fallback = BusTransport::locate(runner.clone(), &self.bus_candidates)?;

        let session = match self.show(&request)? {
            DialogReply::Session(session) => session,
            other => return Err(mismatch(&request, &other)),
        };
        match BusTransport::discover(runner, &self.bus_candidates, &session) {
            Ok(bus) => Ok(ProgressBar::new(bus, session, count, auto_close)),
            Err(e) => {
                if !fallback.call(&session, &["close"]) {
                    tracing::warn!(service = %session.service, "progress bar left open");
                }
                Err(e)
            }
        }
    }

    fn outcome(&self, request: &DialogRequest) -> Result<Outcome> {
        match self.show(request)? {
            DialogReply::Outcome(outcome) => Ok(outcome),
            other => Err(mismatch(request, &other)),
        }
    }

    fn acknowledgement(&self, request: &DialogRequest) -> Result<Option<Outcome>> {
        match self.show(request)? {
            DialogReply::Outcome(outcome) => Ok(Some(outcome)),
            DialogReply::Text(None) => Ok(None),
            other => Err(mismatch(request, &other)),
        }
    }

    fn text(&self, request: &DialogRequest) -> Result<Option<String>> {
        match self.show(request)? {
            DialogReply::Text(text) => Ok(text),
            other => Err(mismatch(request, &other)),
        }
    }
}

fn mismatch(request: &DialogRequest, reply: &DialogReply) -> DialogError {
    DialogError::BadOutput {
        kind: request.kind(),
        output: format!("{reply:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRunner;

    fn kdialog(runner: &Arc<ScriptedRunner>) -> Kdialog {
        let mut kd = Kdialog::with_runner(runner.clone(), "kdialog");
        kd.set_title("Test");
        kd
    }

    #[test]
    fn version_skips_title() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "kdialog 24.02.1\n");
        let kd = kdialog(&runner);

        assert_eq!(kd.version().unwrap(), "kdialog 24.02.1");
        assert_eq!(runner.calls()[0].args, ["-v"]);
    }

    #[test]
    fn menu_returns_tag() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "2\n");
        let kd = kdialog(&runner);

        let choice = kd.menu("Pick", &["0", "New", "2", "Open"]).unwrap();
        assert_eq!(choice.as_deref(), Some("2"));
        assert_eq!(
            runner.calls()[0].args,
            ["--title", "Test", "--menu", "Pick", "0", "New", "2", "Open"]
        );
    }

    #[test]
    fn arity_errors_never_spawn() {
        let runner = Arc::new(ScriptedRunner::new());
        let kd = kdialog(&runner);

        assert!(kd.checklist("Pick", &["a", "A", "on", "b"]).is_err());
        assert!(kd.radiolist("Pick", &["a", "A"]).is_err());
        assert!(kd.menu("Pick", &["a"]).is_err());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn error_dialog_unexpected_status_is_a_failure() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "").reply(2, "").reply(1, "");
        let kd = kdialog(&runner);

        assert_eq!(kd.error("oops", None).unwrap(), Some(Outcome::Ok));
        assert_eq!(kd.error("oops", None).unwrap(), None);
        assert!(matches!(
            kd.error("oops", None),
            Err(DialogError::UnexpectedStatus { kind: "error", status: 1 })
        ));
    }

    #[test]
    fn diagnostic_goes_to_details() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "");
        let kd = kdialog(&runner);

        let diag = Diagnostic::new("bad file").with_cause("missing key");
        kd.show_diagnostic("Could not open", &diag).unwrap();

        let args = &runner.calls()[0].args;
        assert_eq!(args[2], "--detailederror");
        assert_eq!(args[3], "Could not open");
        assert_eq!(args[4], diag.render());
    }

    #[test]
    fn passive_popup_uses_chosen_icon() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "media-playback-start\n").reply(0, "");
        let mut kd = kdialog(&runner);

        assert_eq!(kd.choose_icon().unwrap().as_deref(), Some("media-playback-start"));
        kd.passive_popup("Saved", Some(5)).unwrap();

        let popup = &runner.calls()[1].args;
        assert_eq!(
            popup[2..],
            ["--icon", "media-playback-start", "--passivepopup", "Saved", "5"]
        );
    }

    #[test]
    fn cancelled_icon_choice_keeps_icon() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(1, "");
        let mut kd = kdialog(&runner);
        kd.set_icon(Some("bell".into()));

        assert_eq!(kd.choose_icon().unwrap(), None);
        assert_eq!(kd.display().icon.as_deref(), Some("bell"));
    }

    #[test]
    fn progressbar_opens_and_discovers_bus() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "org.kde.kdialog-99 /ProgressDialog\n");
        runner.answer_missing("qdbus6").answer("qdbus", 0);
        let kd = kdialog(&runner);

        let mut bar = kd.progressbar("Working", 3, false, Some("Stop")).unwrap();
        assert_eq!(bar.itercount(), 3);
        assert_eq!(
            runner.calls_to("kdialog")[0].args,
            ["--title", "Test", "--cancel-label", "Stop", "--progressbar", "Working", "3"]
        );
        assert!(runner.calls_to("qdbus")[0].args.is_empty());

        bar.advance().unwrap();
        assert_eq!(runner.calls_to("qdbus").last().unwrap().args.last().unwrap(), "1");
    }

    #[test]
    fn progressbar_without_bus_opens_no_window() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "org.kde.kdialog-99 /ProgressDialog");
        let kd = kdialog(&runner);
        for tool in DEFAULT_BUS_CANDIDATES {
            runner.answer_missing(tool);
        }

        assert!(matches!(
            kd.progressbar("Working", 3, false, None),
            Err(DialogError::BusUnavailable { .. })
        ));
        assert!(runner.calls_to("kdialog").is_empty());
        assert_eq!(runner.remaining(), 1);
    }

    #[test]
    fn progressbar_closed_when_session_is_unreachable() {
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .reply(0, "org.kde.kdialog-99\n")
            .reply(0, "org.kde.kdialog-99 /ProgressDialog\n")
            .reply(1, "")
            .reply(0, "");
        let kd = kdialog(&runner).with_bus_candidates(["qdbus"]);

        assert!(matches!(
            kd.progressbar("Working", 3, false, None),
            Err(DialogError::BusUnavailable { .. })
        ));
        let bus = runner.calls_to("qdbus");
        assert_eq!(bus.len(), 3);
        assert!(bus[0].args.is_empty());
        assert_eq!(bus[2].args, ["org.kde.kdialog-99", "/ProgressDialog", "close"]);
    }

    #[test]
    fn slider_uses_default_step_and_parses_value() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "42\n").reply(0, "loud\n");
        let kd = kdialog(&runner);

        assert_eq!(kd.slider("Volume", 0, 100, None).unwrap(), Some(42));
        assert_eq!(
            runner.calls()[0].args,
            ["--title", "Test", "--slider", "Volume", "0", "100", "10"]
        );
        assert!(matches!(
            kd.slider("Volume", 0, 100, Some(5)),
            Err(DialogError::BadOutput { .. })
        ));
    }

    #[test]
    fn warning_and_alert_follow_sorry_and_error() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "").reply(2, "").reply(7, "");
        let kd = kdialog(&runner);

        assert_eq!(kd.warning("Careful", None).unwrap(), Some(Outcome::Ok));
        assert_eq!(kd.alert("Broken", Some("trace")).unwrap(), None);
        assert!(matches!(
            kd.alert("Broken", None),
            Err(DialogError::UnexpectedStatus { .. })
        ));

        let calls = runner.calls();
        assert_eq!(calls[0].args[2..], ["--sorry", "Careful"]);
        assert_eq!(calls[1].args[2..], ["--detailederror", "Broken", "trace"]);
        assert_eq!(calls[2].args[2..], ["--error", "Broken"]);
    }

    #[test]
    fn sorry_diagnostic_renders_causes() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "");
        let kd = kdialog(&runner);
        let diagnostic = Diagnostic::new("top").with_cause("inner");

        assert_eq!(kd.sorry_diagnostic("Oops", &diagnostic).unwrap(), Some(Outcome::Ok));
        assert_eq!(
            runner.calls()[0].args[2..],
            ["--detailedsorry", "Oops", "top\n\nCaused by:\n    0: inner"]
        );
    }

    #[test]
    fn imginputbox_checks_image_then_returns_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let image = dir.path().join("cover.png");
        std::fs::write(&image, b"\x89PNG").unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "a caption\n");
        let kd = kdialog(&runner);

        assert!(matches!(
            kd.imginputbox(&dir.path().join("absent.png"), "Describe"),
            Err(DialogError::NotFound { .. })
        ));
        assert!(runner.calls().is_empty());

        let caption = kd.imginputbox(&image, "Describe").unwrap();
        assert_eq!(caption.as_deref(), Some("a caption"));
        assert_eq!(
            runner.calls()[0].args[2..],
            [
                "--imginputbox".to_string(),
                image.display().to_string(),
                "Describe".to_string(),
            ]
        );
    }

    #[test]
    fn open_file_splits_lines_into_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        runner.reply(0, "/a/one.ogg\n/b/two.wav\n");
        let kd = kdialog(&runner);

        let paths = kd.open_file(Some("audio/ogg"), dir.path(), true).unwrap().unwrap();
        assert_eq!(paths, [PathBuf::from("/a/one.ogg"), PathBuf::from("/b/two.wav")]);
    }
}
