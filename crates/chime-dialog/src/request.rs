//! Dialog requests and their exit-status tables.
//!
//! A [`DialogRequest`] knows two things about its kind: how to lay out the
//! kdialog command line ([`DialogRequest::to_command`]) and how to read the
//! exit status back ([`DialogRequest::interpret`]). Both are pure, so the
//! whole protocol can be checked without launching anything.
//!
//! # Command line layout
//!
//! ```text
//! [--separate-output] [button labels...] --<kind> <text> [extras...]
//! ```
//!
//! # Status tables
//!
//! | kind                                   | 0              | 1       | 2      | other          |
//! |----------------------------------------|----------------|---------|--------|----------------|
//! | yesno, warningyesno                    | Yes            | No      | No     | No             |
//! | yesnocancel, warningyesnocancel        | Yes            | No      | Cancel | Cancel         |
//! | warningcontinuecancel                  | Continue       | Cancel  | Cancel | Cancel         |
//! | sorry, error (plain or detailed)       | Ok             | failure | absent | failure        |
//! | msgbox, textbox, imgbox, passivepopup  | Done           | Done    | Done   | Done           |
//! | single-answer prompts                  | text           | absent  | absent | absent         |
//! | checklist, getopenfilename             | lines          | absent  | absent | absent         |
//! | slider                                 | integer        | absent  | absent | absent         |
//! | progressbar                            | session        | failure | failure| failure        |

use std::path::{Path, PathBuf};

use crate::DialogError;
use crate::progress::SessionRef;

/// Discrete answer to a button dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Acknowledged.
    Ok,
    /// Dismissed or cancelled.
    Cancel,
    /// Affirmative answer.
    Yes,
    /// Negative answer.
    No,
    /// Proceed past a warning.
    Continue,
}

/// Visual style of a question dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Regular question icon.
    #[default]
    Question,
    /// Warning icon.
    Warning,
}

/// Button label overrides.
///
/// Labels are emitted in the order yes, no, continue, ok, cancel; kinds
/// without a given button ignore its label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    /// Text of the "Yes" button.
    pub yes: Option<String>,
    /// Text of the "No" button.
    pub no: Option<String>,
    /// Text of the "Continue" button.
    pub continue_label: Option<String>,
    /// Text of the "OK" button.
    pub ok: Option<String>,
    /// Text of the "Cancel" button.
    pub cancel: Option<String>,
}

impl Labels {
    /// Labels with only the OK button renamed.
    pub fn ok(label: impl Into<String>) -> Self {
        Self {
            ok: Some(label.into()),
            ..Self::default()
        }
    }

    fn push_args(&self, args: &mut Vec<String>) {
        let pairs = [
            ("--yes-label", &self.yes),
            ("--no-label", &self.no),
            ("--continue-label", &self.continue_label),
            ("--ok-label", &self.ok),
            ("--cancel-label", &self.cancel),
        ];
        for (flag, value) in pairs {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }
    }
}

/// One entry of a menu: the tag is printed when the label is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Value printed on selection.
    pub tag: String,
    /// Text shown to the user.
    pub label: String,
}

impl MenuItem {
    /// Create a menu item.
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
        }
    }

    /// Split a flat `tag, label, tag, label, ...` sequence into items.
    pub fn from_flat<S: AsRef<str>>(values: &[S]) -> Result<Vec<Self>, DialogError> {
        check_arity("menu", 2, values.len())?;
        Ok(values
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0].as_ref(), pair[1].as_ref()))
            .collect())
    }
}

/// One entry of a checklist or radio list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    /// Value printed when the entry is selected.
    pub tag: String,
    /// Text shown to the user.
    pub label: String,
    /// Initial state.
    pub on: bool,
}

impl CheckItem {
    /// Create a checklist item.
    pub fn new(tag: impl Into<String>, label: impl Into<String>, on: bool) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            on,
        }
    }

    /// Split a flat `tag, label, on|off, ...` sequence into items.
    ///
    /// `kind` names the dialog in the arity error. The state value is on when
    /// it reads `on` in any case, off otherwise.
    pub fn from_flat<S: AsRef<str>>(
        kind: &'static str,
        values: &[S],
    ) -> Result<Vec<Self>, DialogError> {
        check_arity(kind, 3, values.len())?;
        Ok(values
            .chunks_exact(3)
            .map(|triple| {
                Self::new(
                    triple[0].as_ref(),
                    triple[1].as_ref(),
                    triple[2].as_ref().eq_ignore_ascii_case("on"),
                )
            })
            .collect())
    }
}

fn check_arity(kind: &'static str, arity: usize, len: usize) -> Result<(), DialogError> {
    if len % arity != 0 {
        return Err(DialogError::ItemArity { kind, arity, len });
    }
    Ok(())
}

/// Content of a text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Show the contents of a file.
    File(PathBuf),
    /// Show inline text, piped through standard input.
    Text(String),
}

/// Every dialog kind the facade can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogRequest {
    /// Yes/No question.
    YesNo {
        /// Question text.
        text: String,
        /// Question or warning style.
        style: Style,
        /// Button overrides.
        labels: Labels,
    },
    /// Yes/No/Cancel question.
    YesNoCancel {
        /// Question text.
        text: String,
        /// Question or warning style.
        style: Style,
        /// Button overrides.
        labels: Labels,
    },
    /// Warning with Continue/Cancel.
    WarningContinueCancel {
        /// Warning text.
        text: String,
        /// Button overrides.
        labels: Labels,
    },
    /// Sorry message, optionally with expandable details.
    Sorry {
        /// Message text.
        text: String,
        /// Detail text; switches to the detailed variant.
        details: Option<String>,
        /// Button overrides.
        labels: Labels,
    },
    /// Error message, optionally with expandable details.
    Error {
        /// Message text.
        text: String,
        /// Detail text; switches to the detailed variant.
        details: Option<String>,
        /// Button overrides.
        labels: Labels,
    },
    /// Plain message box.
    MsgBox {
        /// Message text.
        text: String,
        /// Button overrides.
        labels: Labels,
    },
    /// Single line text entry.
    InputBox {
        /// Prompt.
        text: String,
        /// Initial value.
        init: Option<String>,
        /// Button overrides.
        labels: Labels,
    },
    /// Hidden text entry.
    Password {
        /// Prompt.
        text: String,
        /// Button overrides.
        labels: Labels,
    },
    /// Hidden text entry with confirmation.
    NewPassword {
        /// Prompt.
        text: String,
        /// Button overrides.
        labels: Labels,
    },
    /// Multi-line text entry.
    TextInputBox {
        /// Prompt.
        text: String,
        /// Initial value.
        init: Option<String>,
        /// Button overrides.
        labels: Labels,
    },
    /// Read-only text viewer.
    TextBox {
        /// File or inline text to show.
        source: TextSource,
        /// Button overrides.
        labels: Labels,
    },
    /// Image viewer.
    ImgBox {
        /// Image file.
        path: PathBuf,
        /// Button overrides.
        labels: Labels,
    },
    /// Image with a text entry.
    ImgInputBox {
        /// Image file.
        path: PathBuf,
        /// Prompt.
        text: String,
        /// Button overrides.
        labels: Labels,
    },
    /// Drop-down chooser; prints the chosen item.
    ComboBox {
        /// Prompt.
        text: String,
        /// Entries.
        items: Vec<String>,
        /// Button overrides.
        labels: Labels,
    },
    /// Menu; prints the chosen tag.
    Menu {
        /// Prompt.
        text: String,
        /// Entries.
        items: Vec<MenuItem>,
        /// Button overrides.
        labels: Labels,
    },
    /// Multi-select list; prints one tag per line.
    CheckList {
        /// Prompt.
        text: String,
        /// Entries.
        items: Vec<CheckItem>,
        /// Button overrides.
        labels: Labels,
    },
    /// Single-select list; prints the chosen tag.
    RadioList {
        /// Prompt.
        text: String,
        /// Entries.
        items: Vec<CheckItem>,
        /// Button overrides.
        labels: Labels,
    },
    /// Integer slider.
    Slider {
        /// Prompt.
        text: String,
        /// Lowest value.
        min: i64,
        /// Highest value.
        max: i64,
        /// Step; defaults to a tenth of `max`.
        step: Option<i64>,
        /// Button overrides.
        labels: Labels,
    },
    /// File open picker.
    OpenFile {
        /// MIME types or glob filter.
        filter: Option<String>,
        /// Directory the picker starts in.
        start_dir: PathBuf,
        /// Allow choosing several files.
        multiple: bool,
    },
    /// File save picker.
    SaveFile {
        /// MIME types or glob filter.
        filter: Option<String>,
        /// Directory the picker starts in.
        start_dir: PathBuf,
    },
    /// Directory picker.
    ExistingDirectory {
        /// Directory the picker starts in.
        start_dir: PathBuf,
    },
    /// Notification that needs no answer.
    PassivePopup {
        /// Notification text.
        text: String,
        /// Seconds before it disappears.
        timeout: Option<u32>,
        /// Icon name or path.
        icon: Option<String>,
    },
    /// Icon chooser; prints the icon name.
    GetIcon,
    /// Opens a progress bar driven over D-Bus.
    ProgressBar {
        /// Label above the bar.
        label: String,
        /// Number of steps.
        count: u32,
        /// Button overrides.
        labels: Labels,
    },
}

/// Arguments and standard input for one dialog process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogCommand {
    /// Arguments after the title.
    pub args: Vec<String>,
    /// Text piped to the dialog.
    pub stdin: Option<String>,
}

/// Typed result of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogReply {
    /// The kind carries no answer.
    Done,
    /// A button answer.
    Outcome(Outcome),
    /// `None` when the dialog was dismissed.
    Text(Option<String>),
    /// One entry per output line; `None` when dismissed.
    List(Option<Vec<String>>),
    /// Slider value; `None` when dismissed.
    Number(Option<i64>),
    /// A live progress bar.
    Session(SessionRef),
}

/// Step used by a slider when none is given: a tenth of `max`, rounded down.
pub fn default_slider_step(max: i64) -> i64 {
    max.div_euclid(10)
}

impl DialogRequest {
    /// Short kind name used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::YesNo { style: Style::Question, .. } => "yesno",
            Self::YesNo { style: Style::Warning, .. } => "warningyesno",
            Self::YesNoCancel { style: Style::Question, .. } => "yesnocancel",
            Self::YesNoCancel { style: Style::Warning, .. } => "warningyesnocancel",
            Self::WarningContinueCancel { .. } => "warningcontinuecancel",
            Self::Sorry { details: None, .. } => "sorry",
            Self::Sorry { details: Some(_), .. } => "detailedsorry",
            Self::Error { details: None, .. } => "error",
            Self::Error { details: Some(_), .. } => "detailederror",
            Self::MsgBox { .. } => "msgbox",
            Self::InputBox { .. } => "inputbox",
            Self::Password { .. } => "password",
            Self::NewPassword { .. } => "newpassword",
            Self::TextInputBox { .. } => "textinputbox",
            Self::TextBox { .. } => "textbox",
            Self::ImgBox { .. } => "imgbox",
            Self::ImgInputBox { .. } => "imginputbox",
            Self::ComboBox { .. } => "combobox",
            Self::Menu { .. } => "menu",
            Self::CheckList { .. } => "checklist",
            Self::RadioList { .. } => "radiolist",
            Self::Slider { .. } => "slider",
            Self::OpenFile { .. } => "getopenfilename",
            Self::SaveFile { .. } => "getsavefilename",
            Self::ExistingDirectory { .. } => "getexistingdirectory",
            Self::PassivePopup { .. } => "passivepopup",
            Self::GetIcon => "geticon",
            Self::ProgressBar { .. } => "progressbar",
        }
    }

    /// Build the command line, checking local paths first.
    pub fn to_command(&self) -> Result<DialogCommand, DialogError> {
        let mut args = Vec::new();
        let mut stdin = None;
        let flag = format!("--{}", self.kind());

        match self {
            Self::YesNo { text, labels, .. }
            | Self::YesNoCancel { text, labels, .. }
            | Self::WarningContinueCancel { text, labels }
            | Self::MsgBox { text, labels }
            | Self::Password { text, labels }
            | Self::NewPassword { text, labels } => {
                labels.push_args(&mut args);
                args.extend([flag, text.clone()]);
            }
            Self::Sorry { text, details, labels } | Self::Error { text, details, labels } => {
                labels.push_args(&mut args);
                args.extend([flag, text.clone()]);
                args.extend(details.iter().cloned());
            }
            Self::InputBox { text, init, labels } | Self::TextInputBox { text, init, labels } => {
                labels.push_args(&mut args);
                args.extend([flag, text.clone()]);
                args.extend(init.iter().cloned());
            }
            Self::TextBox { source, labels } => {
                labels.push_args(&mut args);
                args.push(flag);
                match source {
                    TextSource::File(path) => {
                        require_file(path)?;
                        args.push(path_arg(path));
                    }
                    TextSource::Text(text) => {
                        args.push("-".to_string());
                        stdin = Some(text.clone());
                    }
                }
            }
            Self::ImgBox { path, labels } => {
                require_file(path)?;
                labels.push_args(&mut args);
                args.extend([flag, path_arg(path)]);
            }
            Self::ImgInputBox { path, text, labels } => {
                require_file(path)?;
                labels.push_args(&mut args);
                args.extend([flag, path_arg(path), text.clone()]);
            }
            Self::ComboBox { text, items, labels } => {
                labels.push_args(&mut args);
                args.extend([flag, text.clone()]);
                args.extend(items.iter().cloned());
            }
            Self::Menu { text, items, labels } => {
                labels.push_args(&mut args);
                args.extend([flag, text.clone()]);
                for item in items {
                    args.extend([item.tag.clone(), item.label.clone()]);
                }
            }
            Self::CheckList { text, items, labels } | Self::RadioList { text, items, labels } => {
                args.push("--separate-output".to_string());
                labels.push_args(&mut args);
                args.extend([flag, text.clone()]);
                for item in items {
                    let state = if item.on { "on" } else { "off" };
                    args.extend([item.tag.clone(), item.label.clone(), state.to_string()]);
                }
            }
            Self::Slider {
                text,
                min,
                max,
                step,
                labels,
            } => {
                let step = step.unwrap_or_else(|| default_slider_step(*max));
                labels.push_args(&mut args);
                args.extend([
                    flag,
                    text.clone(),
                    min.to_string(),
                    max.to_string(),
                    step.to_string(),
                ]);
            }
            Self::OpenFile {
                filter,
                start_dir,
                multiple,
            } => {
                require_dir(start_dir)?;
                if *multiple {
                    args.extend(["--multiple".to_string(), "--separate-output".to_string()]);
                }
                args.extend([flag, path_arg(start_dir)]);
                args.extend(filter.iter().cloned());
            }
            Self::SaveFile { filter, start_dir } => {
                require_dir(start_dir)?;
                args.extend([flag, path_arg(start_dir)]);
                args.extend(filter.iter().cloned());
            }
            Self::ExistingDirectory { start_dir } => {
                require_dir(start_dir)?;
                args.extend([flag, path_arg(start_dir)]);
            }
            Self::PassivePopup { text, timeout, icon } => {
                if let Some(icon) = icon {
                    args.extend(["--icon".to_string(), icon.clone()]);
                }
                args.extend([flag, text.clone()]);
                args.extend(timeout.map(|secs| secs.to_string()));
            }
            Self::GetIcon => args.push(flag),
            Self::ProgressBar { label, count, labels } => {
                labels.push_args(&mut args);
                args.extend([flag, label.clone(), count.to_string()]);
            }
        }

        Ok(DialogCommand { args, stdin })
    }

    /// Map an exit status and captured output to a reply.
    ///
    /// Total over every status: each one yields a reply or a failure.
    pub fn interpret(&self, status: i32, output: String) -> Result<DialogReply, DialogError> {
        let kind = self.kind();
        let reply = match self {
            Self::YesNo { .. } => {
                DialogReply::Outcome(if status == 0 { Outcome::Yes } else { Outcome::No })
            }
            Self::YesNoCancel { .. } => DialogReply::Outcome(match status {
                0 => Outcome::Yes,
                1 => Outcome::No,
                _ => Outcome::Cancel,
            }),
            Self::WarningContinueCancel { .. } => DialogReply::Outcome(if status == 0 {
                Outcome::Continue
            } else {
                Outcome::Cancel
            }),
            Self::Sorry { .. } | Self::Error { .. } => match status {
                0 => DialogReply::Outcome(Outcome::Ok),
                2 => DialogReply::Text(None),
                _ => return Err(DialogError::unexpected_status(kind, status)),
            },
            Self::MsgBox { .. }
            | Self::TextBox { .. }
            | Self::ImgBox { .. }
            | Self::PassivePopup { .. } => DialogReply::Done,
            Self::InputBox { .. }
            | Self::Password { .. }
            | Self::NewPassword { .. }
            | Self::TextInputBox { .. }
            | Self::ImgInputBox { .. }
            | Self::ComboBox { .. }
            | Self::Menu { .. }
            | Self::RadioList { .. }
            | Self::SaveFile { .. }
            | Self::ExistingDirectory { .. }
            | Self::GetIcon => DialogReply::Text((status == 0).then_some(output)),
            Self::CheckList { .. } | Self::OpenFile { .. } => {
                let lines = (status == 0).then(|| output.lines().map(str::to_string).collect());
                DialogReply::List(lines)
            }
            Self::Slider { .. } => {
                if status != 0 {
                    DialogReply::Number(None)
                } else {
                    let value = output
                        .trim()
                        .parse()
                        .map_err(|_| DialogError::BadOutput { kind, output: output.clone() })?;
                    DialogReply::Number(Some(value))
                }
            }
            Self::ProgressBar { .. } => {
                if status != 0 {
                    return Err(DialogError::unexpected_status(kind, status));
                }
                let session = SessionRef::parse(&output).ok_or_else(|| DialogError::BadOutput {
                    kind,
                    output: output.clone(),
                })?;
                DialogReply::Session(session)
            }
        };
        Ok(reply)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn require_file(path: &Path) -> Result<(), DialogError> {
    if path.is_dir() {
        return Err(DialogError::NotAFile { path: path.to_path_buf() });
    }
    if !path.exists() {
        return Err(DialogError::NotFound { path: path.to_path_buf() });
    }
    Ok(())
}

fn require_dir(path: &Path) -> Result<(), DialogError> {
    if !path.exists() {
        return Err(DialogError::NotFound { path: path.to_path_buf() });
    }
    if !path.is_dir() {
        return Err(DialogError::NotADirectory { path: path.to_path_buf() });
    }
    Ok(())
}
