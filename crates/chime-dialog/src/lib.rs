//! Typed facade over the KDE `kdialog` program.
//!
//! Every dialog is a short-lived child process: arguments select the dialog
//! kind, the exit status carries the button answer and standard output
//! carries any text answer. This crate turns that protocol into typed calls.
//!
//! # Features
//!
//! - **Requests**: [`DialogRequest`] lays out the command line and maps exit
//!   statuses back to a [`DialogReply`] without launching anything
//! - **Facade**: [`Kdialog`] has one method per dialog kind
//! - **Progress**: [`ProgressBar`] drives a live bar over D-Bus
//! - **Diagnostics**: [`Diagnostic`] renders an error chain for detailed
//!   error dialogs
//! - **Testing**: [`ScriptedRunner`] replays canned answers in place of the
//!   real program
//!
//! # Example
//!
//! ```rust,no_run
//! use chime_dialog::{Kdialog, Outcome, Style};
//!
//! let mut kd = Kdialog::default();
//! kd.set_title("Greeter");
//!
//! if kd.yesno("Say hello?", Style::Question).unwrap() == Outcome::Yes {
//!     let name = kd.inputbox("Your name:", None).unwrap();
//!     kd.msgbox(&format!("Hello, {}!", name.unwrap_or_default())).unwrap();
//! }
//! ```

mod diagnostic;
mod error;
mod invoker;
mod kdialog;
mod scripted;

/// Progress bars and the D-Bus tools that drive them.
pub mod progress;

/// Dialog requests, command line layout and status tables.
pub mod request;

pub use diagnostic::Diagnostic;
pub use error::{DialogError, ProgressError};
pub use invoker::{CommandRunner, DisplayConfig, Invocation, Invoker, RawOutput, SystemRunner};
pub use kdialog::Kdialog;
pub use progress::{BusTransport, DEFAULT_BUS_CANDIDATES, ProgressBar, SessionRef};
pub use request::{
    CheckItem, DialogCommand, DialogReply, DialogRequest, Labels, MenuItem, Outcome, Style,
    TextSource, default_slider_step,
};
pub use scripted::{RecordedCall, ScriptedRunner};
