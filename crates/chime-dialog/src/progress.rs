//! Live progress bars driven over D-Bus.
//!
//! `kdialog --progressbar` prints a D-Bus service name and object path and
//! returns immediately; the bar stays on screen until it is closed through
//! the bus. Updates go through whichever Qt D-Bus command line tool is
//! installed:
//!
//! ```text
//! qdbus <service> <path> Set "" value <n>
//! qdbus <service> <path> close
//! ```
//!
//! The user can dismiss the bar at any time. That is only noticed on the next
//! update, whose bus call then fails; the bar reports
//! [`ProgressError::Cancelled`] and counts as closed from then on.

use std::sync::Arc;

use crate::invoker::CommandRunner;
use crate::{DialogError, ProgressError};

/// D-Bus tools probed for a progress bar, in order.
pub const DEFAULT_BUS_CANDIDATES: [&str; 3] = ["qdbus6", "qdbus", "qdbus-qt5"];

/// Address of a progress bar on the session bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionRef {
    /// Bus service name, e.g. `org.kde.kdialog-4242`.
    pub service: String,
    /// Object path, e.g. `/ProgressDialog`.
    pub object_path: String,
}

impl SessionRef {
    /// Parse the `<service> <path>` line printed by `kdialog --progressbar`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let service = parts.next()?;
        let object_path = parts.next()?;
        if parts.next().is_some() || !object_path.starts_with('/') {
            return None;
        }
        Some(Self {
            service: service.to_string(),
            object_path: object_path.to_string(),
        })
    }

    fn args<'a>(&'a self, rest: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        [self.service.as_str(), self.object_path.as_str()]
            .into_iter()
            .chain(rest)
            .map(str::to_string)
            .collect()
    }
}

/// A D-Bus command line tool that answered for one session.
#[derive(Clone)]
pub struct BusTransport {
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl BusTransport {
    /// Find the first candidate that runs and reaches the session bus.
    ///
    /// Each candidate is run without arguments, which lists the bus services.
    /// Used before a progress bar is opened, since an open bar can only be
    /// closed through the bus.
    pub fn locate<S: AsRef<str>>(
        runner: Arc<dyn CommandRunner>,
        candidates: &[S],
    ) -> Result<Self, DialogError> {
        Self::probe(runner, candidates, &[])
    }

    /// Find the first candidate that can reach `session`.
    ///
    /// Each candidate is run as `<candidate> <service> <path>`; the first one
    /// that exits with status 0 is kept.
    pub fn discover<S: AsRef<str>>(
        runner: Arc<dyn CommandRunner>,
        candidates: &[S],
        session: &SessionRef,
    ) -> Result<Self, DialogError> {
        Self::probe(runner, candidates, &session.args(std::iter::empty()))
    }

    fn probe<S: AsRef<str>>(
        runner: Arc<dyn CommandRunner>,
        candidates: &[S],
        args: &[String],
    ) -> Result<Self, DialogError> {
        for candidate in candidates {
            let candidate = candidate.as_ref();
            match runner.run(candidate, args, None) {
                Ok(output) if output.status == 0 => {
                    tracing::debug!(program = candidate, "using D-Bus tool");
                    return Ok(Self {
                        runner,
                        program: candidate.to_string(),
                    });
                }
                Ok(output) => {
                    tracing::debug!(
                        program = candidate,
                        status = output.status,
                        "D-Bus tool rejected session"
                    );
                }
                Err(e) => {
                    tracing::debug!(program = candidate, error = %e, "D-Bus tool not runnable");
                }
            }
        }

        Err(DialogError::BusUnavailable {
            tried: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    /// Name of the selected tool.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run one bus call; `true` when it exited with status 0.
    pub(crate) fn call(&self, session: &SessionRef, rest: &[&str]) -> bool {
        let args = session.args(rest.iter().copied());
        match self.runner.run(&self.program, &args, None) {
            Ok(output) => output.status == 0,
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "D-Bus call failed to start");
                false
            }
        }
    }
}

impl std::fmt::Debug for BusTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusTransport")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

/// A progress bar shown by the dialog program.
///
/// Created by [`Kdialog::progressbar`](crate::Kdialog::progressbar). Dropping
/// an open bar closes it.
#[derive(Debug)]
pub struct ProgressBar {
    bus: BusTransport,
    session: SessionRef,
    itercount: u32,
    progress: u32,
    closed: bool,
    auto_close: bool,
}

impl ProgressBar {
    pub(crate) fn new(
        bus: BusTransport,
        session: SessionRef,
        itercount: u32,
        auto_close: bool,
    ) -> Self {
        Self {
            bus,
            session,
            itercount,
            progress: 0,
            closed: false,
            auto_close,
        }
    }

    /// Bus address of the bar.
    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    /// Total number of steps.
    pub fn itercount(&self) -> u32 {
        self.itercount
    }

    /// Current value.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Whether the bar has been closed, by either side.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Move the bar to `value`.
    ///
    /// Values past [`itercount`](Self::itercount) are rejected before
    /// anything is sent.
    pub fn set(&mut self, value: u32) -> Result<(), ProgressError> {
        if value > self.itercount {
            return Err(ProgressError::OutOfRange {
                value,
                max: self.itercount,
            });
        }
        if self.closed {
            return Err(ProgressError::Closed);
        }

        self.progress = value;
        let value = value.to_string();
        if self.bus.call(&self.session, &["Set", "", "value", &value]) {
            Ok(())
        } else {
            tracing::debug!(service = %self.session.service, "progress bar went away");
            self.close();
            Err(ProgressError::Cancelled)
        }
    }

    /// Advance by one step, closing at the end when auto-close is set.
    pub fn advance(&mut self) -> Result<(), ProgressError> {
        if self.closed {
            return Err(ProgressError::Closed);
        }
        self.set(self.progress.saturating_add(1))?;
        if self.auto_close && self.progress == self.itercount {
            self.close();
        }
        Ok(())
    }

    /// Close the bar. Does nothing if it is already closed.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.bus.call(&self.session, &["close"]) {
            tracing::debug!(service = %self.session.service, "close ignored, bar already gone");
        }
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRunner;

    fn session() -> SessionRef {
        SessionRef::parse("org.kde.kdialog-7 /ProgressDialog").unwrap()
    }

    fn bar(runner: &Arc<ScriptedRunner>, count: u32, auto_close: bool) -> ProgressBar {
        let bus = BusTransport::discover(runner.clone(), &["qdbus"], &session()).unwrap();
        ProgressBar::new(bus, session(), count, auto_close)
    }

    #[test]
    fn parse_rejects_malformed_references() {
        assert!(SessionRef::parse("").is_none());
        assert!(SessionRef::parse("org.kde.kdialog-7").is_none());
        assert!(SessionRef::parse("org.kde.kdialog-7 ProgressDialog").is_none());
        assert!(SessionRef::parse("a /b c").is_none());
    }

    #[test]
    fn discovery_takes_first_answering_tool() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer_missing("qdbus6").answer("qdbus", 1).answer("qdbus-qt5", 0);

        let bus =
            BusTransport::discover(runner.clone(), &DEFAULT_BUS_CANDIDATES, &session()).unwrap();
        assert_eq!(bus.program(), "qdbus-qt5");
        assert_eq!(runner.calls()[0].args, ["org.kde.kdialog-7", "/ProgressDialog"]);
    }

    #[test]
    fn locate_runs_tools_without_arguments() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer_missing("qdbus6").answer("qdbus", 0);

        let bus = BusTransport::locate(runner.clone(), &DEFAULT_BUS_CANDIDATES).unwrap();
        assert_eq!(bus.program(), "qdbus");
        assert!(runner.calls().iter().all(|call| call.args.is_empty()));
        assert!(runner.calls_to("qdbus-qt5").is_empty());
    }

    #[test]
    fn discovery_fails_with_typed_error() {
        let runner = Arc::new(ScriptedRunner::new());
        for tool in DEFAULT_BUS_CANDIDATES {
            runner.answer_missing(tool);
        }
        let err = BusTransport::discover(runner, &DEFAULT_BUS_CANDIDATES, &session()).unwrap_err();
        assert!(matches!(err, DialogError::BusUnavailable { ref tried } if tried.len() == 3));
    }

    #[test]
    fn set_pushes_value_over_bus() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 10, false);

        bar.set(4).unwrap();
        assert_eq!(bar.progress(), 4);
        let last = runner.calls().pop().unwrap();
        assert_eq!(
            last.args,
            ["org.kde.kdialog-7", "/ProgressDialog", "Set", "", "value", "4"]
        );
    }

    #[test]
    fn out_of_range_never_reaches_bus() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 3, false);
        let before = runner.calls().len();

        assert_eq!(bar.set(4), Err(ProgressError::OutOfRange { value: 4, max: 3 }));
        assert_eq!(runner.calls().len(), before);
        assert!(!bar.is_closed());
    }

    #[test]
    fn failed_push_means_cancelled() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 3, false);
        runner.answer("qdbus", 2);

        assert_eq!(bar.set(1), Err(ProgressError::Cancelled));
        assert!(bar.is_closed());
        assert_eq!(bar.advance(), Err(ProgressError::Closed));
    }

    #[test]
    fn unstartable_push_means_cancelled() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 3, false);
        runner.answer_missing("qdbus");

        assert_eq!(bar.set(1), Err(ProgressError::Cancelled));
        assert!(bar.is_closed());
        assert_eq!(runner.calls().last().unwrap().args.last().unwrap(), "close");
    }

    #[test]
    fn closed_bar_rejects_updates_without_calls() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 3, false);
        bar.close();
        let after_close = runner.calls().len();

        assert_eq!(bar.set(1), Err(ProgressError::Closed));
        assert_eq!(bar.advance(), Err(ProgressError::Closed));
        bar.close();
        drop(bar);
        assert_eq!(runner.calls().len(), after_close);
        assert_eq!(runner.calls().last().unwrap().args.last().unwrap(), "close");
    }

    #[test]
    fn auto_close_at_the_end() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 2, true);

        bar.advance().unwrap();
        assert!(!bar.is_closed());
        bar.advance().unwrap();
        assert!(bar.is_closed());
        assert_eq!(runner.calls().last().unwrap().args.last().unwrap(), "close");
    }

    #[test]
    fn advance_past_the_end_is_out_of_range() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        let mut bar = bar(&runner, 1, false);

        bar.advance().unwrap();
        assert_eq!(bar.advance(), Err(ProgressError::OutOfRange { value: 2, max: 1 }));
    }

    #[test]
    fn drop_closes_open_bar() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.answer("qdbus", 0);
        drop(bar(&runner, 5, false));
        assert_eq!(runner.calls().last().unwrap().args.last().unwrap(), "close");
    }
}
