//! Process invocation for the dialog program.
//!
//! Every dialog is one blocking child process. [`CommandRunner`] is the seam
//! between the facade and the operating system: [`SystemRunner`] spawns real
//! processes, [`ScriptedRunner`](crate::ScriptedRunner) replays canned replies
//! in tests.
//!
//! ```text
//! Kdialog ──► Invoker ──► CommandRunner ──► kdialog --title <title> <args...>
//!                               │
//!                               └──────────► qdbus <service> <path> ...
//! ```

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::DialogError;

/// Raw result of one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit status, `-1` when the process was killed by a signal.
    pub status: i32,
    /// Bytes written to standard output.
    pub stdout: Vec<u8>,
}

/// Runs an external program to completion.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, feeding `stdin` if given, and wait for it.
    ///
    /// Only a failure to start the process is an error; a non-zero exit
    /// status is reported in [`RawOutput::status`].
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> std::io::Result<RawOutput>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> std::io::Result<RawOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() });

        let mut child = command.spawn()?;
        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            match pipe.write_all(input.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!(program, "child closed stdin early");
                }
                Err(e) => {
                    drop(pipe);
                    if let Err(kill) = child.kill() {
                        tracing::debug!(program, error = %kill, "cannot kill child");
                    }
                    child.wait()?;
                    return Err(e);
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.stderr.is_empty() {
            tracing::debug!(
                program,
                stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
                "child stderr"
            );
        }

        Ok(RawOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
        })
    }
}

/// Window decoration applied to every dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Window title; `None` leaves the title to the dialog program.
    pub title: Option<String>,
    /// Icon shown by passive popups.
    pub icon: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: Some("KDialog".to_string()),
            icon: None,
        }
    }
}

/// Exit status and trimmed standard output of one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Exit status of the dialog program.
    pub status: i32,
    /// Standard output minus one trailing line terminator.
    pub output: String,
}

/// Runs the dialog program with the current [`DisplayConfig`].
#[derive(Clone)]
pub struct Invoker {
    runner: Arc<dyn CommandRunner>,
    program: String,
    display: DisplayConfig,
}

impl Invoker {
    /// Create an invoker for `program` using `runner`.
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            display: DisplayConfig::default(),
        }
    }

    /// The dialog program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The runner shared with progress bars.
    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }

    /// Current display configuration.
    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Mutable access to the display configuration.
    pub fn display_mut(&mut self) -> &mut DisplayConfig {
        &mut self.display
    }

    /// Run the dialog program once.
    ///
    /// `--title <title>` is placed ahead of `args` unless the title is unset.
    pub fn invoke(&self, args: &[String], stdin: Option<&str>) -> Result<Invocation, DialogError> {
        let mut full_args = Vec::with_capacity(args.len() + 2);
        if let Some(title) = &self.display.title {
            full_args.push("--title".to_string());
            full_args.push(title.clone());
        }
        full_args.extend_from_slice(args);

        tracing::debug!(program = %self.program, args = ?full_args, "invoking dialog");
        let raw = self
            .runner
            .run(&self.program, &full_args, stdin)
            .map_err(|e| DialogError::spawn(&self.program, e))?;

        let output = String::from_utf8(raw.stdout)
            .map(trim_line_end)
            .unwrap_or_default();
        tracing::debug!(status = raw.status, %output, "dialog finished");

        Ok(Invocation {
            status: raw.status,
            output,
        })
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("program", &self.program)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

/// Strip exactly one trailing `\n` or `\r\n`.
fn trim_line_end(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
