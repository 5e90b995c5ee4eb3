//! Error types for dialog and progress operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, running, or interpreting a dialog.
///
/// A user dismissing a dialog is never an error: cancellation surfaces as an
/// absent value or as [`Outcome::Cancel`](crate::Outcome::Cancel).
#[derive(Debug, Error)]
pub enum DialogError {
    /// A flat item list did not split into whole items.
    #[error("{kind} items must come in groups of {arity}, got {len} values")]
    ItemArity {
        /// Dialog kind that rejected the items.
        kind: &'static str,
        /// Number of values that make up one item.
        arity: usize,
        /// Number of values supplied.
        len: usize,
    },

    /// A path the dialog needs does not exist.
    #[error("cannot open '{path}': no such file or directory")]
    NotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// A path that must be a file is a directory.
    #[error("cannot open '{path}': is a directory")]
    NotAFile {
        /// Path that was checked.
        path: PathBuf,
    },

    /// A path that must be a directory is not one.
    #[error("cannot open '{path}': not a directory")]
    NotADirectory {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The dialog program exited with a status its kind does not define.
    #[error("{kind} dialog returned unexpected status {status}")]
    UnexpectedStatus {
        /// Dialog kind that was shown.
        kind: &'static str,
        /// Exit status reported by the process.
        status: i32,
    },

    /// The dialog program printed something that could not be interpreted.
    #[error("{kind} dialog printed unexpected output '{output}'")]
    BadOutput {
        /// Dialog kind that was shown.
        kind: &'static str,
        /// Captured output.
        output: String,
    },

    /// The dialog program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// None of the D-Bus command line tools answered for a progress bar.
    #[error("no working D-Bus tool found (tried {})", .tried.join(", "))]
    BusUnavailable {
        /// Candidate programs probed, in order.
        tried: Vec<String>,
    },
}

impl DialogError {
    /// Create a spawn error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        DialogError::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create an unexpected status error.
    pub fn unexpected_status(kind: &'static str, status: i32) -> Self {
        DialogError::UnexpectedStatus { kind, status }
    }
}

/// Errors raised while driving a live progress bar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressError {
    /// The requested value is past the end of the bar.
    #[error("progress must be at least 0 and at most {max}, got {value}")]
    OutOfRange {
        /// Rejected value.
        value: u32,
        /// Total step count of the bar.
        max: u32,
    },

    /// The bar was already closed.
    #[error("attempted to update a closed progress bar")]
    Closed,

    /// The user dismissed the bar; it is now closed.
    #[error("progress bar was cancelled")]
    Cancelled,
}
