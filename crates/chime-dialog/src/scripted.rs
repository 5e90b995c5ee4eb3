//! Deterministic [`CommandRunner`] for tests.
//!
//! Replies are consumed in order for every program that has no fixed
//! responder. Once the script runs dry every call answers status `1` with no
//! output, which every dialog kind reads as "cancelled", so interactive loops
//! driven by a short script always wind down.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::invoker::{CommandRunner, RawOutput};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program that was run.
    pub program: String,
    /// Arguments passed, excluding the program.
    pub args: Vec<String>,
    /// Text piped to standard input.
    pub stdin: Option<String>,
}

/// Replays scripted replies and records every call it receives.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    fixed: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[derive(Debug, Clone)]
enum Reply {
    Exit(RawOutput),
    Missing,
}

impl ScriptedRunner {
    /// Create a runner with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with text output.
    pub fn reply(&self, status: i32, stdout: &str) -> &Self {
        self.reply_bytes(status, stdout.as_bytes().to_vec())
    }

    /// Queue a reply with raw output bytes.
    pub fn reply_bytes(&self, status: i32, stdout: Vec<u8>) -> &Self {
        lock(&self.replies).push_back(Reply::Exit(RawOutput { status, stdout }));
        self
    }

    /// Queue a reply that behaves like a program that cannot be started.
    pub fn reply_missing(&self) -> &Self {
        lock(&self.replies).push_back(Reply::Missing);
        self
    }

    /// Answer every call to `program` with `status`, outside the queue.
    pub fn answer(&self, program: &str, status: i32) -> &Self {
        lock(&self.fixed).insert(
            program.to_string(),
            Reply::Exit(RawOutput {
                status,
                stdout: Vec::new(),
            }),
        );
        self
    }

    /// Treat `program` as not installed, outside the queue.
    pub fn answer_missing(&self, program: &str) -> &Self {
        lock(&self.fixed).insert(program.to_string(), Reply::Missing);
        self
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Calls made to one program.
    pub fn calls_to(&self, program: &str) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.program == program)
            .cloned()
            .collect()
    }

    /// Number of queued replies not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> std::io::Result<RawOutput> {
        lock(&self.calls).push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            stdin: stdin.map(str::to_string),
        });

        let fixed = lock(&self.fixed).get(program).cloned();
        let reply = fixed.or_else(|| lock(&self.replies).pop_front());

        match reply {
            Some(Reply::Exit(output)) => Ok(output),
            Some(Reply::Missing) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{program}: not found"),
            )),
            None => Ok(RawOutput {
                status: 1,
                stdout: Vec::new(),
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
