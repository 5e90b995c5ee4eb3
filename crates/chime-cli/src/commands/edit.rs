//! Interactive editor command.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::editor::EditorSession;

#[derive(Args, Default)]
pub struct EditArgs {
    /// Saved theme (JSON) to open right away
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

pub fn run(args: EditArgs, config: &Config) -> anyhow::Result<()> {
    let kd = config.kdialog();
    let version = kd.version().context("KDialog is missing or corrupt")?;
    tracing::info!(%version, program = %config.dialog.program, "found kdialog");

    let mut session = EditorSession::new(kd, config);
    session.run(args.file.as_deref())
}
