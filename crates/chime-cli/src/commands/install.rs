//! Non-interactive theme install.

use anyhow::Context;
use chime_theme::{Theme, install_theme};
use clap::Args;
use std::path::PathBuf;

use super::export::sound_progress;
use crate::config::Config;

#[derive(Args)]
pub struct InstallArgs {
    /// Saved theme (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Install under this directory instead of the user sounds directory
    #[arg(long, value_name = "DIR")]
    sounds_dir: Option<PathBuf>,
}

pub fn run(args: InstallArgs, config: &Config) -> anyhow::Result<()> {
    let theme = Theme::load(&args.file)
        .with_context(|| format!("cannot open theme {}", args.file.display()))?;
    let root = args.sounds_dir.unwrap_or_else(|| config.sounds_dir());

    println!("Installing '{}'...", theme.name());
    let pb = sound_progress(&theme)?;
    let summary = install_theme(&theme, &root, |event, _| {
        pb.set_message(event.to_string());
        pb.inc(1);
    })
    .with_context(|| format!("cannot install theme under {}", root.display()))?;
    pb.finish_with_message("done");

    println!("Installed '{}' to {}", theme.name(), summary.dest.display());
    Ok(())
}
