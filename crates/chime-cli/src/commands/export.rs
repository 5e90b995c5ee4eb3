//! Non-interactive theme export.

use anyhow::Context;
use chime_theme::{Theme, export_theme};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ExportArgs {
    /// Saved theme (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Directory to write the theme into
    #[arg(value_name = "DEST")]
    dest: PathBuf,
}

/// Progress bar counting copied sounds.
pub(crate) fn sound_progress(theme: &Theme) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(theme.bound_sounds().count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let theme = Theme::load(&args.file)
        .with_context(|| format!("cannot open theme {}", args.file.display()))?;

    println!("Exporting '{}'...", theme.name());
    let pb = sound_progress(&theme)?;
    let summary = export_theme(&theme, &args.dest, |event, _| {
        pb.set_message(event.to_string());
        pb.inc(1);
    })
    .with_context(|| format!("cannot export theme to {}", args.dest.display()))?;
    pb.finish_with_message("done");

    println!(
        "Exported '{}' to {} ({} sounds)",
        theme.name(),
        summary.dest.display(),
        summary.sounds
    );
    Ok(())
}
