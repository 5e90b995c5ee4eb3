//! Sound event catalog listing.

use chime_theme::{SOUND_EVENTS, Theme};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct EventsArgs {
    /// Show the bindings of this saved theme next to each event
    #[arg(long, value_name = "FILE")]
    theme: Option<PathBuf>,
}

pub fn run(args: EventsArgs) -> anyhow::Result<()> {
    let Some(path) = &args.theme else {
        for event in SOUND_EVENTS {
            println!("{event}");
        }
        return Ok(());
    };

    let theme = Theme::load(path)?;
    let width = SOUND_EVENTS.iter().map(|e| e.len()).max().unwrap_or(0);
    for (event, sound) in theme.sounds() {
        match sound {
            Some(sound) => println!("{event:width$}  {}", sound.display()),
            None => println!("{event:width$}  -"),
        }
    }
    Ok(())
}
