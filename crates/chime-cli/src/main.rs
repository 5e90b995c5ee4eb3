//! chime - sound theme maker driving kdialog.

mod commands;
mod config;
mod editor;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "chime")]
#[command(author, version, about = "Sound theme maker for KDE", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// kdialog program to run
    #[arg(long, global = true, value_name = "PATH")]
    kdialog: Option<String>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit sound themes interactively (default)
    Edit(commands::edit::EditArgs),

    /// Export a saved theme into a directory
    Export(commands::export::ExportArgs),

    /// Install a saved theme for the current user
    Install(commands::install::InstallArgs),

    /// List the sound events a theme can define
    Events(commands::events::EventsArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(program) = cli.kdialog {
        config.dialog.program = program;
    }

    match cli.command {
        None => commands::edit::run(commands::edit::EditArgs::default(), &config),
        Some(Commands::Edit(args)) => commands::edit::run(args, &config),
        Some(Commands::Export(args)) => commands::export::run(args),
        Some(Commands::Install(args)) => commands::install::run(args, &config),
        Some(Commands::Events(args)) => commands::events::run(args),
    }
}
