//! Command-line interface implementation
//!
//! This module defines the `palremap` command line and dispatches to
//! submodules for the individual commands.

mod build;
mod palette;
mod show;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::palettes::{load_palette, MasterPalette};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// palremap - Build and inspect palette translation tables
#[derive(Parser)]
#[command(name = "palremap")]
#[command(about = "palremap - Build and inspect palette translation (remap) tables")]
#[command(version)]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply translation clauses to an identity table and print the result
    Show {
        /// Translation clauses, e.g. "112:127=[255,0,0]:[64,0,0]"
        #[arg(required = true)]
        clauses: Vec<String>,

        /// Master palette: built-in name or file (.pal, .lmp, .hex, .txt, image)
        #[arg(short, long, default_value = "grayscale")]
        palette: String,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,

        /// Number of table entries (1-256)
        #[arg(long, default_value = "256", value_parser = clap::value_parser!(u16).range(1..=256))]
        entries: u16,
    },

    /// Build every translation in palremap.toml and write a snapshot
    Build {
        /// Config file (default: search upward for palremap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (default: <project.out>/translations.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the master palette or look up the nearest entry for a color
    Palette {
        /// Master palette: built-in name or file
        #[arg(short, long, default_value = "grayscale")]
        palette: String,

        /// Print the index closest to this color instead of the whole palette
        #[arg(long)]
        nearest: Option<String>,
    },
}

/// Log filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Run a parsed command line.
pub fn execute(cli: Cli) -> ExitCode {
    match cli.command {
        Commands::Show { clauses, palette, json, entries } => {
            show::run_show(&clauses, &palette, json, entries as usize)
        }
        Commands::Build { config, out } => build::run_build(config.as_deref(), out.as_deref()),
        Commands::Palette { palette, nearest } => palette::run_palette(&palette, nearest.as_deref()),
    }
}

/// Load a master palette for a command, reporting failures on stderr.
pub(crate) fn open_palette(source: &str) -> Result<MasterPalette, ExitCode> {
    load_palette(source).map_err(|e| {
        eprintln!("Error: Cannot load palette '{}': {}", source, e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}
