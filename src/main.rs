//! palremap - command-line tool for building and inspecting palette translations

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use palremap::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli::log_level(cli.verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    cli::execute(cli)
}
