//! Build command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::build::{BuildContext, BuildPipeline};
use crate::config::{load_config, locate_config};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Run the build command
pub fn run_build(config_path: Option<&Path>, out: Option<&Path>) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_default();
    let source = locate_config(config_path, &cwd);
    match source.path() {
        Some(path) => tracing::info!(path = %path.display(), "using config"),
        None => tracing::info!("no palremap.toml found, using defaults"),
    }

    let config = match load_config(&source) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let context = BuildContext::new(config, source.project_root(&cwd)).with_output(out.map(Path::to_path_buf));
    match BuildPipeline::new(context).build() {
        Ok(result) => {
            for t in &result.translations {
                let state = if t.inactive { " (inactive)" } else { "" };
                println!("  {:<24} {:<20} palette {}{}", t.name, t.id.to_string(), t.unique_index, state);
            }
            println!("{}", result.summary());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
