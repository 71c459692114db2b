//! Build context containing configuration and paths for a build.

use crate::config::PalremapConfig;
use crate::palettes::get_builtin;
use std::path::{Path, PathBuf};

/// File the build writes its snapshot to, inside the output directory.
pub const SNAPSHOT_FILE: &str = "translations.json";

/// Build context containing configuration and paths for a build operation.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: PalremapConfig,
    /// Project root directory (where palremap.toml is located)
    project_root: PathBuf,
    /// Explicit output file, overriding `<project.out>/translations.json`
    output: Option<PathBuf>,
}

impl BuildContext {
    pub fn new(config: PalremapConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, output: None }
    }

    /// Write the snapshot to `path` instead of the default location.
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    pub fn config(&self) -> &PalremapConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the output directory (resolved against the project root).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Where the snapshot is written.
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.output {
            Some(p) => p.clone(),
            None => self.out_dir().join(SNAPSHOT_FILE),
        }
    }

    /// The palette source to load: built-in names unchanged, file paths
    /// resolved against the project root.
    pub fn palette_source(&self) -> String {
        let source = &self.config.palette.source;
        if get_builtin(source).is_some() {
            source.clone()
        } else {
            self.resolve_path(Path::new(source)).to_string_lossy().into_owned()
        }
    }

    /// Resolve a path relative to the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
