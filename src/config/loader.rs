//! Locating and reading `palremap.toml`
//!
//! A build runs against exactly one [`ConfigSource`]: a file named on the
//! command line, the nearest `palremap.toml` above the working directory,
//! the per-user file, or built-in defaults. The source also decides which
//! directory relative paths (`palette.source`, `project.out`) resolve from.

use super::schema::{LimitsConfig, PaletteConfig, PalremapConfig, ProjectConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in project directories.
pub const CONFIG_FILE: &str = "palremap.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Where the active configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named with `--config`
    Explicit(PathBuf),
    /// Found in the working directory or one of its ancestors
    Project(PathBuf),
    /// `$XDG_CONFIG_HOME/palremap/palremap.toml`
    User(PathBuf),
    /// Nothing found; [`default_config`] applies
    Defaults,
}

impl ConfigSource {
    /// The config file, unless running on defaults.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Project(p) | ConfigSource::User(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }

    /// Directory that relative paths in the config resolve against.
    ///
    /// Project files resolve next to themselves. The per-user file and the
    /// defaults apply to whatever directory the build runs in, so they use
    /// `cwd`.
    pub fn project_root(&self, cwd: &Path) -> PathBuf {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Project(p) => match p.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => cwd.to_path_buf(),
            },
            ConfigSource::User(_) | ConfigSource::Defaults => cwd.to_path_buf(),
        }
    }
}

/// Pick the configuration for a build started in `cwd`.
///
/// An explicit path always wins, even if it does not exist (reading it
/// then reports the error). Otherwise the nearest project file is used,
/// then the per-user file.
pub fn locate_config(explicit: Option<&Path>, cwd: &Path) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = find_project_config(cwd) {
        return ConfigSource::Project(path);
    }
    match user_config_path() {
        Some(path) if path.is_file() => ConfigSource::User(path),
        _ => ConfigSource::Defaults,
    }
}

/// Nearest `palremap.toml` in `start` or any ancestor.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE)).find(|p| p.is_file())
}

/// Location of the per-user config, whether or not it exists.
///
/// Uses `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn user_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("palremap").join(CONFIG_FILE))
}

/// Load the configuration a [`ConfigSource`] points at.
///
/// # Returns
/// - `Ok(PalremapConfig)` with validated contents, or [`default_config`]
///   for [`ConfigSource::Defaults`]
/// - `Err(ConfigError)` if the file cannot be read, parsed or validated
///
/// # Example
/// ```ignore
/// let cwd = std::env::current_dir()?;
/// let source = locate_config(None, &cwd);
/// let config = load_config(&source)?;
/// ```
pub fn load_config(source: &ConfigSource) -> Result<PalremapConfig, ConfigError> {
    match source.path() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            read_config(path)
        }
        None => Ok(default_config()),
    }
}

/// Read, parse and validate one config file.
pub fn read_config(path: &Path) -> Result<PalremapConfig, ConfigError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let config: PalremapConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Configuration used when no palremap.toml is found.
///
/// The project is named after the current directory and has no translations.
pub fn default_config() -> PalremapConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    PalremapConfig {
        project: ProjectConfig { name: project_name, out: PathBuf::from("build") },
        palette: PaletteConfig::default(),
        limits: LimitsConfig::default(),
        translations: Vec::new(),
    }
}
