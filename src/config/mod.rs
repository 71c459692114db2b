//! Configuration module for palremap projects
//!
//! Provides types, discovery and parsing for `palremap.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config, find_project_config, load_config, locate_config, read_config, user_config_path, ConfigError,
    ConfigSource, CONFIG_FILE,
};
pub use schema::*;
