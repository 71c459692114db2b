//! Build pipeline for palremap projects
//!
//! Turns the `[[translation]]` entries of `palremap.toml` into a populated
//! [`TranslationRegistry`](crate::registry::TranslationRegistry), resolves
//! every table in a unique palette cache and writes a JSON snapshot.
//!
//! # Example
//!
//! ```ignore
//! use palremap::build::{BuildContext, BuildPipeline};
//! use palremap::config::{load_config, locate_config};
//!
//! let cwd = std::env::current_dir()?;
//! let source = locate_config(None, &cwd);
//! let context = BuildContext::new(load_config(&source)?, source.project_root(&cwd));
//! let result = BuildPipeline::new(context).build()?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod pipeline;
pub mod result;

pub use context::*;
pub use pipeline::*;
pub use result::*;
