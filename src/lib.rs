//! palremap - palette translation tables for indexed-color graphics
//!
//! This library provides functionality to:
//! - Build 256-entry remap tables from index ranges, color ranges,
//!   desaturation, colourisation and tint, or from a compact text syntax
//! - Deduplicate equal output palettes in a content-addressed cache
//! - Keep tables in a category/slot registry addressed by packed 32-bit ids
//! - Describe simple effects as shader parameters instead of tables
//! - Build and persist a project's translations from `palremap.toml`

pub mod build;
pub mod cache;
pub mod cli;
pub mod color;
pub mod config;
pub mod manipulation;
pub mod palettes;
pub mod parser;
pub mod registry;
pub mod remap;
pub mod slots;
pub mod tokenizer;
