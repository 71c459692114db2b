//! Configuration schema types for `palremap.toml`
//!
//! Defines the structure and validation rules for a palremap project.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::registry::{Category, MAX_DECORATE_TRANSLATIONS, STD_GRAYSCALE, STD_ICE};

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Build output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

/// Master palette section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Built-in palette name or path to a .pal/.lmp/.hex/.txt/image file
    #[serde(default = "default_palette_source")]
    pub source: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self { source: default_palette_source() }
    }
}

fn default_palette_source() -> String {
    "grayscale".to_string()
}

/// Allocation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Most slots the build may allocate in one category
    #[serde(default = "default_max_custom")]
    pub max_custom: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_custom: default_max_custom() }
    }
}

fn default_max_custom() -> usize {
    MAX_DECORATE_TRANSLATIONS
}

/// One `[[translation]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Name used for lookup (case-insensitive)
    pub name: String,
    /// Category name, e.g. "custom" or "level_scripted"
    #[serde(default = "default_category")]
    pub category: String,
    /// Fixed slot; appended with deduplication when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u16>,
    /// Translation clauses, applied in order to an identity table
    pub clauses: Vec<String>,
    /// Store the table but mark it inactive
    #[serde(default)]
    pub inactive: bool,
}

fn default_category() -> String {
    "custom".to_string()
}

impl TranslationConfig {
    /// The parsed category, if the name is a known one.
    pub fn category(&self) -> Option<Category> {
        Category::from_name(&self.category)
    }
}

/// Complete palremap.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalremapConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Master palette
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Allocation limits
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Translations to build
    #[serde(default, rename = "translation")]
    pub translations: Vec<TranslationConfig>,
}

/// Validation error for config
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "translation[2].category")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl PalremapConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.palette.source.is_empty() {
            errors.push(ConfigValidationError {
                field: "palette.source".to_string(),
                message: "must name a built-in palette or a file".to_string(),
            });
        }

        if self.limits.max_custom == 0 || self.limits.max_custom > MAX_DECORATE_TRANSLATIONS {
            errors.push(ConfigValidationError {
                field: "limits.max_custom".to_string(),
                message: format!("must be between 1 and {}", MAX_DECORATE_TRANSLATIONS),
            });
        }

        let mut seen = HashSet::new();
        let mut slots = HashSet::new();
        for (i, t) in self.translations.iter().enumerate() {
            if t.name.is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("translation[{}].name", i),
                    message: "must be a non-empty string".to_string(),
                });
            } else if !seen.insert(t.name.to_ascii_lowercase()) {
                errors.push(ConfigValidationError {
                    field: format!("translation[{}].name", i),
                    message: format!("duplicate translation name '{}'", t.name),
                });
            }

            match t.category() {
                None => errors.push(ConfigValidationError {
                    field: format!("translation[{}].category", i),
                    message: format!("unknown category '{}'", t.category),
                }),
                Some(Category::Invalid) => errors.push(ConfigValidationError {
                    field: format!("translation[{}].category", i),
                    message: "the invalid category cannot hold translations".to_string(),
                }),
                Some(category) => {
                    if let Some(slot) = t.slot {
                        if category == Category::Standard && (STD_ICE..=STD_GRAYSCALE).contains(&slot) {
                            errors.push(ConfigValidationError {
                                field: format!("translation[{}].slot", i),
                                message: format!("standard slot {} is reserved", slot),
                            });
                        } else if !slots.insert((category, slot)) {
                            errors.push(ConfigValidationError {
                                field: format!("translation[{}].slot", i),
                                message: format!("{} slot {} is used twice", category, slot),
                            });
                        }
                    }
                }
            }

            if t.clauses.is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("translation[{}].clauses", i),
                    message: "must contain at least one clause".to_string(),
                });
            }
        }

        errors
    }

    /// Check if the configuration is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
