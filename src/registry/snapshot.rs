//! Saving and restoring registry contents.
//!
//! A snapshot lists the occupied slots of one category in slot order. Tables
//! are written without their native resolution, so restored tables resolve
//! again on first use.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Category, RegistryError, TranslationRegistry};
use crate::remap::RemapTable;

/// Error reading or writing snapshot files.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One occupied slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTranslation {
    pub slot: u16,
    pub table: RemapTable,
}

/// The occupied slots of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSnapshot {
    pub category: Category,
    pub tables: Vec<SavedTranslation>,
}

impl TranslationSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl TranslationRegistry {
    /// Copy the occupied slots of `category`.
    pub fn snapshot(&self, category: Category) -> TranslationSnapshot {
        let tables = self
            .iter(category)
            .map(|(id, table)| SavedTranslation { slot: id.index(), table: table.clone() })
            .collect();
        TranslationSnapshot { category, tables }
    }

    /// Replace the contents of the snapshot's category with its tables.
    /// Returns how many tables were restored.
    pub fn restore(&mut self, snapshot: TranslationSnapshot) -> Result<usize, RegistryError> {
        let category = snapshot.category;
        if category == Category::Invalid {
            return Err(RegistryError::InvalidCategory);
        }
        self.tables[category as usize].clear();
        if category == Category::Blood {
            self.blood_colors.clear();
        }

        let count = snapshot.tables.len();
        for saved in snapshot.tables {
            self.store(category, saved.slot, saved.table)?;
        }
        if category == Category::Blood && count > 0 {
            // Restored slots keep their tables but not the color that made them
            self.blood_colors.resize(self.len(Category::Blood), None);
        }
        tracing::debug!(%category, count, "translations restored");
        Ok(count)
    }
}

/// Write several category snapshots to a JSON file.
pub fn save_snapshots(path: &Path, snapshots: &[TranslationSnapshot]) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(snapshots)?;
    fs::write(path, json).map_err(|source| SnapshotError::Io { path: path.to_path_buf(), source })
}

/// Read snapshots written by [`save_snapshots`].
pub fn load_snapshots(path: &Path) -> Result<Vec<TranslationSnapshot>, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_str(&text)?)
}
