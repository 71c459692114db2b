//! Build result types.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::UniquePaletteCache;
use crate::registry::{TranslationId, TranslationRegistry, TranslationSnapshot};

/// One configured translation after the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTranslation {
    pub name: String,
    pub id: TranslationId,
    /// 1-based unique palette index
    pub unique_index: u32,
    pub inactive: bool,
}

/// Outcome of a build.
#[derive(Debug)]
pub struct BuildResult {
    pub registry: TranslationRegistry,
    pub cache: UniquePaletteCache,
    /// Configured translations, in config order
    pub translations: Vec<BuiltTranslation>,
    /// One snapshot per category the config stored into
    pub snapshots: Vec<TranslationSnapshot>,
    /// Snapshot file written, `None` on a dry run
    pub output: Option<PathBuf>,
    pub total_duration: Duration,
}

impl BuildResult {
    /// Number of distinct palettes among all stored tables.
    pub fn unique_palettes(&self) -> usize {
        self.cache.len()
    }

    /// A short summary for display.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Built {} translation(s), {} unique palette(s) in {:.2?}",
            self.translations.len(),
            self.unique_palettes(),
            self.total_duration
        );
        if let Some(path) = &self.output {
            s.push_str(&format!(" -> {}", path.display()));
        }
        s
    }
}
