//! Build pipeline: config translations to registry, unique palettes and
//! snapshot file.

use std::fs;
use std::time::Instant;

use thiserror::Error;

use super::{BuildContext, BuildResult, BuiltTranslation};
use crate::cache::UniquePaletteCache;
use crate::config::TranslationConfig;
use crate::palettes::{load_palette, MasterPalette, PaletteLoadError};
use crate::parser::TranslationError;
use crate::registry::{save_snapshots, Category, RegistryError, SnapshotError, TranslationId, TranslationRegistry};
use crate::remap::RemapTable;

/// Error during a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteLoadError),
    #[error("Translation '{name}': unknown category '{category}'")]
    Category { name: String, category: String },
    #[error("Translation '{name}': {source}")]
    Translation {
        name: String,
        #[source]
        source: TranslationError,
    },
    #[error("Translation '{name}': {source}")]
    Registry {
        name: String,
        #[source]
        source: RegistryError,
    },
    #[error("Translation '{name}': {category} already holds {limit} translation(s)")]
    Limit { name: String, category: Category, limit: usize },
    #[error("Translation '{name}': slot {id} is already taken")]
    SlotTaken { name: String, id: TranslationId },
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build pipeline for executing builds.
pub struct BuildPipeline {
    context: BuildContext,
    /// Build everything but write nothing
    dry_run: bool,
}

impl BuildPipeline {
    pub fn new(context: BuildContext) -> Self {
        Self { context, dry_run: false }
    }

    /// Set dry-run mode (don't write the snapshot).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the build pipeline with the configured palette.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let master = load_palette(&self.context.palette_source())?;
        self.build_with_palette(&master)
    }

    /// Run the build pipeline against an already loaded master palette.
    pub fn build_with_palette(&self, master: &MasterPalette) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let config = self.context.config();

        let mut registry = TranslationRegistry::new();
        registry.init_standard(master).map_err(|source| BuildError::Registry { name: "standard".to_string(), source })?;

        let mut stored = Vec::with_capacity(config.translations.len());
        let mut categories = Vec::new();
        for t in &config.translations {
            let id = store_configured(&mut registry, master, t, config.limits.max_custom)?;
            registry.register_name(&t.name, id);
            tracing::info!(name = %t.name, %id, "translation built");
            stored.push((t, id));
            if !categories.contains(&id.category_bits()) {
                categories.push(id.category_bits());
            }
        }

        let mut cache = UniquePaletteCache::new();
        for table in registry.tables_mut() {
            table.update_native(&mut cache);
        }

        let translations = stored
            .into_iter()
            .map(|(t, id)| BuiltTranslation {
                name: t.name.clone(),
                id,
                unique_index: registry.resolve(id).and_then(RemapTable::unique_index).map_or(0, |i| i.get()),
                inactive: t.inactive,
            })
            .collect();

        categories.sort_unstable();
        let snapshots: Vec<_> =
            categories.into_iter().filter_map(Category::from_u8).map(|c| registry.snapshot(c)).collect();

        let output = if self.dry_run {
            None
        } else {
            let path = self.context.snapshot_path();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            save_snapshots(&path, &snapshots)?;
            Some(path)
        };

        let result = BuildResult {
            registry,
            cache,
            translations,
            snapshots,
            output,
            total_duration: start.elapsed(),
        };
        tracing::info!(
            translations = result.translations.len(),
            unique_palettes = result.unique_palettes(),
            "build finished"
        );
        Ok(result)
    }
}

/// Build one configured translation and store it.
fn store_configured(
    registry: &mut TranslationRegistry,
    master: &MasterPalette,
    t: &TranslationConfig,
    max_slots: usize,
) -> Result<TranslationId, BuildError> {
    let category = t
        .category()
        .ok_or_else(|| BuildError::Category { name: t.name.clone(), category: t.category.clone() })?;

    let mut table = RemapTable::new(master, crate::remap::MAX_ENTRIES);
    for clause in &t.clauses {
        table
            .add_to_translation(master, clause)
            .map_err(|source| BuildError::Translation { name: t.name.clone(), source })?;
    }
    table.inactive = t.inactive;

    let registry_err = |source| BuildError::Registry { name: t.name.clone(), source };
    let limit_err = || BuildError::Limit { name: t.name.clone(), category, limit: max_slots };

    match t.slot {
        Some(slot) => {
            if slot as usize >= max_slots {
                return Err(limit_err());
            }
            if registry.get(category, slot).is_some() {
                return Err(BuildError::SlotTaken { name: t.name.clone(), id: TranslationId::new(category, slot) });
            }
            registry.store(category, slot, table).map_err(registry_err)
        }
        None => {
            let existing =
                registry.iter(category).any(|(_, other)| *other == table && other.inactive == table.inactive);
            if !existing && registry.len(category) >= max_slots {
                return Err(limit_err());
            }
            table.store_translation(registry, category).map_err(registry_err)
        }
    }
}
