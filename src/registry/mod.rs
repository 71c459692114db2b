//! Translation registry.
//!
//! This module provides:
//! - `Category` and `TranslationId`, the packed 32-bit identifier actors and
//!   textures carry around
//! - `TranslationRegistry`, one growable slot array of tables per category
//! - the standard (ice, gray, grayscale) and blood translations
//! - named lookup for custom translations
//! - `TranslationSnapshot` for persisting registry contents
//!
//! Lookups never grow the registry and answer `None` for anything unknown;
//! callers treat `None` as "no translation".

mod id;
mod snapshot;
mod standard;

use std::collections::HashMap;

use thiserror::Error;

use crate::color::PalEntry;
use crate::remap::RemapTable;
use crate::slots::AutoGrowArray;

pub use id::{
    Category, TranslationId, MAX_ACS_TRANSLATIONS, MAX_DECORATE_TRANSLATIONS, NUM_CATEGORIES,
    TRANSLATIONTYPE_MASK, TRANSLATION_MASK, TRANSLATION_SHIFT,
};
pub use snapshot::{load_snapshots, save_snapshots, SavedTranslation, SnapshotError, TranslationSnapshot};
pub use standard::{ICE_PALETTE, STD_GRAY, STD_GRAYSCALE, STD_ICE};

/// Error from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown translation category {0}")]
    UnknownCategory(u8),
    #[error("malformed translation identifier {0:#010x}")]
    BadIdentifier(u32),
    #[error("the invalid category cannot hold translations")]
    InvalidCategory,
    #[error("too many {category} translations (limit {limit})")]
    Full { category: Category, limit: usize },
}

fn same_table(a: &RemapTable, b: &RemapTable) -> bool {
    a == b && a.inactive == b.inactive
}

/// All translation tables, by category and slot.
#[derive(Debug)]
pub struct TranslationRegistry {
    tables: Vec<AutoGrowArray<RemapTable>>,
    names: HashMap<String, TranslationId>,
    /// RGB behind each `Blood` slot; `None` for slot 0 and restored slots
    blood_colors: Vec<Option<PalEntry>>,
}

impl TranslationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tables: (0..NUM_CATEGORIES).map(|_| AutoGrowArray::new()).collect(),
            names: HashMap::new(),
            blood_colors: Vec::new(),
        }
    }

    /// The table an identifier refers to.
    ///
    /// Returns `None` for identifier 0, the invalid or an unknown category,
    /// slots past the end and empty slots. Never grows anything.
    pub fn resolve(&self, id: TranslationId) -> Option<&RemapTable> {
        let category = self.lookup_category(id)?;
        self.tables[category as usize].get(id.index() as usize)
    }

    pub fn resolve_mut(&mut self, id: TranslationId) -> Option<&mut RemapTable> {
        let category = self.lookup_category(id)?;
        self.tables[category as usize].get_mut(id.index() as usize)
    }

    /// Like [`resolve`](Self::resolve), but an inactive table counts as absent.
    pub fn resolve_active(&self, id: TranslationId) -> Option<&RemapTable> {
        self.resolve(id).filter(|t| t.is_active())
    }

    fn lookup_category(&self, id: TranslationId) -> Option<Category> {
        match id.category() {
            Some(Category::Invalid) => None,
            Some(category) => Some(category),
            None if !id.is_well_formed() => {
                tracing::warn!(raw = id.raw(), "malformed translation identifier");
                None
            }
            None => {
                tracing::warn!(raw = id.raw(), category = id.category_bits(), "translation with unknown category");
                None
            }
        }
    }

    /// Table in `category` at `slot`.
    pub fn get(&self, category: Category, slot: u16) -> Option<&RemapTable> {
        self.resolve(TranslationId::new(category, slot))
    }

    /// Put `table` at `slot` of `category`, replacing (and dropping) any
    /// table already there.
    pub fn store(&mut self, category: Category, slot: u16, table: RemapTable) -> Result<TranslationId, RegistryError> {
        if category == Category::Invalid {
            return Err(RegistryError::InvalidCategory);
        }
        if self.tables[category as usize].set(slot as usize, table).is_some() {
            tracing::debug!(%category, slot, "replaced translation");
        }
        Ok(TranslationId::new(category, slot))
    }

    /// Append `table` after the last slot of `category`.
    pub fn push(&mut self, category: Category, table: RemapTable) -> Result<TranslationId, RegistryError> {
        if category == Category::Invalid {
            return Err(RegistryError::InvalidCategory);
        }
        let slots = &mut self.tables[category as usize];
        let limit = slot_limit(category);
        if slots.len() >= limit {
            return Err(RegistryError::Full { category, limit });
        }
        let slot = slots.push(Some(table));
        Ok(TranslationId::new(category, slot as u16))
    }

    /// Store a copy of `table` in `category`, reusing the first equal table
    /// already there. An active table never stands in for an inactive one
    /// or the other way round.
    pub fn store_translation(&mut self, category: Category, table: &RemapTable) -> Result<TranslationId, RegistryError> {
        if category == Category::Invalid {
            return Err(RegistryError::InvalidCategory);
        }
        if let Some((slot, _)) = self.tables[category as usize].iter().find(|(_, t)| same_table(t, table)) {
            return Ok(TranslationId::new(category, slot as u16));
        }
        self.push(category, table.clone())
    }

    /// Remove and return the table an identifier refers to. The slot stays.
    pub fn free(&mut self, id: TranslationId) -> Option<RemapTable> {
        let category = self.lookup_category(id)?;
        self.tables[category as usize].take(id.index() as usize)
    }

    /// Number of slots (occupied or not) in `category`.
    pub fn len(&self, category: Category) -> usize {
        self.tables[category as usize].len()
    }

    /// Occupied slots of `category`.
    pub fn iter(&self, category: Category) -> impl Iterator<Item = (TranslationId, &RemapTable)> + '_ {
        self.tables[category as usize].iter().map(move |(slot, t)| (TranslationId::new(category, slot as u16), t))
    }

    /// Mutable access to every occupied slot, e.g. to resolve native palettes.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut RemapTable> + '_ {
        self.tables.iter_mut().flat_map(|slots| slots.iter_mut().map(|(_, t)| t))
    }

    /// Total number of occupied slots over all categories.
    pub fn count(&self) -> usize {
        Category::ALL.iter().map(|&c| self.tables[c as usize].iter().count()).sum()
    }

    /// Name a translation so it can be found with
    /// [`find_custom_translation`](Self::find_custom_translation). Names are
    /// case-insensitive; an existing name is rebound.
    pub fn register_name(&mut self, name: &str, id: TranslationId) -> Option<TranslationId> {
        self.names.insert(name.to_ascii_lowercase(), id)
    }

    /// Look up a translation by name.
    ///
    /// `None` maps to identifier 0 and `Ice` to the standard ice table; any
    /// other name must have been registered.
    pub fn find_custom_translation(&self, name: &str) -> Option<TranslationId> {
        if name.eq_ignore_ascii_case("none") {
            return Some(TranslationId::NONE);
        }
        if name.eq_ignore_ascii_case("ice") {
            return Some(TranslationId::new(Category::Standard, STD_ICE));
        }
        self.names.get(&name.to_ascii_lowercase()).copied()
    }

    /// Drop every table, name and blood color.
    pub fn clear(&mut self) {
        for slots in &mut self.tables {
            slots.clear();
        }
        self.names.clear();
        self.blood_colors.clear();
    }
}

impl Default for TranslationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// How many slots a category may hold when appending.
fn slot_limit(category: Category) -> usize {
    match category {
        Category::LevelScripted => MAX_ACS_TRANSLATIONS,
        Category::Decorate | Category::Blood => MAX_DECORATE_TRANSLATIONS,
        // Slot indices are 16 bits wide
        _ => TRANSLATION_MASK as usize + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::UniquePaletteCache;
    use crate::palettes::MasterPalette;

    fn master() -> MasterPalette {
        MasterPalette::default()
    }

    fn red_table() -> RemapTable {
        let pal = master();
        let mut t = RemapTable::new(&pal, 256);
        t.add_color_range(&pal, 0, 255, PalEntry::rgb(255, 0, 0), PalEntry::rgb(128, 0, 0));
        t
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = TranslationRegistry::new();
        assert_eq!(registry.count(), 0);
        for c in Category::ALL {
            assert_eq!(registry.len(c), 0);
        }
    }

    #[test]
    fn test_store_and_resolve() {
        let mut registry = TranslationRegistry::new();
        let id = registry.store(Category::Custom, 3, red_table()).unwrap();
        assert_eq!(id.decode(), Ok((Category::Custom, 3)));
        assert_eq!(registry.len(Category::Custom), 4);
        assert_eq!(registry.resolve(id), Some(&red_table()));
        assert!(registry.get(Category::Custom, 2).is_none());
    }

    #[test]
    fn test_store_into_invalid_category() {
        let mut registry = TranslationRegistry::new();
        assert_eq!(registry.store(Category::Invalid, 0, red_table()), Err(RegistryError::InvalidCategory));
        assert_eq!(registry.push(Category::Invalid, red_table()), Err(RegistryError::InvalidCategory));
        assert_eq!(
            registry.store_translation(Category::Invalid, &red_table()),
            Err(RegistryError::InvalidCategory)
        );
    }

    #[test]
    fn test_resolve_never_grows() {
        let mut registry = TranslationRegistry::new();
        registry.store(Category::Decals, 1, red_table()).unwrap();
        assert!(registry.resolve(TranslationId::new(Category::Decals, 500)).is_none());
        assert_eq!(registry.len(Category::Decals), 2);
    }

    #[test]
    fn test_resolve_unknown_and_invalid() {
        let registry = TranslationRegistry::new();
        assert!(registry.resolve(TranslationId::NONE).is_none());
        assert!(registry.resolve(TranslationId::from_raw(0x00FF_0000)).is_none());
        assert!(registry.resolve(TranslationId::from_raw(0x000C_0000)).is_none());
    }

    #[test]
    fn test_resolve_rejects_stray_high_bits() {
        let mut registry = TranslationRegistry::new();
        let id = registry.store(Category::Custom, 2, red_table()).unwrap();
        let stray = TranslationId::from_raw(id.raw() | 0xFF00_0000);
        assert!(registry.resolve(stray).is_none());
        assert!(registry.free(stray).is_none());
        assert!(registry.resolve(id).is_some());
    }

    #[test]
    fn test_store_replaces_and_releases_native() {
        let mut cache = UniquePaletteCache::new();
        let mut registry = TranslationRegistry::new();
        let id = registry.store(Category::Custom, 0, red_table()).unwrap();
        let index = registry.resolve_mut(id).unwrap().update_native(&mut cache);
        assert_eq!(cache.users(index.get()), 1);

        registry.store(Category::Custom, 0, RemapTable::new(&master(), 256)).unwrap();
        assert_eq!(cache.users(index.get()), 0);
        assert!(registry.resolve(id).unwrap().is_identity());
    }

    #[test]
    fn test_resolve_active_skips_inactive() {
        let mut registry = TranslationRegistry::new();
        let mut t = red_table();
        t.inactive = true;
        let id = registry.store(Category::Players, 0, t).unwrap();
        assert!(registry.resolve(id).is_some());
        assert!(registry.resolve_active(id).is_none());
    }

    #[test]
    fn test_push_appends() {
        let mut registry = TranslationRegistry::new();
        registry.store(Category::Decorate, 4, red_table()).unwrap();
        let id = registry.push(Category::Decorate, red_table()).unwrap();
        assert_eq!(id.index(), 5);
    }

    #[test]
    fn test_store_translation_deduplicates() {
        let pal = master();
        let mut registry = TranslationRegistry::new();
        let a = red_table().store_translation(&mut registry, Category::Decorate).unwrap();
        let b = red_table().store_translation(&mut registry, Category::Decorate).unwrap();
        assert_eq!(a, b);

        let c = RemapTable::new(&pal, 256).store_translation(&mut registry, Category::Decorate).unwrap();
        assert_ne!(a, c);
        assert_eq!(c.index(), 1);
        assert_eq!(registry.len(Category::Decorate), 2);
    }

    #[test]
    fn test_store_translation_keeps_inactive_apart() {
        let mut registry = TranslationRegistry::new();
        let on = red_table().store_translation(&mut registry, Category::Custom).unwrap();
        let mut off_table = red_table();
        off_table.inactive = true;
        let off = off_table.store_translation(&mut registry, Category::Custom).unwrap();

        assert_ne!(on, off);
        assert!(registry.resolve_active(on).is_some());
        assert!(registry.resolve_active(off).is_none());
        assert_eq!(off_table.store_translation(&mut registry, Category::Custom), Ok(off));
    }

    #[test]
    fn test_free_keeps_slot() {
        let mut registry = TranslationRegistry::new();
        let id = registry.store(Category::Font, 2, red_table()).unwrap();
        assert!(registry.free(id).is_some());
        assert!(registry.resolve(id).is_none());
        assert_eq!(registry.len(Category::Font), 3);
        assert!(registry.free(id).is_none());
    }

    #[test]
    fn test_iter_lists_occupied_slots() {
        let mut registry = TranslationRegistry::new();
        registry.store(Category::Custom, 1, red_table()).unwrap();
        registry.store(Category::Custom, 5, red_table()).unwrap();
        let ids: Vec<u16> = registry.iter(Category::Custom).map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_tables_mut_visits_all() {
        let mut cache = UniquePaletteCache::new();
        let mut registry = TranslationRegistry::new();
        registry.store(Category::Custom, 1, red_table()).unwrap();
        registry.store(Category::Players, 0, red_table()).unwrap();
        for t in registry.tables_mut() {
            t.update_native(&mut cache);
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.users(1), 2);
    }

    #[test]
    fn test_named_translations() {
        let mut registry = TranslationRegistry::new();
        let id = registry.store(Category::Custom, 7, red_table()).unwrap();
        assert_eq!(registry.register_name("RedArmor", id), None);
        assert_eq!(registry.find_custom_translation("redarmor"), Some(id));
        assert_eq!(registry.find_custom_translation("None"), Some(TranslationId::NONE));
        assert_eq!(
            registry.find_custom_translation("ICE"),
            Some(TranslationId::new(Category::Standard, STD_ICE))
        );
        assert_eq!(registry.find_custom_translation("missing"), None);
    }

    #[test]
    fn test_clear() {
        let mut registry = TranslationRegistry::new();
        let id = registry.store(Category::Custom, 0, red_table()).unwrap();
        registry.register_name("x", id);
        registry.clear();
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.len(Category::Custom), 0);
        assert_eq!(registry.find_custom_translation("x"), None);
    }
}
