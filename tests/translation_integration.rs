//! End-to-end tests for building, registering, resolving and persisting
//! translation tables through the public library API.

use palremap::cache::UniquePaletteCache;
use palremap::color::PalEntry;
use palremap::manipulation::{BlendMode, TextureManipulation};
use palremap::palettes::{get_builtin, MasterPalette};
use palremap::registry::{Category, TranslationId, TranslationRegistry, TranslationSnapshot};
use palremap::remap::RemapTable;

const RED: PalEntry = PalEntry::rgb(255, 0, 0);
const BLUE: PalEntry = PalEntry::rgb(0, 0, 255);

fn master() -> MasterPalette {
    get_builtin("rgb332").expect("rgb332 is built in")
}

#[test]
fn test_custom_slot_end_to_end() {
    let pal = master();
    let mut cache = UniquePaletteCache::new();
    let mut registry = TranslationRegistry::new();

    let mut table = RemapTable::new(&pal, 256);
    table.add_color_range(&pal, 0, 255, RED, BLUE);
    let id = registry.store(Category::Custom, 3, table.clone()).expect("custom is a valid category");

    assert_eq!(id.decode(), Ok((Category::Custom, 3)));
    assert_eq!(id.raw(), 0x000A_0003);
    assert_eq!(registry.resolve(id), Some(&table));

    let index = registry.resolve_mut(id).expect("slot 3 is filled").update_native(&mut cache);
    assert_eq!(cache.users(index.get()), 1);
    assert_eq!(cache.lookup(index.get()).expect("resolved entry")[255], BLUE.with_alpha(255));

    let mut replacement = RemapTable::new(&pal, 256);
    replacement.add_tint(&pal, 0, 255, RED, 100);
    registry.store(Category::Custom, 3, replacement.clone()).expect("replace slot 3");

    assert_eq!(registry.resolve(id), Some(&replacement));
    assert_eq!(cache.users(index.get()), 0);
}

#[test]
fn test_equal_palettes_resolve_to_same_entry() {
    let pal = master();
    let mut cache = UniquePaletteCache::new();

    let mut a = RemapTable::new(&pal, 256);
    a.add_color_range(&pal, 10, 20, RED, RED);
    let mut b = RemapTable::new(&pal, 256);
    for i in 10..=20 {
        b.add_index_range(&pal, i, i, pal.nearest_entry(RED), pal.nearest_entry(RED));
    }

    // rgb332 has pure red at index 0xE0, so both tables end up identical
    assert_eq!(a, b);
    assert_eq!(a.update_native(&mut cache), b.update_native(&mut cache));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_index_range_identity() {
    let pal = master();
    let mut identity = RemapTable::new(&pal, 256);
    identity.make_identity(&pal);

    let mut ranged = RemapTable::new(&pal, 256);
    ranged.add_index_range(&pal, 0, 255, 0, 255);
    assert_eq!(ranged, identity);
    assert!(ranged.is_identity());

    ranged.add_index_range(&pal, 5, 5, 9, 200);
    assert!(!ranged.is_identity());
    assert_eq!(ranged.remap()[5], 9);
}

#[test]
fn test_text_translation_matches_primitives() {
    let pal = master();
    let mut from_text = RemapTable::new(&pal, 256);
    from_text
        .add_to_translation(&pal, "\"0:127=[255,0,0]:[0,0,255]\", \"128:255=@100[0,255,0]\"")
        .expect("valid translation");

    let mut direct = RemapTable::new(&pal, 256);
    direct.add_color_range(&pal, 0, 127, RED, BLUE);
    direct.add_tint(&pal, 128, 255, PalEntry::rgb(0, 255, 0), 100);
    assert_eq!(from_text, direct);
}

#[test]
fn test_failed_clause_keeps_earlier_clauses() {
    let pal = master();
    let mut table = RemapTable::new(&pal, 256);
    let result = table.add_to_translation(&pal, "1:1=7:7, 2:999=3:3");
    assert!(result.is_err());
    assert_eq!(table.remap()[1], 7);
    assert_eq!(table.remap()[2], 2);
}

#[test]
fn test_snapshot_round_trip_through_json() {
    let pal = master();
    let mut cache = UniquePaletteCache::new();
    let mut registry = TranslationRegistry::new();

    let mut table = RemapTable::new(&pal, 64);
    table.add_desaturation(&pal, 0, 63, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
    table.inactive = true;
    let id = registry.store(Category::LevelScripted, 12, table).expect("store scripted");
    registry.resolve_mut(id).expect("stored").update_native(&mut cache);

    let json = registry.snapshot(Category::LevelScripted).to_json().expect("serialize");
    let snapshot = TranslationSnapshot::from_json(&json).expect("deserialize");

    let mut restored = TranslationRegistry::new();
    assert_eq!(restored.restore(snapshot), Ok(1));
    let copy = restored.resolve(id).expect("restored slot");
    let original = registry.resolve(id).expect("original slot");
    assert_eq!(copy, original);
    assert_eq!(copy.num_entries(), 64);
    assert!(copy.inactive);
    assert!(copy.unique_index().is_none());
    assert!(original.unique_index().is_some());
}

#[test]
fn test_named_and_standard_lookup() {
    let pal = master();
    let mut registry = TranslationRegistry::new();
    registry.init_standard(&pal).expect("standard translations");

    let ice = registry.find_custom_translation("Ice").expect("ice is always known");
    assert_eq!(ice, TranslationId::new(Category::Standard, 7));
    assert!(registry.resolve(ice).is_some());
    assert_eq!(registry.find_custom_translation("none"), Some(TranslationId::NONE));
    assert!(registry.resolve(TranslationId::NONE).is_none());

    let blood = registry.create_blood_translation(&pal, PalEntry::rgb(160, 0, 0)).expect("blood");
    registry.register_name("DarkBlood", blood);
    assert_eq!(registry.find_custom_translation("darkblood"), Some(blood));
}

#[test]
fn test_texture_manipulation_round_trip() {
    let mut tm = TextureManipulation::default();
    assert!(!tm.check_if_enabled());

    tm.set_additive_color(PalEntry::rgb(32, 0, 0));
    tm.set_blend_mode(BlendMode::Screen);
    assert!(tm.check_if_enabled());

    let json = serde_json::to_string(&tm).expect("serialize");
    let back: TextureManipulation = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, tm);
    assert_eq!(back.blend_mode(), BlendMode::Screen);
}
