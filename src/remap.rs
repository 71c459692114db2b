//! Translation (remap) tables
//!
//! A [`RemapTable`] maps every source palette index to a replacement: an
//! index into the master palette for software rendering (`remap`) and the
//! ideal, unquantized color (`palette`). Tables are filled with the color
//! generation primitives below, usually starting from [`RemapTable::new`]
//! which yields the identity mapping.
//!
//! Range arguments are inclusive and may lie partly or wholly outside the
//! table: interpolation runs along the range as given, but only indices inside
//! `0..num_entries` are written. A range whose start lies after its end writes
//! nothing.
//!
//! Slot 0 is the transparent slot. Primitives that compute a fresh color
//! store it with alpha 0 in slot 0 and alpha 255 elsewhere; tint and
//! colourisation keep whatever alpha the slot already had.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{NativePalette, UniqueIndex, UniquePaletteCache};
use crate::color::PalEntry;
use crate::palettes::{MasterPalette, PALETTE_SIZE};
use crate::parser::{split_clauses, parse_clause_at, Clause, TranslationError};
use crate::registry::{Category, RegistryError, TranslationId, TranslationRegistry};

/// Largest number of entries a table can have.
pub const MAX_ENTRIES: usize = PALETTE_SIZE;

/// Error when rebuilding a table from its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table has {0} entries, expected 1 to 256")]
    BadSize(usize),
    #[error("table declares {declared} entries but holds {remap} remap and {palette} palette entries")]
    LengthMismatch { declared: usize, remap: usize, palette: usize },
}

/// One translation table.
#[derive(Debug, Serialize, Deserialize)]
#[serde(into = "TableRecord", try_from = "TableRecord")]
pub struct RemapTable {
    remap: Vec<u8>,
    palette: Vec<PalEntry>,
    native: Option<NativePalette>,
    /// Palette changed since `native` was resolved
    dirty: bool,
    /// Consumers treat an inactive table exactly like no table at all.
    pub inactive: bool,
}

impl RemapTable {
    /// Identity table with `count` entries, clamped to `1..=256`.
    pub fn new(master: &MasterPalette, count: usize) -> Self {
        let count = count.clamp(1, MAX_ENTRIES);
        let mut table = Self {
            remap: vec![0; count],
            palette: vec![PalEntry::TRANSPARENT; count],
            native: None,
            dirty: true,
            inactive: false,
        };
        table.make_identity(master);
        table
    }

    pub fn num_entries(&self) -> usize {
        self.remap.len()
    }

    /// Master palette index for each source index.
    pub fn remap(&self) -> &[u8] {
        &self.remap
    }

    /// Ideal color for each source index.
    pub fn palette(&self) -> &[PalEntry] {
        &self.palette
    }

    pub fn is_active(&self) -> bool {
        !self.inactive
    }

    /// Overwrite one entry. Out-of-range indices are ignored.
    pub fn set_entry(&mut self, index: usize, remap: u8, color: PalEntry) {
        if index < self.num_entries() {
            self.remap[index] = remap;
            self.palette[index] = color;
            self.dirty = true;
        }
    }

    /// Reset to `remap[i] = i` and the master palette's colors.
    pub fn make_identity(&mut self, master: &MasterPalette) {
        for i in 0..self.num_entries() {
            self.remap[i] = i as u8;
            self.palette[i] = slot_color(i, master.color(i as u8));
        }
        self.dirty = true;
    }

    /// True when every index maps onto itself.
    pub fn is_identity(&self) -> bool {
        self.remap.iter().enumerate().all(|(i, &r)| r as usize == i)
    }

    /// Indices of `start..=end` that exist in this table.
    fn span(&self, start: i32, end: i32) -> Option<RangeInclusive<usize>> {
        let first = start.max(0);
        let last = end.min(self.num_entries() as i32 - 1);
        if first > last {
            tracing::debug!(start, end, entries = self.num_entries(), "empty translation range");
            return None;
        }
        Some(first as usize..=last as usize)
    }

    /// Map `start..=end` onto the master palette indices `pal1..=pal2`.
    ///
    /// Each index gets the palette index interpolated linearly between `pal1`
    /// and `pal2` by its position in the range, rounded to nearest. A single
    /// entry range (`start == end`) maps to `pal1`.
    pub fn add_index_range(&mut self, master: &MasterPalette, start: i32, end: i32, pal1: u8, pal2: u8) {
        let Some(span) = self.span(start, end) else {
            return;
        };
        let step = if end == start { 0.0 } else { (pal2 as f64 - pal1 as f64) / (end as i64 - start as i64) as f64 };

        for i in span {
            let k = (pal1 as f64 + step * (i as i64 - start as i64) as f64).round().clamp(0.0, 255.0) as u8;
            self.remap[i] = k;
            self.palette[i] = slot_color(i, master.color(k));
        }
        self.dirty = true;
    }

    /// Fill `start..=end` with a color gradient from `c1` to `c2`.
    ///
    /// Channels are interpolated linearly and truncated; the exact color goes
    /// to the palette and the nearest master color to the remap.
    pub fn add_color_range(&mut self, master: &MasterPalette, start: i32, end: i32, c1: PalEntry, c2: PalEntry) {
        let Some(span) = self.span(start, end) else {
            return;
        };
        let den = (end as i64 - start as i64).max(1);

        for i in span {
            let num = i as i64 - start as i64;
            let lerp = |a: u8, b: u8| (a as i64 + (b as i64 - a as i64) * num / den).clamp(0, 255) as u8;
            let color = PalEntry::rgb(lerp(c1.r, c2.r), lerp(c1.g, c2.g), lerp(c1.b, c2.b));
            self.palette[i] = slot_color(i, color);
            self.remap[i] = master.nearest_entry(color);
        }
        self.dirty = true;
    }

    /// Replace `start..=end` with a desaturated version of the master palette.
    ///
    /// The perceptual intensity of master color `i` selects a point between
    /// the two endpoint colors, given as factors in `0.0..=2.0` (1.0 = full
    /// channel).
    pub fn add_desaturation(
        &mut self,
        master: &MasterPalette,
        start: i32,
        end: i32,
        r1: f64,
        g1: f64,
        b1: f64,
        r2: f64,
        g2: f64,
        b2: f64,
    ) {
        let Some(span) = self.span(start, end) else {
            return;
        };
        let from = [r1, g1, b1].map(|c| c.clamp(0.0, 2.0));
        let to = [r2, g2, b2].map(|c| c.clamp(0.0, 2.0));

        for i in span {
            let intensity = master.color(i as u8).weighted_intensity() as f64 / 256.0;
            let channel = |k: usize| (from[k] * 255.0 + intensity * (to[k] - from[k])).clamp(0.0, 255.0) as u8;
            let color = PalEntry::rgb(channel(0), channel(1), channel(2));
            self.palette[i] = slot_color(i, color);
            self.remap[i] = master.nearest_entry(color);
        }
        self.dirty = true;
    }

    /// Recolor `start..=end` with the hue of `color`, keeping each slot's
    /// brightness.
    pub fn add_colourisation(&mut self, master: &MasterPalette, start: i32, end: i32, color: PalEntry) {
        let Some(span) = self.span(start, end) else {
            return;
        };

        for i in span {
            let cur = self.palette[i];
            // Luma in 1/1000 units, at most 255_000
            let luma = cur.r as u32 * 299 + cur.g as u32 * 587 + cur.b as u32 * 114;
            let scale = |c: u8| (c as u32 * luma / 255_000) as u8;
            let out = PalEntry::rgba(scale(color.r), scale(color.g), scale(color.b), cur.a);
            self.palette[i] = out;
            self.remap[i] = master.nearest_entry(out);
        }
        self.dirty = true;
    }

    /// Blend `start..=end` toward `color` by `amount` percent (clamped to 0..=100).
    pub fn add_tint(&mut self, master: &MasterPalette, start: i32, end: i32, color: PalEntry, amount: i32) {
        let Some(span) = self.span(start, end) else {
            return;
        };
        let a = amount.clamp(0, 100) as u32;
        let ia = 100 - a;

        for i in span {
            let cur = self.palette[i];
            let mix = |c: u8, t: u8| ((c as u32 * ia + t as u32 * a) / 100) as u8;
            let out = PalEntry::rgba(mix(cur.r, color.r), mix(cur.g, color.g), mix(cur.b, color.b), cur.a);
            self.palette[i] = out;
            self.remap[i] = master.nearest_entry(out);
        }
        self.dirty = true;
    }

    /// Copy `count` raw RGB triples from `bytes` into the table at `start`.
    ///
    /// Stops at the end of the table or of `bytes`, whichever comes first.
    pub fn add_colors(&mut self, master: &MasterPalette, start: i32, count: usize, bytes: &[u8]) {
        let count = count.min(bytes.len() / 3);
        if count == 0 {
            return;
        }
        let last = (start as i64 + count as i64 - 1).min(i32::MAX as i64) as i32;
        let Some(span) = self.span(start, last) else {
            return;
        };

        for i in span {
            let k = (i as i64 - start as i64) as usize * 3;
            let color = PalEntry::rgb(bytes[k], bytes[k + 1], bytes[k + 2]);
            self.palette[i] = slot_color(i, color);
            self.remap[i] = master.nearest_entry(color);
        }
        self.dirty = true;
    }

    /// Apply translation text such as `"112:127=[255,0,0]:[64,0,0]"`.
    ///
    /// Clauses are applied in order. On a malformed clause the error is
    /// returned and the clauses before it stay applied.
    pub fn add_to_translation(&mut self, master: &MasterPalette, text: &str) -> Result<(), TranslationError> {
        let clauses = split_clauses(text);
        if clauses.is_empty() {
            return Err(TranslationError::Empty);
        }

        for (offset, piece) in clauses {
            let clause = parse_clause_at(piece, offset)?;
            self.apply_clause(master, &clause);
        }
        Ok(())
    }

    /// Apply one parsed clause.
    pub fn apply_clause(&mut self, master: &MasterPalette, clause: &Clause) {
        match *clause {
            Clause::IndexRange { start, end, pal1, pal2 } => {
                self.add_index_range(master, start as i32, end as i32, pal1, pal2)
            }
            Clause::ColorRange { start, end, from, to } => {
                self.add_color_range(master, start as i32, end as i32, from, to)
            }
            Clause::Desaturation { start, end, from, to } => self.add_desaturation(
                master,
                start as i32,
                end as i32,
                from[0],
                from[1],
                from[2],
                to[0],
                to[1],
                to[2],
            ),
            Clause::Colourisation { start, end, color } => {
                self.add_colourisation(master, start as i32, end as i32, color)
            }
            Clause::Tint { start, end, amount, color } => {
                self.add_tint(master, start as i32, end as i32, color, amount)
            }
        }
    }

    /// Resolve this table's palette in `cache` unless the current resolution
    /// is still valid. Returns the 1-based unique index.
    pub fn update_native(&mut self, cache: &mut UniquePaletteCache) -> UniqueIndex {
        if let Some(native) = &self.native {
            if !self.dirty && cache.is_current(native) {
                return native.index();
            }
        }

        let native = cache.resolve(&self.palette);
        let index = native.index();
        self.native = Some(native);
        self.dirty = false;
        index
    }

    /// Drop the cached resolution.
    pub fn kill_native(&mut self) {
        self.native = None;
        self.dirty = true;
    }

    /// The resolved unique index, if resolved and not stale.
    pub fn unique_index(&self) -> Option<UniqueIndex> {
        self.valid_native().map(NativePalette::index)
    }

    /// The resolved 256 colors, if resolved and not stale.
    pub fn native_palette(&self) -> Option<&[PalEntry; PALETTE_SIZE]> {
        self.valid_native().map(NativePalette::colors)
    }

    fn valid_native(&self) -> Option<&NativePalette> {
        if self.dirty {
            None
        } else {
            self.native.as_ref()
        }
    }

    /// Resolve on demand and return the unique index.
    pub fn get_unique_index(&mut self, cache: &mut UniquePaletteCache) -> UniqueIndex {
        self.update_native(cache)
    }

    /// Store a copy of this table in `category`, reusing an equal table if
    /// one is already there.
    pub fn store_translation(
        &self,
        registry: &mut TranslationRegistry,
        category: Category,
    ) -> Result<TranslationId, RegistryError> {
        registry.store_translation(category, self)
    }
}

impl Clone for RemapTable {
    /// Copies the mapping but not the native resolution.
    fn clone(&self) -> Self {
        Self {
            remap: self.remap.clone(),
            palette: self.palette.clone(),
            native: None,
            dirty: true,
            inactive: self.inactive,
        }
    }
}

impl PartialEq for RemapTable {
    fn eq(&self, other: &Self) -> bool {
        self.num_entries() == other.num_entries() && self.remap == other.remap && self.palette == other.palette
    }
}

impl Eq for RemapTable {}

/// Serialized form of a table. Native resolution is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableRecord {
    num_entries: usize,
    remap: Vec<u8>,
    palette: Vec<PalEntry>,
    #[serde(default)]
    inactive: bool,
}

impl From<RemapTable> for TableRecord {
    fn from(table: RemapTable) -> Self {
        Self {
            num_entries: table.num_entries(),
            remap: table.remap,
            palette: table.palette,
            inactive: table.inactive,
        }
    }
}

impl TryFrom<TableRecord> for RemapTable {
    type Error = TableError;

    fn try_from(rec: TableRecord) -> Result<Self, Self::Error> {
        if rec.num_entries == 0 || rec.num_entries > MAX_ENTRIES {
            return Err(TableError::BadSize(rec.num_entries));
        }
        if rec.remap.len() != rec.num_entries || rec.palette.len() != rec.num_entries {
            return Err(TableError::LengthMismatch {
                declared: rec.num_entries,
                remap: rec.remap.len(),
                palette: rec.palette.len(),
            });
        }
        Ok(Self { remap: rec.remap, palette: rec.palette, native: None, dirty: true, inactive: rec.inactive })
    }
}

/// `color` with the alpha slot `index` gets: 0 for slot 0, opaque otherwise.
fn slot_color(index: usize, color: PalEntry) -> PalEntry {
    color.with_alpha(if index == 0 { 0 } else { 255 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> MasterPalette {
        MasterPalette::default()
    }

    fn table() -> RemapTable {
        RemapTable::new(&master(), 256)
    }

    #[test]
    fn test_new_is_identity() {
        let t = table();
        assert_eq!(t.num_entries(), 256);
        assert!(t.is_identity());
        assert_eq!(t.palette()[0], PalEntry::TRANSPARENT);
        assert_eq!(t.palette()[77], PalEntry::rgb(77, 77, 77));
        assert!(!t.inactive);
    }

    #[test]
    fn test_new_clamps_count() {
        assert_eq!(RemapTable::new(&master(), 0).num_entries(), 1);
        assert_eq!(RemapTable::new(&master(), 1000).num_entries(), 256);
        assert_eq!(RemapTable::new(&master(), 16).num_entries(), 16);
    }

    #[test]
    fn test_make_identity_after_changes() {
        let pal = master();
        let mut t = table();
        t.add_index_range(&pal, 0, 255, 255, 0);
        assert!(!t.is_identity());
        t.make_identity(&pal);
        assert!(t.is_identity());
    }

    #[test]
    fn test_full_index_range_equals_identity() {
        let pal = master();
        let mut t = table();
        t.add_color_range(&pal, 0, 255, PalEntry::rgb(255, 0, 0), PalEntry::rgb(0, 0, 255));
        t.add_index_range(&pal, 0, 255, 0, 255);
        assert_eq!(t, table());
    }

    #[test]
    fn test_index_range_interpolates() {
        let pal = master();
        let mut t = table();
        t.add_index_range(&pal, 10, 14, 100, 108);
        assert_eq!(&t.remap()[10..=14], &[100, 102, 104, 106, 108]);
        assert_eq!(t.palette()[12], PalEntry::rgb(104, 104, 104));
        assert_eq!(t.remap()[9], 9);
        assert_eq!(t.remap()[15], 15);
    }

    #[test]
    fn test_index_range_single_entry() {
        let pal = master();
        let mut t = table();
        t.add_index_range(&pal, 40, 40, 7, 200);
        assert_eq!(t.remap()[40], 7);
        assert_eq!(t.remap()[39], 39);
        assert_eq!(t.remap()[41], 41);
    }

    #[test]
    fn test_index_range_slot_zero_transparent() {
        let pal = master();
        let mut t = table();
        t.add_index_range(&pal, 0, 1, 50, 50);
        assert_eq!(t.palette()[0], PalEntry::rgba(50, 50, 50, 0));
        assert_eq!(t.palette()[1], PalEntry::rgb(50, 50, 50));
    }

    #[test]
    fn test_inverted_range_is_noop() {
        let pal = master();
        let mut t = table();
        t.add_index_range(&pal, 20, 10, 0, 0);
        t.add_color_range(&pal, 20, 10, PalEntry::WHITE, PalEntry::WHITE);
        t.add_tint(&pal, 20, 10, PalEntry::WHITE, 100);
        assert_eq!(t, table());
    }

    #[test]
    fn test_out_of_bounds_range_is_clamped() {
        let pal = master();
        let mut t = RemapTable::new(&pal, 16);
        t.add_index_range(&pal, -4, 300, 9, 9);
        assert!(t.remap().iter().all(|&r| r == 9));
        t.add_color_range(&pal, 400, 500, PalEntry::WHITE, PalEntry::WHITE);
        assert!(t.remap().iter().all(|&r| r == 9));
    }

    #[test]
    fn test_extreme_range_bounds() {
        let pal = master();
        let mut t = table();
        // Every existing index sits just past the midpoint of the full i32 span
        t.add_index_range(&pal, i32::MIN, i32::MAX, 0, 255);
        assert!(t.remap().iter().all(|&r| r == 128));

        t.add_color_range(&pal, i32::MIN, i32::MAX, PalEntry::BLACK, PalEntry::WHITE);
        assert_eq!(t.palette()[1], PalEntry::rgb(127, 127, 127));
        assert_eq!(t.palette()[255], PalEntry::rgb(127, 127, 127));

        t.add_index_range(&pal, i32::MIN, 10, 0, 255);
        assert_eq!(t.remap()[10], 255);

        let before = t.clone();
        t.add_colors(&pal, i32::MAX, 2, &[1, 2, 3, 4, 5, 6]);
        t.add_colors(&pal, i32::MIN, 2, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(t, before);
    }

    #[test]
    fn test_clamped_range_keeps_interpolation_positions() {
        let pal = master();
        let mut t = RemapTable::new(&pal, 4);
        // Range -2..=5 over indices 0..8, only 0..=3 exist
        t.add_index_range(&pal, -2, 5, 0, 70);
        assert_eq!(t.remap(), &[20, 30, 40, 50]);
    }

    #[test]
    fn test_color_range_constant() {
        let pal = master();
        let mut t = table();
        let c = PalEntry::rgb(90, 90, 90);
        t.add_color_range(&pal, 30, 60, c, c);
        for i in 30..=60 {
            assert_eq!(t.palette()[i], c);
            assert_eq!(t.remap()[i], t.remap()[30]);
        }
        assert_eq!(t.remap()[30], 90);
    }

    #[test]
    fn test_color_range_gradient() {
        let pal = master();
        let mut t = table();
        t.add_color_range(&pal, 0, 255, PalEntry::rgb(255, 0, 0), PalEntry::rgb(0, 0, 255));
        assert_eq!(t.palette()[0], PalEntry::rgba(255, 0, 0, 0));
        assert_eq!(t.palette()[255], PalEntry::rgb(0, 0, 255));
        let mid = t.palette()[51];
        assert_eq!(mid, PalEntry::rgb(204, 0, 51));
        assert!(!t.is_identity());
    }

    #[test]
    fn test_desaturation_gray_ramp() {
        let pal = master();
        let mut t = table();
        t.add_desaturation(&pal, 0, 255, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        // intensity of gray i is i * 257 / 256
        assert_eq!(t.palette()[128], PalEntry::rgb(128, 128, 128));
        assert_eq!(t.palette()[255], PalEntry::rgb(255, 255, 255));
        assert_eq!(t.remap()[128], 128);
    }

    #[test]
    fn test_desaturation_clamps_factors() {
        let pal = master();
        let mut t = table();
        t.add_desaturation(&pal, 1, 1, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0);
        assert_eq!(t.palette()[1], PalEntry::rgb(255, 255, 255));
        t.add_desaturation(&pal, 2, 2, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0);
        assert_eq!(t.palette()[2], PalEntry::rgb(0, 0, 0));
    }

    #[test]
    fn test_colourisation_keeps_brightness() {
        let pal = master();
        let mut t = table();
        t.add_colourisation(&pal, 0, 255, PalEntry::rgb(255, 0, 0));
        assert_eq!(t.palette()[255], PalEntry::rgb(255, 0, 0));
        assert_eq!(t.palette()[0], PalEntry::rgba(0, 0, 0, 0));
        let mid = t.palette()[128];
        assert_eq!((mid.g, mid.b), (0, 0));
        assert!(mid.r >= 127 && mid.r <= 128);
    }

    #[test]
    fn test_tint_zero_and_full() {
        let pal = master();
        let mut t = table();
        let before = t.clone();
        t.add_tint(&pal, 10, 20, PalEntry::rgb(255, 0, 0), 0);
        assert_eq!(t, before);

        t.add_tint(&pal, 10, 20, PalEntry::rgb(255, 0, 0), 100);
        for i in 10..=20 {
            assert_eq!(t.palette()[i], PalEntry::rgb(255, 0, 0));
        }
        assert_eq!(t.palette()[9], PalEntry::rgb(9, 9, 9));
    }

    #[test]
    fn test_tint_half() {
        let pal = master();
        let mut t = table();
        t.add_tint(&pal, 100, 100, PalEntry::rgb(200, 0, 0), 50);
        assert_eq!(t.palette()[100], PalEntry::rgb(150, 50, 50));
    }

    #[test]
    fn test_add_colors() {
        let pal = master();
        let mut t = table();
        t.add_colors(&pal, 254, 3, &[1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(t.palette()[254], PalEntry::rgb(1, 1, 1));
        assert_eq!(t.palette()[255], PalEntry::rgb(2, 2, 2));
        assert_eq!(t.remap()[255], 2);
    }

    #[test]
    fn test_add_colors_short_buffer() {
        let pal = master();
        let mut t = table();
        t.add_colors(&pal, 0, 10, &[5, 5, 5, 6, 6]);
        assert_eq!(t.palette()[0], PalEntry::rgba(5, 5, 5, 0));
        assert_eq!(t.palette()[1], PalEntry::rgb(1, 1, 1));
    }

    #[test]
    fn test_add_to_translation_multiple_clauses() {
        let pal = master();
        let mut t = table();
        t.add_to_translation(&pal, "0:1=2:3, 4:4=[9,9,9]:[9,9,9]").unwrap();
        assert_eq!(&t.remap()[0..2], &[2, 3]);
        assert_eq!(t.remap()[4], 9);
    }

    #[test]
    fn test_add_to_translation_partial_application() {
        let pal = master();
        let mut t = table();
        let err = t.add_to_translation(&pal, "10:10=20:20; 11:11=bogus").unwrap_err();
        assert!(matches!(err, TranslationError::Color { .. }));
        // First clause stays applied
        assert_eq!(t.remap()[10], 20);
        assert_eq!(t.remap()[11], 11);
    }

    #[test]
    fn test_add_to_translation_empty() {
        let mut t = table();
        assert_eq!(t.add_to_translation(&master(), ""), Err(TranslationError::Empty));
    }

    #[test]
    fn test_equality_ignores_native_and_inactive() {
        let mut cache = UniquePaletteCache::new();
        let mut a = table();
        let mut b = table();
        a.update_native(&mut cache);
        b.inactive = true;
        assert_eq!(a, b);
        assert_ne!(a, RemapTable::new(&master(), 255));
    }

    #[test]
    fn test_native_resolution_lifecycle() {
        let pal = master();
        let mut cache = UniquePaletteCache::new();
        let mut t = table();
        assert_eq!(t.unique_index(), None);

        let idx = t.update_native(&mut cache);
        assert_eq!(idx.get(), 1);
        assert_eq!(t.unique_index(), Some(idx));
        assert_eq!(t.native_palette().unwrap()[7], PalEntry::rgb(7, 7, 7));

        t.add_tint(&pal, 1, 1, PalEntry::WHITE, 100);
        assert_eq!(t.unique_index(), None, "mutation leaves the resolution stale");

        let idx2 = t.update_native(&mut cache);
        assert_eq!(idx2.get(), 2);
        assert_eq!(cache.users(1), 0);
        assert_eq!(cache.users(2), 1);

        t.kill_native();
        assert_eq!(t.unique_index(), None);
        assert_eq!(cache.users(2), 0);
    }

    #[test]
    fn test_update_native_reuses_clean_resolution() {
        let mut cache = UniquePaletteCache::new();
        let mut t = table();
        let a = t.get_unique_index(&mut cache);
        let b = t.get_unique_index(&mut cache);
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_equal_palettes_share_unique_index() {
        let pal = master();
        let mut cache = UniquePaletteCache::new();
        let mut a = table();
        let mut b = table();
        a.add_color_range(&pal, 5, 50, PalEntry::rgb(1, 2, 3), PalEntry::rgb(200, 100, 50));
        b.add_color_range(&pal, 5, 50, PalEntry::rgb(1, 2, 3), PalEntry::rgb(200, 100, 50));
        assert_eq!(a.update_native(&mut cache), b.update_native(&mut cache));
    }

    #[test]
    fn test_clone_drops_native() {
        let mut cache = UniquePaletteCache::new();
        let mut t = table();
        t.update_native(&mut cache);
        let c = t.clone();
        assert_eq!(c.unique_index(), None);
        assert_eq!(cache.users(1), 1);
        assert_eq!(c, t);
    }

    #[test]
    fn test_serde_round_trip() {
        let pal = master();
        let mut cache = UniquePaletteCache::new();
        let mut t = RemapTable::new(&pal, 32);
        t.add_color_range(&pal, 0, 31, PalEntry::rgb(255, 0, 0), PalEntry::rgb(0, 0, 255));
        t.inactive = true;
        t.update_native(&mut cache);

        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("native"));
        let back: RemapTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert!(back.inactive);
        assert_eq!(back.num_entries(), 32);
        assert_eq!(back.unique_index(), None);
    }

    #[test]
    fn test_deserialize_rejects_mismatched_lengths() {
        let json = r##"{"num_entries":2,"remap":[0],"palette":["#00000000","#010101FF"],"inactive":false}"##;
        let err = serde_json::from_str::<RemapTable>(json).unwrap_err();
        assert!(err.to_string().contains("declares 2 entries"));

        let json = r##"{"num_entries":0,"remap":[],"palette":[]}"##;
        assert!(serde_json::from_str::<RemapTable>(json).is_err());
    }
}
