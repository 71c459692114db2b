//! Unique palette cache
//!
//! Many independently built translations end up with bit-identical output
//! colors. The cache stores each distinct 256-entry palette once, so texture
//! data derived from a palette only has to be generated once per unique
//! palette rather than once per table.
//!
//! Entries are content addressed: a CRC-32 of the colors selects candidates,
//! a full comparison confirms the match. The cache is append-only; indices
//! are 1-based and stay valid until [`UniquePaletteCache::clear`].

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use std::rc::Rc;

use crate::color::PalEntry;
use crate::palettes::PALETTE_SIZE;

/// 1-based index of an entry in a [`UniquePaletteCache`].
pub type UniqueIndex = NonZeroU32;

#[derive(Debug)]
struct UniquePalette {
    crc32: u32,
    colors: [PalEntry; PALETTE_SIZE],
}

/// A table's handle on its resolved cache entry.
///
/// Holding a handle keeps the entry's user count up; dropping it (with the
/// table that owns it) releases the reference.
#[derive(Clone)]
pub struct NativePalette {
    index: UniqueIndex,
    generation: u32,
    entry: Rc<UniquePalette>,
}

impl NativePalette {
    pub fn index(&self) -> UniqueIndex {
        self.index
    }

    pub fn colors(&self) -> &[PalEntry; PALETTE_SIZE] {
        &self.entry.colors
    }

    pub fn crc32(&self) -> u32 {
        self.entry.crc32
    }
}

impl fmt::Debug for NativePalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativePalette")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .field("crc32", &format_args!("{:08x}", self.entry.crc32))
            .finish()
    }
}

/// Content-addressed store of resolved 256-entry palettes.
#[derive(Debug, Default)]
pub struct UniquePaletteCache {
    entries: Vec<Rc<UniquePalette>>,
    by_crc: HashMap<u32, Vec<usize>>,
    generation: u32,
}

impl UniquePaletteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or add the entry for `palette`.
    ///
    /// Palettes shorter than 256 entries are padded with transparent black,
    /// so a short table and a 256-entry table with the same leading colors
    /// and an all-zero tail share an entry.
    pub fn resolve(&mut self, palette: &[PalEntry]) -> NativePalette {
        let colors = pad_palette(palette);
        let crc32 = checksum(&colors);

        if let Some(candidates) = self.by_crc.get(&crc32) {
            for &slot in candidates {
                let entry = &self.entries[slot];
                if entry.colors == colors {
                    tracing::debug!(index = slot + 1, crc32, "unique palette hit");
                    return self.handle(slot);
                }
            }
        }

        let slot = self.entries.len();
        self.entries.push(Rc::new(UniquePalette { crc32, colors }));
        self.by_crc.entry(crc32).or_default().push(slot);
        tracing::debug!(index = slot + 1, crc32, "unique palette added");
        self.handle(slot)
    }

    fn handle(&self, slot: usize) -> NativePalette {
        NativePalette {
            index: to_index(slot),
            generation: self.generation,
            entry: Rc::clone(&self.entries[slot]),
        }
    }

    /// Colors of the entry at a 1-based `index`.
    ///
    /// Returns `None` for 0 or an index past the end; callers treat that as
    /// "no remapping".
    pub fn lookup(&self, index: u32) -> Option<&[PalEntry; PALETTE_SIZE]> {
        let slot = (index as usize).checked_sub(1)?;
        self.entries.get(slot).map(|e| &e.colors)
    }

    /// Number of live table handles referring to the entry at `index`.
    pub fn users(&self, index: u32) -> usize {
        let Some(slot) = (index as usize).checked_sub(1) else {
            return 0;
        };
        self.entries.get(slot).map(|e| Rc::strong_count(e) - 1).unwrap_or(0)
    }

    /// Whether `native` was issued by this cache since its last clear.
    pub fn is_current(&self, native: &NativePalette) -> bool {
        native.generation == self.generation
            && self.entries.get(native.index.get() as usize - 1).is_some_and(|e| Rc::ptr_eq(e, &native.entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    ///
    /// Handles issued before the clear no longer count as current; tables
    /// re-resolve on their next update.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_crc.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Copy a palette into a zero-padded 256-entry array.
pub fn pad_palette(palette: &[PalEntry]) -> [PalEntry; PALETTE_SIZE] {
    let mut colors = [PalEntry::TRANSPARENT; PALETTE_SIZE];
    for (dst, src) in colors.iter_mut().zip(palette) {
        *dst = *src;
    }
    colors
}

/// CRC-32 over the colors in `[r, g, b, a]` byte order.
pub fn checksum(colors: &[PalEntry; PALETTE_SIZE]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for c in colors {
        hasher.update(&c.to_bytes());
    }
    hasher.finalize()
}

fn to_index(slot: usize) -> UniqueIndex {
    // slot + 1 is never zero
    NonZeroU32::new(slot as u32 + 1).unwrap_or(NonZeroU32::MIN)
}
