//! Master (reference) palette.
//!
//! Every translation table maps source indices onto colors of one fixed
//! 256-entry palette. Software rendering needs an index into that palette for
//! any generated color, so [`MasterPalette::nearest`] is the color matcher all
//! table primitives go through.
//!
//! Palettes come from a built-in definition ([`builtin`]) or are loaded from
//! disk ([`loader`]).

pub mod builtin;
pub mod loader;

use crate::color::PalEntry;

pub use builtin::{get_builtin, list_builtins};
pub use loader::{load_palette, PaletteLoadError};

/// Number of entries in a master palette.
pub const PALETTE_SIZE: usize = 256;

/// The fixed 256-color palette translation tables are expressed against.
///
/// Colors are stored opaque; the transparency of slot 0 is a property of the
/// tables, not of the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPalette {
    colors: [PalEntry; PALETTE_SIZE],
}

impl MasterPalette {
    /// Build a palette from exactly 256 colors. Alpha is forced to opaque.
    pub fn new(colors: [PalEntry; PALETTE_SIZE]) -> Self {
        Self { colors: colors.map(|c| c.with_alpha(255)) }
    }

    /// Build a palette from up to 256 colors; missing entries are black.
    pub fn from_colors(colors: &[PalEntry]) -> Self {
        let mut all = [PalEntry::BLACK; PALETTE_SIZE];
        for (dst, src) in all.iter_mut().zip(colors) {
            *dst = *src;
        }
        Self::new(all)
    }

    /// Build a palette from packed RGB triples (the layout of a `PLAYPAL` lump).
    ///
    /// Only the first 256 triples are used; a short buffer leaves the
    /// remaining entries black.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Self {
        let colors: Vec<PalEntry> =
            bytes.chunks_exact(3).take(PALETTE_SIZE).map(|c| PalEntry::rgb(c[0], c[1], c[2])).collect();
        Self::from_colors(&colors)
    }

    /// Color at `index`.
    #[inline]
    pub fn color(&self, index: u8) -> PalEntry {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[PalEntry; PALETTE_SIZE] {
        &self.colors
    }

    /// Index of the palette color closest to `(r, g, b)`.
    ///
    /// Distance is the sum of squared per-channel differences; on a tie the
    /// lowest index wins.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> u8 {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;

        for (i, c) in self.colors.iter().enumerate() {
            let dr = c.r as i32 - r as i32;
            let dg = c.g as i32 - g as i32;
            let db = c.b as i32 - b as i32;
            let dist = (dr * dr + dg * dg + db * db) as u32;
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }

        best as u8
    }

    /// [`nearest`](Self::nearest) for a palette entry, ignoring its alpha.
    pub fn nearest_entry(&self, pe: PalEntry) -> u8 {
        self.nearest(pe.r, pe.g, pe.b)
    }
}

impl Default for MasterPalette {
    /// The `grayscale` built-in.
    fn default() -> Self {
        builtin::grayscale()
    }
}
