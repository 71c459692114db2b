//! Built-in master palette definitions.
//!
//! Referenced by name from the command line or `palremap.toml`
//! (`source = "grayscale"`).

use super::{MasterPalette, PALETTE_SIZE};
use crate::color::PalEntry;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["grayscale", "rgb332"];

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<MasterPalette> {
    match name {
        "grayscale" => Some(grayscale()),
        "rgb332" => Some(rgb332()),
        _ => None,
    }
}

/// 256-step gray ramp, entry `i` is `(i, i, i)`.
pub(crate) fn grayscale() -> MasterPalette {
    let mut colors = [PalEntry::BLACK; PALETTE_SIZE];
    for (i, c) in colors.iter_mut().enumerate() {
        *c = PalEntry::rgb(i as u8, i as u8, i as u8);
    }
    MasterPalette::new(colors)
}

/// 3-3-2 bit color cube: `RRRGGGBB`.
fn rgb332() -> MasterPalette {
    let mut colors = [PalEntry::BLACK; PALETTE_SIZE];
    for (i, c) in colors.iter_mut().enumerate() {
        let r = ((i >> 5) & 7) * 255 / 7;
        let g = ((i >> 2) & 7) * 255 / 7;
        let b = (i & 3) * 255 / 3;
        *c = PalEntry::rgb(r as u8, g as u8, b as u8);
    }
    MasterPalette::new(colors)
}
