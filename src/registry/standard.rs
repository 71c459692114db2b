//! Built-in translations: the standard ramps and blood recolors.

use super::{Category, RegistryError, TranslationId, TranslationRegistry, MAX_DECORATE_TRANSLATIONS};
use crate::color::PalEntry;
use crate::palettes::{MasterPalette, PALETTE_SIZE};
use crate::remap::RemapTable;

/// `Standard` slot of the ice translation.
pub const STD_ICE: u16 = 7;
/// `Standard` slot of the gray ramp.
pub const STD_GRAY: u16 = 8;
/// `Standard` slot of the grayscale (luminance) translation.
pub const STD_GRAYSCALE: u16 = 9;

/// Bluish gray ramp used for frozen actors, darkest first.
pub const ICE_PALETTE: [PalEntry; 16] = [
    PalEntry::rgb(10, 8, 18),
    PalEntry::rgb(15, 15, 26),
    PalEntry::rgb(20, 16, 36),
    PalEntry::rgb(30, 26, 46),
    PalEntry::rgb(40, 36, 57),
    PalEntry::rgb(50, 46, 67),
    PalEntry::rgb(59, 57, 78),
    PalEntry::rgb(69, 67, 88),
    PalEntry::rgb(79, 77, 99),
    PalEntry::rgb(89, 87, 109),
    PalEntry::rgb(99, 97, 120),
    PalEntry::rgb(109, 107, 130),
    PalEntry::rgb(118, 118, 141),
    PalEntry::rgb(128, 128, 151),
    PalEntry::rgb(138, 138, 162),
    PalEntry::rgb(148, 148, 172),
];

impl TranslationRegistry {
    /// Build the ice, gray and grayscale tables into their `Standard` slots.
    /// Slots below 7 are left for callers.
    pub fn init_standard(&mut self, master: &MasterPalette) -> Result<(), RegistryError> {
        self.store(Category::Standard, STD_ICE, ice_table(master))?;
        self.store(Category::Standard, STD_GRAY, gray_table(master))?;
        self.store(Category::Standard, STD_GRAYSCALE, grayscale_table(master))?;
        tracing::debug!("standard translations ready");
        Ok(())
    }

    /// Translation that tints the master palette towards a blood `color`.
    ///
    /// Each distinct RGB gets one `Blood` slot; asking again for the same RGB
    /// returns the existing identifier. Slot 0 is never used.
    pub fn create_blood_translation(
        &mut self,
        master: &MasterPalette,
        color: PalEntry,
    ) -> Result<TranslationId, RegistryError> {
        if self.blood_colors.is_empty() {
            self.blood_colors.push(None);
        }
        if let Some(slot) =
            self.blood_colors.iter().skip(1).position(|c| matches!(c, Some(c) if c.same_rgb(color)))
        {
            return Ok(TranslationId::new(Category::Blood, slot as u16 + 1));
        }

        let slot = self.blood_colors.len().max(self.len(Category::Blood));
        if slot >= MAX_DECORATE_TRANSLATIONS {
            return Err(RegistryError::Full { category: Category::Blood, limit: MAX_DECORATE_TRANSLATIONS });
        }
        let id = self.store(Category::Blood, slot as u16, blood_table(master, color))?;
        self.blood_colors.resize(slot, None);
        self.blood_colors.push(Some(color));
        tracing::debug!(%color, %id, "blood translation added");
        Ok(id)
    }
}

fn ice_table(master: &MasterPalette) -> RemapTable {
    let picks: Vec<u8> = ICE_PALETTE.iter().map(|&c| master.nearest_entry(c)).collect();
    let mut table = RemapTable::new(master, PALETTE_SIZE);
    for i in 1..PALETTE_SIZE {
        let v = (master.color(i as u8).weighted_intensity() >> 12) as usize;
        table.set_entry(i, picks[v], ICE_PALETTE[v]);
    }
    table
}

fn gray_table(master: &MasterPalette) -> RemapTable {
    let mut table = RemapTable::new(master, PALETTE_SIZE);
    for i in 1..PALETTE_SIZE {
        let v = i as u8;
        table.set_entry(i, master.nearest(v, v, v), PalEntry::rgb(v, v, v));
    }
    table
}

fn grayscale_table(master: &MasterPalette) -> RemapTable {
    let mut table = RemapTable::new(master, PALETTE_SIZE);
    for i in 1..PALETTE_SIZE {
        let v = (master.color(i as u8).weighted_intensity() >> 8) as u8;
        table.set_entry(i, master.nearest(v, v, v), PalEntry::rgb(v, v, v));
    }
    table
}

fn blood_table(master: &MasterPalette, color: PalEntry) -> RemapTable {
    let mut table = RemapTable::new(master, PALETTE_SIZE);
    for i in 1..PALETTE_SIZE {
        let src = master.color(i as u8);
        let bright = src.r.max(src.g).max(src.b) as u32;
        let scale = |c: u8| (c as u32 * bright / 255) as u8;
        let entry = PalEntry::rgb(scale(color.r), scale(color.g), scale(color.b));
        table.set_entry(i, master.nearest_entry(entry), entry);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_standard_fills_slots() {
        let master = MasterPalette::default();
        let mut registry = TranslationRegistry::new();
        registry.init_standard(&master).unwrap();
        assert_eq!(registry.len(Category::Standard), 10);
        for slot in 0..STD_ICE {
            assert!(registry.get(Category::Standard, slot).is_none());
        }
        for slot in [STD_ICE, STD_GRAY, STD_GRAYSCALE] {
            let table = registry.get(Category::Standard, slot).unwrap();
            assert_eq!(table.palette()[0].a, 0);
        }
    }

    #[test]
    fn test_ice_uses_ramp() {
        let master = MasterPalette::default();
        let table = ice_table(&master);
        // grayscale master: (77+143+37) * 255 >> 12 == 15
        assert_eq!(table.palette()[255], ICE_PALETTE[15]);
        assert_eq!(table.palette()[1], ICE_PALETTE[0]);
        assert_eq!(table.palette()[128], ICE_PALETTE[8]);
    }

    #[test]
    fn test_gray_ramp_on_grayscale_is_identity() {
        let master = MasterPalette::default();
        let table = gray_table(&master);
        assert!(table.is_identity());
        assert_eq!(table.palette()[200], PalEntry::rgb(200, 200, 200));
    }

    #[test]
    fn test_grayscale_luminance() {
        let mut colors = [PalEntry::BLACK; PALETTE_SIZE];
        colors[1] = PalEntry::rgb(255, 0, 0);
        colors[2] = PalEntry::rgb(0, 255, 0);
        let master = MasterPalette::new(colors);
        let table = grayscale_table(&master);
        // 77 * 255 >> 8 == 76, 143 * 255 >> 8 == 142
        assert_eq!(table.palette()[1], PalEntry::rgb(76, 76, 76));
        assert_eq!(table.palette()[2], PalEntry::rgb(142, 142, 142));
        assert_eq!(table.palette()[3], PalEntry::BLACK);
    }

    #[test]
    fn test_blood_translation_reuses_rgb() {
        let master = MasterPalette::default();
        let mut registry = TranslationRegistry::new();
        let red = registry.create_blood_translation(&master, PalEntry::rgb(200, 0, 0)).unwrap();
        let green = registry.create_blood_translation(&master, PalEntry::rgb(0, 200, 0)).unwrap();
        let again = registry.create_blood_translation(&master, PalEntry::rgba(200, 0, 0, 10)).unwrap();

        assert_eq!(red.decode(), Ok((Category::Blood, 1)));
        assert_eq!(green.index(), 2);
        assert_eq!(again, red);
        assert!(registry.get(Category::Blood, 0).is_none());
    }

    #[test]
    fn test_blood_scales_by_brightness() {
        let master = MasterPalette::default();
        let table = blood_table(&master, PalEntry::rgb(200, 100, 0));
        assert_eq!(table.palette()[255], PalEntry::rgb(200, 100, 0));
        // 200 * 51 / 255 == 40, 100 * 51 / 255 == 20
        assert_eq!(table.palette()[51], PalEntry::rgb(40, 20, 0));
        assert_eq!(table.palette()[0].a, 0);
    }
}
