//! Translation categories and packed translation identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::RegistryError;

/// Bit position of the category inside a packed identifier.
pub const TRANSLATION_SHIFT: u32 = 16;
/// Mask of the slot index bits.
pub const TRANSLATION_MASK: u32 = (1 << TRANSLATION_SHIFT) - 1;
/// Mask of the category bits.
pub const TRANSLATIONTYPE_MASK: u32 = 0xFF << TRANSLATION_SHIFT;
/// Bits 31..24, always zero in a valid identifier.
const RESERVED_MASK: u32 = !(TRANSLATIONTYPE_MASK | TRANSLATION_MASK);

/// Slot cap for script-allocated (`LevelScripted`) translations.
pub const MAX_ACS_TRANSLATIONS: usize = 65535;
/// Slot cap for definition-allocated (`Decorate`, `Blood`) translations.
pub const MAX_DECORATE_TRANSLATIONS: usize = 65535;

/// Translation category. Each owns one slot array in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Category {
    /// Reserved, never populated
    Invalid = 0,
    Players = 1,
    PlayersExtra = 2,
    Standard = 3,
    LevelScripted = 4,
    Decals = 5,
    PlayerCorpses = 6,
    Decorate = 7,
    Blood = 8,
    RainPillar = 9,
    Custom = 10,
    Font = 11,
}

/// Number of categories, `Invalid` included.
pub const NUM_CATEGORIES: usize = 12;

impl Category {
    pub const ALL: [Category; NUM_CATEGORIES] = [
        Category::Invalid,
        Category::Players,
        Category::PlayersExtra,
        Category::Standard,
        Category::LevelScripted,
        Category::Decals,
        Category::PlayerCorpses,
        Category::Decorate,
        Category::Blood,
        Category::RainPillar,
        Category::Custom,
        Category::Font,
    ];

    pub fn from_u8(v: u8) -> Option<Category> {
        Self::ALL.get(v as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Invalid => "invalid",
            Category::Players => "players",
            Category::PlayersExtra => "players_extra",
            Category::Standard => "standard",
            Category::LevelScripted => "level_scripted",
            Category::Decals => "decals",
            Category::PlayerCorpses => "player_corpses",
            Category::Decorate => "decorate",
            Category::Blood => "blood",
            Category::RainPillar => "rain_pillar",
            Category::Custom => "custom",
            Category::Font => "font",
        }
    }

    /// Parse the snake_case name used in config files.
    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Category {
    type Error = RegistryError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Category::from_u8(v).ok_or(RegistryError::UnknownCategory(v))
    }
}

/// Packed translation identifier: bits 23..16 category, bits 15..0 slot.
///
/// Identifier 0 (category `Invalid`, slot 0) means "no translation".
///
/// ```
/// use palremap::registry::{Category, TranslationId};
///
/// let id = TranslationId::new(Category::Custom, 3);
/// assert_eq!(id.raw(), 0x000A_0003);
/// assert_eq!(id.category(), Some(Category::Custom));
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationId(u32);

impl TranslationId {
    pub const NONE: TranslationId = TranslationId(0);

    pub const fn new(category: Category, index: u16) -> Self {
        Self((category as u32) << TRANSLATION_SHIFT | index as u32)
    }

    /// Wrap a raw value as read from outside (saved games, scripts).
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The category byte, whether or not it names a known category.
    pub const fn category_bits(self) -> u8 {
        ((self.0 & TRANSLATIONTYPE_MASK) >> TRANSLATION_SHIFT) as u8
    }

    /// The category, or `None` for an unknown category byte or any of bits
    /// 31..24 set.
    pub fn category(self) -> Option<Category> {
        if !self.is_well_formed() {
            return None;
        }
        Category::from_u8(self.category_bits())
    }

    pub const fn index(self) -> u16 {
        (self.0 & TRANSLATION_MASK) as u16
    }

    /// True when bits 31..24 are clear.
    pub const fn is_well_formed(self) -> bool {
        self.0 & RESERVED_MASK == 0
    }

    /// Split into category and slot, failing on stray high bits or an
    /// unknown category byte.
    pub fn decode(self) -> Result<(Category, u16), RegistryError> {
        if !self.is_well_formed() {
            return Err(RegistryError::BadIdentifier(self.0));
        }
        let category = Category::try_from(self.category_bits())?;
        Ok((category, self.index()))
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TranslationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category() {
            Some(c) => write!(f, "{}/{}", c, self.index()),
            None if !self.is_well_formed() => write!(f, "#{:08X}", self.0),
            None => write!(f, "#{}/{}", self.category_bits(), self.index()),
        }
    }
}

impl From<TranslationId> for u32 {
    fn from(id: TranslationId) -> u32 {
        id.0
    }
}
