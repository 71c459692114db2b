//! Shader-side color effects
//!
//! [`TextureManipulation`] expresses simple linear color effects (add,
//! modulate, blend, desaturate, invert) as a handful of shader parameters, so
//! the hardware path can apply them without a full remap table.
//!
//! Two alpha bytes carry packed data:
//! - `add_color.a` holds the blend mode in bits 0..=2, the invert flag in
//!   bit 3 and the active flag in bit 4
//! - `modulate_color.a` holds an integer scale factor for the modulate color

use serde::{Deserialize, Serialize};

use crate::color::PalEntry;

/// Mask of the blend mode bits in `add_color.a`.
pub const BLEND_MASK: u8 = 7;
/// Invert flag in `add_color.a`.
pub const INVERT_BIT: u8 = 8;
/// Set by [`TextureManipulation::check_if_enabled`] when any effect is on.
pub const ACTIVE_BIT: u8 = 16;

/// How `blend_color` is combined with the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    None = 0,
    Alpha = 1,
    Screen = 2,
    Overlay = 3,
    HardLight = 4,
}

impl BlendMode {
    /// Decode the low three bits of a flag byte. Values 5..=7 are unused.
    pub fn from_bits(bits: u8) -> Option<BlendMode> {
        match bits & BLEND_MASK {
            0 => Some(BlendMode::None),
            1 => Some(BlendMode::Alpha),
            2 => Some(BlendMode::Screen),
            3 => Some(BlendMode::Overlay),
            4 => Some(BlendMode::HardLight),
            _ => None,
        }
    }
}

/// Uniform values for the texture shader, one `vec4` each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderParams {
    /// Additive RGB in `0..=1`, flag byte in `w`
    pub add: [f32; 4],
    /// Modulate RGB multiplied by the scale factor, scale in `w`
    pub modulate: [f32; 4],
    /// Blend RGB in `0..=1`, blend mode in `w`
    pub blend: [f32; 4],
    /// Desaturation, invert (0/1), active (0/1), unused
    pub desaturation: [f32; 4],
}

/// A bundle of shader color effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureManipulation {
    pub add_color: PalEntry,
    pub modulate_color: PalEntry,
    pub blend_color: PalEntry,
    pub desaturation: f32,
}

impl TextureManipulation {
    /// Modulate color of the no-op state: white, scale 1.
    pub const IDENTITY_MODULATE: PalEntry = PalEntry::rgba(255, 255, 255, 1);

    /// The no-op state.
    pub const fn new() -> Self {
        Self {
            add_color: PalEntry::TRANSPARENT,
            modulate_color: Self::IDENTITY_MODULATE,
            blend_color: PalEntry::TRANSPARENT,
            desaturation: 0.0,
        }
    }

    /// Whether any field differs from the no-op state.
    ///
    /// When it does, the active bit is set in `add_color.a`, so once this
    /// returns `true` it keeps returning `true` until the flags are cleared.
    pub fn check_if_enabled(&mut self) -> bool {
        if self.add_color.to_argb() == 0
            && self.modulate_color == Self::IDENTITY_MODULATE
            && self.desaturation == 0.0
        {
            return false;
        }
        self.add_color.a |= ACTIVE_BIT;
        true
    }

    /// Set the modulate RGB, keeping the scale factor.
    pub fn set_modulate_color(&mut self, rgb: PalEntry) {
        self.modulate_color = rgb.with_alpha(self.modulate_color.a);
    }

    pub fn set_modulate_scale(&mut self, scale: u8) {
        self.modulate_color.a = scale;
    }

    /// Set the additive RGB, keeping the flag byte.
    pub fn set_additive_color(&mut self, rgb: PalEntry) {
        self.add_color = rgb.with_alpha(self.add_color.a);
    }

    pub fn set_blend_color(&mut self, rgb: PalEntry) {
        self.blend_color = rgb;
    }

    /// Clamped to `0..=1`.
    pub fn set_desaturation(&mut self, factor: f64) {
        self.desaturation = factor.clamp(0.0, 1.0) as f32;
    }

    /// Replace the blend mode bits, keeping the other flags.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.add_color.a = (self.add_color.a & !BLEND_MASK) | (mode as u8 & BLEND_MASK);
    }

    pub fn set_invert(&mut self, on: bool) {
        if on {
            self.add_color.a |= INVERT_BIT;
        } else {
            self.add_color.a &= !INVERT_BIT;
        }
    }

    /// Current blend mode; unused mode bits read as `None`.
    pub fn blend_mode(&self) -> BlendMode {
        BlendMode::from_bits(self.add_color.a).unwrap_or_default()
    }

    pub fn is_inverted(&self) -> bool {
        self.add_color.a & INVERT_BIT != 0
    }

    pub fn is_active(&self) -> bool {
        self.add_color.a & ACTIVE_BIT != 0
    }

    pub fn shader_params(&self) -> ShaderParams {
        let unit = |c: u8| c as f32 / 255.0;
        let scale = self.modulate_color.a as f32;
        let flag = |set: bool| if set { 1.0 } else { 0.0 };
        ShaderParams {
            add: [unit(self.add_color.r), unit(self.add_color.g), unit(self.add_color.b), self.add_color.a as f32],
            modulate: [
                unit(self.modulate_color.r) * scale,
                unit(self.modulate_color.g) * scale,
                unit(self.modulate_color.b) * scale,
                scale,
            ],
            blend: [
                unit(self.blend_color.r),
                unit(self.blend_color.g),
                unit(self.blend_color.b),
                self.blend_mode() as u8 as f32,
            ],
            desaturation: [self.desaturation, flag(self.is_inverted()), flag(self.is_active()), 0.0],
        }
    }
}

impl Default for TextureManipulation {
    fn default() -> Self {
        Self::new()
    }
}
