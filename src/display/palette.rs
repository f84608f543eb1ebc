// Palette Lookup - Pre-converted colors for the engine's 64-entry palette
//
// The emulation engine reports its master palette one entry at a time as an
// RGBA quadruple. The V5 display wants packed 0xAARRGGBB words, so the whole
// palette is converted once before the frame loop starts and every pixel after
// that is a single table read.

use crate::emulator::Engine;

/// Number of entries in the NES master palette
pub const PALETTE_SIZE: usize = 64;

/// Mask selecting the palette bits of an indexed pixel
///
/// Engines are free to carry flags in the upper two bits of a pixel, so every
/// index is masked before it touches the table.
pub const PALETTE_MASK: u8 = 0x3F;

/// A color as reported by the emulation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a color from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from a 0xRRGGBB value
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 0xFF,
        }
    }

    /// Pack into the display's native 0xAARRGGBB encoding
    #[inline]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Palette lookup table
///
/// Maps an indexed pixel to a display color. Built once, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteLut {
    colors: [u32; PALETTE_SIZE],
}

impl PaletteLut {
    /// Build the table by asking `color_of` for every palette index 0-63
    ///
    /// # Arguments
    /// * `color_of` - Palette accessor, called exactly once per index
    pub fn from_fn<F>(mut color_of: F) -> Self
    where
        F: FnMut(u8) -> Color,
    {
        let mut colors = [0u32; PALETTE_SIZE];
        for (index, slot) in colors.iter_mut().enumerate() {
            *slot = color_of(index as u8).to_argb();
        }
        Self { colors }
    }

    /// Build the table from an engine's palette accessor
    pub fn for_engine<E: Engine>() -> Self {
        Self::from_fn(E::palette_color)
    }

    /// Wrap already-packed 0xAARRGGBB values
    pub const fn from_colors(colors: [u32; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    /// Look up the display color for an indexed pixel
    ///
    /// Bits above the low six are ignored, so `0xFF` resolves like `0x3F`.
    #[inline]
    pub fn lookup(&self, index: u8) -> u32 {
        self.colors[(index & PALETTE_MASK) as usize]
    }

    /// Get the packed colors
    pub fn as_array(&self) -> &[u32; PALETTE_SIZE] {
        &self.colors
    }
}

/// Unpack a 0xAARRGGBB display color into [R, G, B, A] bytes
///
/// Used by the desktop simulator, whose surface expects byte-ordered RGBA.
#[inline]
pub fn argb_to_rgba(argb: u32) -> [u8; 4] {
    [
        ((argb >> 16) & 0xFF) as u8, // Red
        ((argb >> 8) & 0xFF) as u8,  // Green
        (argb & 0xFF) as u8,         // Blue
        ((argb >> 24) & 0xFF) as u8, // Alpha
    ]
}
