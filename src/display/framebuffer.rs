// Color Buffer - Converted frame ready for the V5 display
//
// The engine renders 256×240 palette indices (0-63, possibly with flag bits
// above). Every frame those indices are translated through the palette lookup
// table into packed display colors, then handed to the blitter.

use super::palette::PaletteLut;
use std::collections::TryReserveError;

/// NES screen width in pixels
pub const SCREEN_WIDTH: usize = 256;

/// NES screen height in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// Total number of pixels in a frame
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Converted color buffer
///
/// Holds one packed 0xAARRGGBB value per pixel. Allocated once before the
/// frame loop and overwritten in place every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl ColorBuffer {
    /// Allocate a zeroed buffer of `width × height` pixels
    ///
    /// # Returns
    /// The buffer, or the allocator's error if the memory is not available.
    /// The allocation is fallible so the frame loop can report it instead of
    /// aborting.
    pub fn try_new(width: usize, height: usize) -> Result<Self, TryReserveError> {
        // An overflowing size fails the reservation below
        let len = width.checked_mul(height).unwrap_or(usize::MAX);
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, 0);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Allocate a buffer sized for one NES frame
    pub fn try_for_screen() -> Result<Self, TryReserveError> {
        Self::try_new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get the color at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width + x]
    }

    /// Get the packed colors in row-major order
    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    /// Get mutable access to the packed colors
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Overwrite this buffer with the conversion of an indexed frame
    ///
    /// # Panics
    /// Panics if `indexed` does not hold exactly one index per pixel
    pub fn convert_from(&mut self, indexed: &[u8], lut: &PaletteLut) {
        convert_frame(indexed, lut, &mut self.pixels);
    }
}

/// Convert palette indices to display colors
///
/// Writes `output[i] = lut.lookup(indexed[i])` for every position. The scan
/// handles four pixels per step and finishes any tail one pixel at a time,
/// so lengths that are zero or not a multiple of four are fine.
///
/// # Arguments
/// * `indexed` - Palette indices produced by the engine
/// * `lut` - Palette lookup table
/// * `output` - Destination, same length as `indexed`
///
/// # Panics
/// Panics if the two slices differ in length
///
/// # Example
/// ```
/// use nes_v5::display::{convert_frame, Color, PaletteLut};
///
/// let lut = PaletteLut::from_fn(|index| Color::new(index, index, index, 0xFF));
/// let mut output = [0u32; 3];
/// convert_frame(&[0x01, 0x41, 0xFF], &lut, &mut output);
///
/// assert_eq!(output, [0xFF01_0101, 0xFF01_0101, 0xFF3F_3F3F]);
/// ```
pub fn convert_frame(indexed: &[u8], lut: &PaletteLut, output: &mut [u32]) {
    assert_eq!(
        indexed.len(),
        output.len(),
        "Indexed frame and color buffer must hold the same number of pixels"
    );

    let mut src = indexed.chunks_exact(4);
    let mut dst = output.chunks_exact_mut(4);

    for (s, d) in (&mut src).zip(&mut dst) {
        d[0] = lut.lookup(s[0]);
        d[1] = lut.lookup(s[1]);
        d[2] = lut.lookup(s[2]);
        d[3] = lut.lookup(s[3]);
    }

    for (s, d) in src.remainder().iter().zip(dst.into_remainder()) {
        *d = lut.lookup(*s);
    }
}
