// Engine contract - The narrow interface to the third-party emulation engine
//
// The frame loop never looks inside the engine. It loads an iNES image once,
// then per frame hands over the input state, advances one frame and reads
// back the indexed screen. Destroying the engine is dropping it.

use crate::display::Color;
use crate::input::InputState;

/// NES emulation engine
pub trait Engine {
    /// Load an iNES image
    ///
    /// The engine keeps its own copy of whatever it needs; `data` is released
    /// by the caller afterwards.
    ///
    /// # Returns
    /// `false` if the engine rejects the image (bad header, unsupported
    /// mapper, truncated data)
    fn load(&mut self, data: &[u8]) -> bool;

    /// Set the controller state consumed by the next frame
    fn set_input(&mut self, input: &InputState);

    /// Run the emulation until the next frame is complete
    fn next_frame(&mut self);

    /// Indexed screen of the last completed frame
    ///
    /// One palette index per pixel, 256×240, row-major. Bits above the low
    /// six are not part of the color.
    fn screen_buffer(&self) -> &[u8];

    /// Color of master palette entry `index` (0-63)
    fn palette_color(index: u8) -> Color
    where
        Self: Sized;
}
