// Display module - Everything between the engine's indexed frame and the screen
//
// This module provides:
// - Palette lookup table (64 engine colors pre-packed for the display)
// - Color buffer and the indexed-to-color frame converter
// - Blitter and the display driver trait
// - Operator text channel
// - Simulated V5 screen, and a desktop window for it (feature `simulator`)

pub mod blitter;
pub mod framebuffer;
pub mod palette;
pub mod simulated;
pub mod text;
#[cfg(feature = "simulator")]
pub mod window;

pub use blitter::{BlitMode, Blitter, Screen, DEFAULT_X_OFFSET, PHYSICAL_HEIGHT, PHYSICAL_WIDTH};
pub use framebuffer::{convert_frame, ColorBuffer, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
pub use palette::{argb_to_rgba, Color, PaletteLut, PALETTE_MASK, PALETTE_SIZE};
pub use simulated::SimulatedScreen;
pub use text::{print, TextBuffer, TextDisplay};
#[cfg(feature = "simulator")]
pub use window::{run_simulator, SimulatorApp, WindowConfig};
