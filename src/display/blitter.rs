// Blitter - Transfers converted frames to the physical screen
//
// The V5 display is 480 pixels wide while an NES frame is 256, so frames
// are placed 112 pixels from the left edge to sit centered. The normal path
// is one rectangular block copy per frame; the per-pixel path drives the
// pen and pixel primitives instead.

use super::framebuffer::ColorBuffer;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Physical display width of the V5 brain
pub const PHYSICAL_WIDTH: usize = 480;

/// Physical display height of the V5 brain
pub const PHYSICAL_HEIGHT: usize = 272;

/// Horizontal offset that centers an NES frame on the physical display
pub const DEFAULT_X_OFFSET: i16 = 112;

/// Display driver primitives
///
/// Calls are synchronous and infallible from the frame loop's point of view.
pub trait Screen {
    /// Select the color used by subsequent `draw_pixel` calls
    fn set_pen(&mut self, color: u32);

    /// Plot one pixel in the current pen color
    fn draw_pixel(&mut self, x: i16, y: i16);

    /// Copy a rectangle of packed colors to the screen
    ///
    /// The rectangle spans `x0..=x1` and `y0..=y1`; row `r` of the source
    /// starts at `pixels[r * stride]`.
    fn copy_block(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, pixels: &[u32], stride: usize);
}

impl<S: Screen + ?Sized> Screen for Rc<RefCell<S>> {
    fn set_pen(&mut self, color: u32) {
        self.borrow_mut().set_pen(color);
    }

    fn draw_pixel(&mut self, x: i16, y: i16) {
        self.borrow_mut().draw_pixel(x, y);
    }

    fn copy_block(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, pixels: &[u32], stride: usize) {
        self.borrow_mut().copy_block(x0, y0, x1, y1, pixels, stride);
    }
}

/// How a frame reaches the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlitMode {
    /// One block copy per frame
    #[default]
    Block,
    /// One pen change per color run and one plot per pixel
    PerPixel,
}

/// Frame blitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blitter {
    x_offset: i16,
    y_offset: i16,
    mode: BlitMode,
}

impl Blitter {
    /// Create a block blitter placing frames at `x_offset`, top edge
    pub fn new(x_offset: i16) -> Self {
        Self {
            x_offset,
            y_offset: 0,
            mode: BlitMode::Block,
        }
    }

    /// Set the transfer mode
    pub fn with_mode(mut self, mode: BlitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn x_offset(&self) -> i16 {
        self.x_offset
    }

    pub fn mode(&self) -> BlitMode {
        self.mode
    }

    /// Transfer a converted frame to the screen
    pub fn blit(&self, screen: &mut dyn Screen, frame: &ColorBuffer) {
        if frame.is_empty() {
            return;
        }

        match self.mode {
            BlitMode::Block => self.blit_block(screen, frame),
            BlitMode::PerPixel => self.blit_per_pixel(screen, frame),
        }
    }

    fn blit_block(&self, screen: &mut dyn Screen, frame: &ColorBuffer) {
        let x1 = shifted(self.x_offset, frame.width()).saturating_sub(1);
        let y1 = shifted(self.y_offset, frame.height()).saturating_sub(1);
        screen.copy_block(
            self.x_offset,
            self.y_offset,
            x1,
            y1,
            frame.as_slice(),
            frame.width(),
        );
    }

    fn blit_per_pixel(&self, screen: &mut dyn Screen, frame: &ColorBuffer) {
        let mut pen = None;
        for (row, colors) in frame.as_slice().chunks_exact(frame.width()).enumerate() {
            for (col, &color) in colors.iter().enumerate() {
                if pen != Some(color) {
                    screen.set_pen(color);
                    pen = Some(color);
                }
                screen.draw_pixel(shifted(self.x_offset, col), shifted(self.y_offset, row));
            }
        }
    }
}

/// `start + delta` in screen coordinates, saturating at the `i16` range
fn shifted(start: i16, delta: usize) -> i16 {
    start.saturating_add(i16::try_from(delta).unwrap_or(i16::MAX))
}

impl Default for Blitter {
    fn default() -> Self {
        Self::new(DEFAULT_X_OFFSET)
    }
}
