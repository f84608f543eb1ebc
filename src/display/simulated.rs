// Simulated Screen - In-memory stand-in for the V5 display
//
// Behaves like the display driver: a 480×272 surface of packed 0xAARRGGBB
// pixels with a pen, single-pixel plots and clipped block copies. The desktop
// simulator renders it to a window; tests read it back directly.

use super::blitter::{Screen, PHYSICAL_HEIGHT, PHYSICAL_WIDTH};

/// Simulated V5 display surface
#[derive(Debug, Clone)]
pub struct SimulatedScreen {
    pixels: Vec<u32>,
    pen: u32,
    /// Number of `copy_block` calls received
    block_copies: u64,
}

impl SimulatedScreen {
    /// Create a black screen
    pub fn new() -> Self {
        Self {
            pixels: vec![0; PHYSICAL_WIDTH * PHYSICAL_HEIGHT],
            pen: 0,
            block_copies: 0,
        }
    }

    pub fn width(&self) -> usize {
        PHYSICAL_WIDTH
    }

    pub fn height(&self) -> usize {
        PHYSICAL_HEIGHT
    }

    /// Get the color at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        assert!(x < PHYSICAL_WIDTH, "X coordinate {} out of bounds", x);
        assert!(y < PHYSICAL_HEIGHT, "Y coordinate {} out of bounds", y);

        self.pixels[y * PHYSICAL_WIDTH + x]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    pub fn block_copies(&self) -> u64 {
        self.block_copies
    }

    /// Clear the whole surface to one color
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn in_bounds(x: i32, y: i32) -> bool {
        (0..PHYSICAL_WIDTH as i32).contains(&x) && (0..PHYSICAL_HEIGHT as i32).contains(&y)
    }
}

impl Default for SimulatedScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for SimulatedScreen {
    fn set_pen(&mut self, color: u32) {
        self.pen = color;
    }

    fn draw_pixel(&mut self, x: i16, y: i16) {
        let (x, y) = (x as i32, y as i32);
        if Self::in_bounds(x, y) {
            self.pixels[y as usize * PHYSICAL_WIDTH + x as usize] = self.pen;
        }
    }

    fn copy_block(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, pixels: &[u32], stride: usize) {
        self.block_copies += 1;

        for (row, y) in (y0 as i32..=y1 as i32).enumerate() {
            for (col, x) in (x0 as i32..=x1 as i32).enumerate() {
                let Some(&color) = pixels.get(row * stride + col) else {
                    return;
                };
                if Self::in_bounds(x, y) {
                    self.pixels[y as usize * PHYSICAL_WIDTH + x as usize] = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_pixel_uses_pen() {
        let mut screen = SimulatedScreen::new();
        screen.set_pen(0xFF12_3456);
        screen.draw_pixel(3, 4);

        assert_eq!(screen.get_pixel(3, 4), 0xFF12_3456);
        assert_eq!(screen.get_pixel(4, 3), 0);
    }

    #[test]
    fn test_draw_pixel_clips() {
        let mut screen = SimulatedScreen::new();
        screen.set_pen(1);
        screen.draw_pixel(-1, 0);
        screen.draw_pixel(480, 0);
        screen.draw_pixel(0, 272);

        assert!(screen.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_copy_block_respects_stride() {
        let mut screen = SimulatedScreen::new();
        // 2×2 block taken out of a 3-wide source
        let source = [1, 2, 9, 3, 4, 9];
        screen.copy_block(10, 20, 11, 21, &source, 3);

        assert_eq!(screen.get_pixel(10, 20), 1);
        assert_eq!(screen.get_pixel(11, 20), 2);
        assert_eq!(screen.get_pixel(10, 21), 3);
        assert_eq!(screen.get_pixel(11, 21), 4);
        assert_eq!(screen.get_pixel(12, 20), 0);
        assert_eq!(screen.block_copies(), 1);
    }

    #[test]
    fn test_copy_block_clips_right_edge() {
        let mut screen = SimulatedScreen::new();
        let source = [7u32; 4];
        screen.copy_block(478, 0, 481, 0, &source, 4);

        assert_eq!(screen.get_pixel(478, 0), 7);
        assert_eq!(screen.get_pixel(479, 0), 7);
    }
}
