// Test pattern engine - Stand-in engine for running the pipeline on a desktop
//
// Accepts any image with an iNES header and renders a scrolling palette
// chart with a cursor block the D-pad moves around. Cursor pixels carry flag
// bits above the palette index, like sprite pixels from a real engine do.

use super::Engine;
use crate::cartridge::{INES_HEADER_SIZE, INES_MAGIC};
use crate::display::{Color, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
use crate::input::InputState;

/// NES master palette in RGB format (64 colors)
///
/// Each color is represented as a 32-bit value: 0xRRGGBB
/// The palette uses a standard RGB conversion that approximates the NTSC NES output.
pub const NES_PALETTE: [u32; 64] = [
    // $00-$0F
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00,
    0x333500, 0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000,
    // $10-$1F
    0xADADAD, 0x155FD9, 0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00,
    0x6B6D00, 0x388700, 0x0C9300, 0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000,
    // $20-$2F
    0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF, 0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22,
    0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE, 0x4F4F4F, 0x000000, 0x000000,
    // $30-$3F
    0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA, 0xFECCC5, 0xF7D8A5,
    0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000, 0x000000,
];

/// Side length of the cursor block in pixels
const CURSOR_SIZE: usize = 16;

/// Palette index of the cursor (white)
const CURSOR_COLOR: u8 = 0x30;

/// Flag bits set on cursor pixels
const CURSOR_FLAGS: u8 = 0xC0;

/// Test pattern engine
pub struct TestPatternEngine {
    screen: Vec<u8>,
    rom: Vec<u8>,
    input: InputState,
    frame_count: u64,
    scroll: usize,
    cursor_x: usize,
    cursor_y: usize,
}

impl TestPatternEngine {
    /// Create an engine showing a blank screen
    pub fn new() -> Self {
        Self {
            screen: vec![0x0F; SCREEN_SIZE],
            rom: Vec::new(),
            input: InputState::new(),
            frame_count: 0,
            scroll: 0,
            cursor_x: (SCREEN_WIDTH - CURSOR_SIZE) / 2,
            cursor_y: (SCREEN_HEIGHT - CURSOR_SIZE) / 2,
        }
    }

    /// Frames rendered since construction
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Size of the loaded image
    pub fn rom_len(&self) -> usize {
        self.rom.len()
    }

    /// Top-left corner of the cursor block
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    fn move_cursor(&mut self) {
        let max_x = SCREEN_WIDTH - CURSOR_SIZE;
        let max_y = SCREEN_HEIGHT - CURSOR_SIZE;
        let step = if self.input.button_b { 4 } else { 2 };

        if self.input.left {
            self.cursor_x = self.cursor_x.saturating_sub(step);
        }
        if self.input.right {
            self.cursor_x = (self.cursor_x + step).min(max_x);
        }
        if self.input.up {
            self.cursor_y = self.cursor_y.saturating_sub(step);
        }
        if self.input.down {
            self.cursor_y = (self.cursor_y + step).min(max_y);
        }
    }

    fn render(&mut self) {
        for y in 0..SCREEN_HEIGHT {
            let row = &mut self.screen[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH];
            for (x, pixel) in row.iter_mut().enumerate() {
                let column = (x + self.scroll) % SCREEN_WIDTH;
                *pixel = ((column / 16) + (y / 16) * 16) as u8 % 64;
            }
        }

        // A darkens the cursor
        let cursor = if self.input.button_a {
            0x0F
        } else {
            CURSOR_COLOR
        };
        for y in self.cursor_y..self.cursor_y + CURSOR_SIZE {
            let start = y * SCREEN_WIDTH + self.cursor_x;
            self.screen[start..start + CURSOR_SIZE].fill(cursor | CURSOR_FLAGS);
        }
    }
}

impl Default for TestPatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for TestPatternEngine {
    fn load(&mut self, data: &[u8]) -> bool {
        if data.len() < INES_HEADER_SIZE || data[..4] != INES_MAGIC {
            return false;
        }
        self.rom = data.to_vec();
        true
    }

    fn set_input(&mut self, input: &InputState) {
        self.input = *input;
    }

    fn next_frame(&mut self) {
        self.frame_count += 1;
        // Select rewinds the chart, Start freezes it
        if self.input.select {
            self.scroll = 0;
        } else if !self.input.start {
            self.scroll = (self.scroll + 1) % SCREEN_WIDTH;
        }
        self.move_cursor();
        self.render();
    }

    fn screen_buffer(&self) -> &[u8] {
        &self.screen
    }

    fn palette_color(index: u8) -> Color {
        Color::from_rgb(NES_PALETTE[(index & 0x3F) as usize])
    }
}
