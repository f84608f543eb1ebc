// Common test utilities for frame loop integration tests
//
// Scriptable stand-ins for the engine and the brain's peripherals. Each mock
// shares its recorded state through Rc handles so a test can inspect it
// after the loop controller has taken ownership.

#![allow(dead_code)]

use nes_v5::display::{Color, SimulatedScreen, TextBuffer, SCREEN_SIZE};
use nes_v5::emulator::{Clock, Peripherals, PresenterConfig, NES_PALETTE};
use nes_v5::input::{Button, ControllerDriver, ControllerId, InputState};
use nes_v5::LogLevel;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Something the engine was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(usize),
    SetInput(InputState),
    NextFrame,
    Drop,
}

/// Engine that records every call and shows a caller-provided frame
pub struct MockEngine {
    calls: Rc<RefCell<Vec<EngineCall>>>,
    accept: bool,
    frame: Vec<u8>,
}

impl MockEngine {
    /// Engine accepting any image and showing a black frame
    pub fn new(calls: &Rc<RefCell<Vec<EngineCall>>>) -> Self {
        Self {
            calls: Rc::clone(calls),
            accept: true,
            frame: vec![0x0F; SCREEN_SIZE],
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.accept = false;
        self
    }

    pub fn with_frame(mut self, frame: Vec<u8>) -> Self {
        self.frame = frame;
        self
    }
}

impl nes_v5::Engine for MockEngine {
    fn load(&mut self, data: &[u8]) -> bool {
        self.calls.borrow_mut().push(EngineCall::Load(data.len()));
        self.accept
    }

    fn set_input(&mut self, input: &InputState) {
        self.calls.borrow_mut().push(EngineCall::SetInput(*input));
    }

    fn next_frame(&mut self) {
        self.calls.borrow_mut().push(EngineCall::NextFrame);
    }

    fn screen_buffer(&self) -> &[u8] {
        &self.frame
    }

    fn palette_color(index: u8) -> Color {
        Color::from_rgb(NES_PALETTE[(index & 0x3F) as usize])
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.calls.borrow_mut().push(EngineCall::Drop);
    }
}

/// Count how many times a call was recorded
pub fn count_calls(calls: &Rc<RefCell<Vec<EngineCall>>>, wanted: &EngineCall) -> usize {
    calls.borrow().iter().filter(|call| *call == wanted).count()
}

/// Clock the test advances by hand; sleeping moves it forward
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
    sleeps: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn starting_at(now: u32) -> Self {
        let clock = Self::default();
        clock.now.set(now);
        clock
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn get(&self) -> u32 {
        self.now.get()
    }

    /// Number of sleeps taken
    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u32 {
        self.now.get()
    }

    fn sleep_millis(&mut self, ms: u32) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.advance(ms);
    }
}

/// Controller whose held buttons the test changes between ticks
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    held: Rc<RefCell<InputState>>,
    polls: Rc<Cell<u32>>,
}

impl ScriptedController {
    pub fn hold(&self, button: Button, pressed: bool) {
        self.held.borrow_mut().set(button, pressed);
    }

    pub fn release_all(&self) {
        *self.held.borrow_mut() = InputState::new();
    }

    /// Number of times the driver was polled
    pub fn polls(&self) -> u32 {
        self.polls.get()
    }
}

impl ControllerDriver for ScriptedController {
    fn poll(&mut self) {
        self.polls.set(self.polls.get() + 1);
    }

    fn is_pressed(&self, id: ControllerId, button: Button) -> bool {
        id == ControllerId::Master && self.held.borrow().is_pressed(button)
    }
}

/// Handles to everything a loop controller was built with
pub struct Rig {
    pub screen: Rc<RefCell<SimulatedScreen>>,
    pub text: Rc<RefCell<TextBuffer>>,
    pub clock: ManualClock,
    pub controller: ScriptedController,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            screen: Rc::new(RefCell::new(SimulatedScreen::new())),
            text: Rc::new(RefCell::new(TextBuffer::new())),
            clock: ManualClock::starting_at(1000),
            controller: ScriptedController::default(),
        }
    }

    pub fn peripherals(&self) -> Peripherals {
        Peripherals::new(
            Rc::clone(&self.screen),
            self.controller.clone(),
            Rc::clone(&self.text),
            self.clock.clone(),
        )
    }
}

/// Temporary cartridge image removed when dropped
pub struct TempRom {
    pub path: PathBuf,
}

impl TempRom {
    /// Write a minimal iNES image (header plus one 16KB PRG bank)
    pub fn new() -> Self {
        let mut data = vec![0u8; 16 + 16 * 1024];
        data[..4].copy_from_slice(b"NES\x1a");
        data[4] = 1;
        Self::with_bytes(&data)
    }

    pub fn with_bytes(data: &[u8]) -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        let path = std::env::temp_dir().join(format!(
            "nes_v5_it_{}_{}.nes",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&path, data).expect("Failed to write temporary ROM");
        Self { path }
    }

    pub fn len(&self) -> usize {
        std::fs::metadata(&self.path).map(|m| m.len() as usize).unwrap_or(0)
    }
}

impl Drop for TempRom {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

/// Quiet configuration pointing at `rom_path`
pub fn config_for(rom_path: PathBuf) -> PresenterConfig {
    let mut config = PresenterConfig::default();
    config.rom_path = rom_path;
    config.logging.echo_stderr = false;
    config.logging.level = LogLevel::Debug;
    config
}
