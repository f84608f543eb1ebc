// Input module - Controller state handed to the engine each frame
//
// The V5 controller is read one digital button at a time. The sampler copies
// the eight NES-relevant buttons into an InputState every other frame and the
// frame loop passes that state to the engine.

pub mod sampler;

#[cfg(feature = "simulator")]
pub mod gamepad;
#[cfg(feature = "simulator")]
pub mod keyboard;
#[cfg(feature = "simulator")]
pub mod unified;

pub use sampler::{read_controller, InputSampler};

#[cfg(feature = "simulator")]
pub use gamepad::{GamepadHandler, GamepadMapping};
#[cfg(feature = "simulator")]
pub use keyboard::{KeyboardHandler, KeyboardMapping};
#[cfg(feature = "simulator")]
pub use unified::UnifiedController;

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// NES controller button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// A button
    A,
    /// B button
    B,
    /// Select button
    Select,
    /// Start button
    Start,
    /// Up on D-pad
    Up,
    /// Down on D-pad
    Down,
    /// Left on D-pad
    Left,
    /// Right on D-pad
    Right,
}

impl Button {
    /// Every button, in the order the sampler reads them
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];
}

/// Which physical controller to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerId {
    /// Primary controller
    #[default]
    Master,
    /// Secondary controller
    Partner,
}

/// Controller driver
///
/// Hardware reads are digital and synchronous. Drivers that need to pump an
/// event queue before reads do it in `poll`, which the sampler calls once per
/// sample.
pub trait ControllerDriver {
    /// Refresh cached hardware state before a round of reads
    fn poll(&mut self) {}

    /// Whether `button` is held on controller `id`
    fn is_pressed(&self, id: ControllerId, button: Button) -> bool;
}

impl<C: ControllerDriver + ?Sized> ControllerDriver for Rc<RefCell<C>> {
    fn poll(&mut self) {
        self.borrow_mut().poll();
    }

    fn is_pressed(&self, id: ControllerId, button: Button) -> bool {
        self.borrow().is_pressed(id, button)
    }
}

/// Input state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    // Button states
    pub button_a: bool,
    pub button_b: bool,
    pub select: bool,
    pub start: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Create an input state with all buttons released
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `button` is held
    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::A => self.button_a,
            Button::B => self.button_b,
            Button::Select => self.select,
            Button::Start => self.start,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
        }
    }

    /// Set the state of one button
    pub fn set(&mut self, button: Button, pressed: bool) {
        let slot = match button {
            Button::A => &mut self.button_a,
            Button::B => &mut self.button_b,
            Button::Select => &mut self.select,
            Button::Start => &mut self.start,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
        };
        *slot = pressed;
    }

    /// Whether any button is held
    pub fn any_pressed(&self) -> bool {
        Button::ALL.iter().any(|&b| self.is_pressed(b))
    }
}
