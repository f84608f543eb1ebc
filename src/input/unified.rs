// Unified controller - Keyboard and gamepad merged into one driver
//
// A button counts as held if either source holds it. The keyboard half is
// shared with the simulator window, which feeds it key events.

use super::{Button, ControllerDriver, ControllerId, GamepadHandler, KeyboardHandler};
use std::cell::RefCell;
use std::rc::Rc;

/// Keyboard + gamepad controller driver
pub struct UnifiedController {
    keyboard: Rc<RefCell<KeyboardHandler>>,
    gamepad: GamepadHandler,
}

impl UnifiedController {
    /// Create a driver from a shared keyboard handler and a gamepad handler
    pub fn new(keyboard: Rc<RefCell<KeyboardHandler>>, gamepad: GamepadHandler) -> Self {
        Self { keyboard, gamepad }
    }

    /// Handle to the keyboard half, for the window's event handler
    pub fn keyboard(&self) -> Rc<RefCell<KeyboardHandler>> {
        Rc::clone(&self.keyboard)
    }
}

impl ControllerDriver for UnifiedController {
    fn poll(&mut self) {
        self.gamepad.poll();
    }

    fn is_pressed(&self, id: ControllerId, button: Button) -> bool {
        self.keyboard.borrow().is_pressed(id, button) || self.gamepad.is_pressed(id, button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{KeyCode, PhysicalKey};

    #[test]
    fn test_keyboard_events_reach_driver() {
        let keyboard = Rc::new(RefCell::new(KeyboardHandler::new()));
        let mut controller = UnifiedController::new(Rc::clone(&keyboard), GamepadHandler::disabled());

        keyboard
            .borrow_mut()
            .handle_key_press(PhysicalKey::Code(KeyCode::Enter));
        controller.poll();

        assert!(controller.is_pressed(ControllerId::Master, Button::Start));
        assert!(!controller.is_pressed(ControllerId::Partner, Button::Start));
    }
}
