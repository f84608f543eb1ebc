// Keyboard controller - Desktop keys standing in for the V5 controller buttons
//
// The simulator window forwards key events here; the sampler then reads
// buttons one at a time through the ControllerDriver interface, exactly as
// it reads the hardware controller on the brain.

use super::{Button, ControllerDriver, ControllerId};
use std::collections::HashSet;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard mapping for one controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMapping {
    /// Key for A button
    pub button_a: KeyCode,
    /// Key for B button
    pub button_b: KeyCode,
    /// Key for Select button (L1 on the V5 controller)
    pub select: KeyCode,
    /// Key for Start button (R1 on the V5 controller)
    pub start: KeyCode,
    /// Key for Up on D-pad
    pub up: KeyCode,
    /// Key for Down on D-pad
    pub down: KeyCode,
    /// Key for Left on D-pad
    pub left: KeyCode,
    /// Key for Right on D-pad
    pub right: KeyCode,
}

impl KeyboardMapping {
    /// Default mapping for the master controller
    ///
    /// # Default Mappings
    /// - Arrow keys: D-pad
    /// - X: A button
    /// - Z: B button
    /// - Enter: Start
    /// - Right Shift: Select
    pub fn master_default() -> Self {
        Self {
            button_a: KeyCode::KeyX,
            button_b: KeyCode::KeyZ,
            select: KeyCode::ShiftRight,
            start: KeyCode::Enter,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
        }
    }

    /// Default mapping for the partner controller
    ///
    /// # Default Mappings
    /// - WASD: D-pad
    /// - K: A button
    /// - J: B button
    /// - Y: Start
    /// - U: Select
    pub fn partner_default() -> Self {
        Self {
            button_a: KeyCode::KeyK,
            button_b: KeyCode::KeyJ,
            select: KeyCode::KeyU,
            start: KeyCode::KeyY,
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }

    /// Key bound to `button`
    pub fn key_for(&self, button: Button) -> KeyCode {
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
}

/// Keyboard state tracker
///
/// Remembers which keys are held between window events.
#[derive(Debug, Clone)]
pub struct KeyboardHandler {
    master_mapping: KeyboardMapping,
    partner_mapping: KeyboardMapping,
    pressed_keys: HashSet<KeyCode>,
}

impl KeyboardHandler {
    /// Create a handler with the default mappings
    ///
    /// # Example
    /// ```
    /// use nes_v5::input::keyboard::KeyboardHandler;
    ///
    /// let handler = KeyboardHandler::new();
    /// ```
    pub fn new() -> Self {
        Self::with_mappings(
            KeyboardMapping::master_default(),
            KeyboardMapping::partner_default(),
        )
    }

    /// Create a handler with custom mappings
    pub fn with_mappings(master_mapping: KeyboardMapping, partner_mapping: KeyboardMapping) -> Self {
        Self {
            master_mapping,
            partner_mapping,
            pressed_keys: HashSet::new(),
        }
    }

    /// Handle a key press event
    pub fn handle_key_press(&mut self, physical_key: PhysicalKey) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.pressed_keys.insert(key_code);
        }
    }

    /// Handle a key release event
    pub fn handle_key_release(&mut self, physical_key: PhysicalKey) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.pressed_keys.remove(&key_code);
        }
    }

    /// Forget every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
    }

    fn mapping(&self, id: ControllerId) -> &KeyboardMapping {
        match id {
            ControllerId::Master => &self.master_mapping,
            ControllerId::Partner => &self.partner_mapping,
        }
    }
}

impl Default for KeyboardHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerDriver for KeyboardHandler {
    fn is_pressed(&self, id: ControllerId, button: Button) -> bool {
        self.pressed_keys
            .contains(&self.mapping(id).key_for(button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut handler = KeyboardHandler::new();

        handler.handle_key_press(PhysicalKey::Code(KeyCode::KeyX));
        assert!(handler.is_pressed(ControllerId::Master, Button::A));
        assert!(!handler.is_pressed(ControllerId::Master, Button::B));

        handler.handle_key_release(PhysicalKey::Code(KeyCode::KeyX));
        assert!(!handler.is_pressed(ControllerId::Master, Button::A));
    }

    #[test]
    fn test_controllers_use_separate_mappings() {
        let mut handler = KeyboardHandler::new();
        handler.handle_key_press(PhysicalKey::Code(KeyCode::KeyW));

        assert!(handler.is_pressed(ControllerId::Partner, Button::Up));
        assert!(!handler.is_pressed(ControllerId::Master, Button::Up));
    }

    #[test]
    fn test_release_all() {
        let mut handler = KeyboardHandler::new();
        handler.handle_key_press(PhysicalKey::Code(KeyCode::Enter));
        handler.handle_key_press(PhysicalKey::Code(KeyCode::ArrowLeft));

        handler.release_all();

        assert!(!handler.is_pressed(ControllerId::Master, Button::Start));
        assert!(!handler.is_pressed(ControllerId::Master, Button::Left));
    }

    #[test]
    fn test_every_button_has_a_distinct_key() {
        let mapping = KeyboardMapping::master_default();
        let keys: HashSet<KeyCode> = Button::ALL.iter().map(|&b| mapping.key_for(b)).collect();
        assert_eq!(keys.len(), Button::ALL.len());
    }
}
