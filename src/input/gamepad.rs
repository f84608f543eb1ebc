// Gamepad controller - Desktop gamepads standing in for the V5 controllers
//
// The first connected gamepad plays the master controller and the second the
// partner. Buttons are read on demand, one digital read per NES button.

use super::{Button, ControllerDriver, ControllerId};
use gilrs::{Button as GilrsButton, Event, EventType, GamepadId, Gilrs};

/// Gamepad button mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamepadMapping {
    /// Button for A
    pub button_a: GilrsButton,
    /// Button for B
    pub button_b: GilrsButton,
    /// Button for Select
    pub select: GilrsButton,
    /// Button for Start
    pub start: GilrsButton,
    /// Button for Up on D-pad
    pub up: GilrsButton,
    /// Button for Down on D-pad
    pub down: GilrsButton,
    /// Button for Left on D-pad
    pub left: GilrsButton,
    /// Button for Right on D-pad
    pub right: GilrsButton,
}

impl GamepadMapping {
    /// Standard layout, shoulder buttons as Select/Start like the V5 controller
    ///
    /// # Default Mappings
    /// - D-pad: D-pad buttons
    /// - East (B/Circle): A button
    /// - South (A/Cross): B button
    /// - Left shoulder: Select
    /// - Right shoulder: Start
    pub fn default_mapping() -> Self {
        Self {
            button_a: GilrsButton::East,
            button_b: GilrsButton::South,
            select: GilrsButton::LeftTrigger,
            start: GilrsButton::RightTrigger,
            up: GilrsButton::DPadUp,
            down: GilrsButton::DPadDown,
            left: GilrsButton::DPadLeft,
            right: GilrsButton::DPadRight,
        }
    }

    /// Gamepad button bound to `button`
    pub fn button_for(&self, button: Button) -> GilrsButton {
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

impl Default for GamepadMapping {
    fn default() -> Self {
        Self::default_mapping()
    }
}

/// Gamepad handler
///
/// Gamepad support is optional: if the platform backend cannot start, the
/// handler reports every button as released and the keyboard still works.
pub struct GamepadHandler {
    gilrs: Option<Gilrs>,
    mapping: GamepadMapping,
    /// Gamepads playing the master and partner controllers
    assignments: [Option<GamepadId>; 2],
}

impl GamepadHandler {
    /// Start the gamepad backend and assign connected gamepads
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(e) => {
                eprintln!("Gamepad support unavailable: {}", e);
                None
            }
        };

        let mut handler = Self {
            gilrs,
            mapping: GamepadMapping::default_mapping(),
            assignments: [None, None],
        };
        handler.assign_gamepads();
        handler
    }

    /// Create a handler with no gamepad backend
    pub fn disabled() -> Self {
        Self {
            gilrs: None,
            mapping: GamepadMapping::default_mapping(),
            assignments: [None, None],
        }
    }

    /// Replace the button mapping
    pub fn with_mapping(mut self, mapping: GamepadMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn mapping(&self) -> &GamepadMapping {
        &self.mapping
    }

    /// Whether a gamepad currently plays controller `id`
    pub fn is_assigned(&self, id: ControllerId) -> bool {
        self.assignments[Self::slot(id)].is_some()
    }

    fn slot(id: ControllerId) -> usize {
        match id {
            ControllerId::Master => 0,
            ControllerId::Partner => 1,
        }
    }

    /// Give the first two connected gamepads the master and partner roles
    fn assign_gamepads(&mut self) {
        let Some(gilrs) = &self.gilrs else {
            return;
        };

        self.assignments = [None, None];
        let connected = gilrs
            .gamepads()
            .filter(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, _)| id);

        for (slot, id) in self.assignments.iter_mut().zip(connected) {
            *slot = Some(id);
            if let Some(gamepad) = gilrs.connected_gamepad(id) {
                println!("Gamepad '{}' (ID: {}) connected", gamepad.name(), id);
            }
        }
    }
}

impl Default for GamepadHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerDriver for GamepadHandler {
    fn poll(&mut self) {
        let Some(gilrs) = &mut self.gilrs else {
            return;
        };

        // Button state only advances as events are drained
        let mut topology_changed = false;
        while let Some(Event { event, .. }) = gilrs.next_event() {
            if matches!(event, EventType::Connected | EventType::Disconnected) {
                topology_changed = true;
            }
        }

        if topology_changed {
            self.assign_gamepads();
        }
    }

    fn is_pressed(&self, id: ControllerId, button: Button) -> bool {
        let (Some(gilrs), Some(gamepad_id)) = (&self.gilrs, self.assignments[Self::slot(id)])
        else {
            return false;
        };

        gilrs
            .connected_gamepad(gamepad_id)
            .is_some_and(|gamepad| gamepad.is_pressed(self.mapping.button_for(button)))
    }
}
