// Input sampler - Reads the controller at a reduced cadence
//
// The controller is read on every other presented frame (frames 0, 2, 4,
// ...) and the previous state is reused in between.

use super::{Button, ControllerDriver, ControllerId, InputState};

/// Copy every button of controller `id` into `state`
pub fn read_controller(driver: &dyn ControllerDriver, id: ControllerId, state: &mut InputState) {
    for button in Button::ALL {
        state.set(button, driver.is_pressed(id, button));
    }
}

/// Frame-counting input sampler
#[derive(Debug, Clone)]
pub struct InputSampler {
    controller: ControllerId,
    poll_interval: u32,
    frame_count: u64,
}

impl InputSampler {
    /// Create a sampler reading `controller` once every `poll_interval` frames
    ///
    /// An interval of 0 is treated as 1 (read every frame).
    pub fn new(controller: ControllerId, poll_interval: u32) -> Self {
        Self {
            controller,
            poll_interval: poll_interval.max(1),
            frame_count: 0,
        }
    }

    /// Number of frames sampled so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn poll_interval(&self) -> u32 {
        self.poll_interval
    }

    pub fn controller(&self) -> ControllerId {
        self.controller
    }

    /// Whether the next call to `sample` reads the controller
    pub fn polls_next_frame(&self) -> bool {
        self.frame_count % u64::from(self.poll_interval) == 0
    }

    /// Run the sampler for one frame
    ///
    /// Reads the controller into `state` on polling frames and leaves it
    /// untouched otherwise. The frame counter advances on every call.
    ///
    /// # Returns
    /// `true` if the controller was read this frame
    pub fn sample(&mut self, driver: &mut dyn ControllerDriver, state: &mut InputState) -> bool {
        let poll = self.polls_next_frame();
        if poll {
            driver.poll();
            read_controller(driver, self.controller, state);
        }
        self.frame_count += 1;
        poll
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(ControllerId::Master, 2)
    }
}
