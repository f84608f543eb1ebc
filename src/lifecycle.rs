// Program lifecycle - Entry points the brain runtime calls
//
// The runtime drives a program through fixed phases. Only `opcontrol` does
// anything: it brings the presenter up and runs the frame loop for the rest
// of the session. The other phases are accepted and ignored.

use crate::emulator::{Engine, LoopController, Peripherals, PresenterConfig, PresenterError};
use std::convert::Infallible;

/// Runs once when the program starts
pub fn initialize() {}

/// Runs while the robot is disabled by field control
pub fn disabled() {}

/// Runs once after connecting to field control
pub fn competition_initialize() {}

/// Autonomous period
pub fn autonomous() {}

/// Operator control period
///
/// Sets up the presenter and runs the frame loop. Only returns if setup
/// fails, after the failure has been shown on the operator display.
///
/// # Example
///
/// ```no_run
/// use nes_v5::display::{SimulatedScreen, TextBuffer};
/// use nes_v5::emulator::{Peripherals, PresenterConfig, SystemClock, TestPatternEngine};
/// use nes_v5::input::{Button, ControllerDriver, ControllerId};
/// use nes_v5::lifecycle;
///
/// struct NoController;
///
/// impl ControllerDriver for NoController {
///     fn is_pressed(&self, _id: ControllerId, _button: Button) -> bool {
///         false
///     }
/// }
///
/// let peripherals = Peripherals::new(
///     SimulatedScreen::new(),
///     NoController,
///     TextBuffer::new(),
///     SystemClock::new(),
/// );
/// let config = PresenterConfig::default();
/// if let Err(e) = lifecycle::opcontrol(&config, peripherals, || Some(TestPatternEngine::new())) {
///     eprintln!("{}", e);
/// }
/// ```
pub fn opcontrol<E, F>(
    config: &PresenterConfig,
    peripherals: Peripherals,
    make_engine: F,
) -> Result<Infallible, PresenterError>
where
    E: Engine,
    F: FnOnce() -> Option<E>,
{
    LoopController::setup(config, peripherals, make_engine)?.run()
}
