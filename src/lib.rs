// NES Presenter Library
// Frame loop that shows an NES emulation engine's output on the V5 brain display

// Public modules
pub mod cartridge;
pub mod debug;
pub mod display;
pub mod emulator;
pub mod input;
pub mod lifecycle;

// Re-export main types for convenience
pub use cartridge::{CartridgeImage, INesHeader, Mirroring};
pub use debug::{FrameStats, LogLevel, Logger};
pub use display::{
    convert_frame, BlitMode, Blitter, Color, ColorBuffer, PaletteLut, Screen, SimulatedScreen,
    TextBuffer, TextDisplay,
};
pub use emulator::{
    Clock, Engine, FramePacer, LoopController, Peripherals, PresenterConfig, PresenterError,
    SystemClock, TestPatternEngine, TickOutcome,
};
pub use input::{Button, ControllerDriver, ControllerId, InputSampler, InputState};
