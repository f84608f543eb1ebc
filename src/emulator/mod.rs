// Emulator module - Frame loop around the emulation engine
//
// This module owns the steady-state cycle that turns emulated frames into
// displayed pixels:
//
//   [pacer gate] -> sample input -> engine step -> convert -> blit -> repeat
//
// plus the setup that precedes it (read image, build engine, load image,
// allocate color buffer, build palette table) and the error reporting when
// setup fails.

mod config;
mod engine;
mod error;
mod pacer;
mod test_pattern;

pub use config::{
    InputConfig, LoggingConfig, PresenterConfig, TimingConfig, VideoConfig, DEFAULT_ROM_PATH,
};
pub use engine::Engine;
pub use error::{AllocationTarget, PresenterError};
pub use pacer::{frame_interval_ms, Clock, FramePacer, SystemClock};
pub use test_pattern::{TestPatternEngine, NES_PALETTE};

use crate::cartridge::CartridgeImage;
use crate::debug::{FrameStats, LogLevel, Logger};
use crate::display::{print, Blitter, ColorBuffer, PaletteLut, Screen, TextDisplay};
use crate::input::{ControllerDriver, InputSampler, InputState};
use std::collections::TryReserveError;

/// Presented frames between two statistics log lines
const STATS_INTERVAL: u64 = 600;

/// Hardware the frame loop talks to
pub struct Peripherals {
    /// Display driver
    pub screen: Box<dyn Screen>,
    /// Controller driver
    pub controller: Box<dyn ControllerDriver>,
    /// Operator text display
    pub text: Box<dyn TextDisplay>,
    /// Millisecond clock
    pub clock: Box<dyn Clock>,
}

impl Peripherals {
    pub fn new(
        screen: impl Screen + 'static,
        controller: impl ControllerDriver + 'static,
        text: impl TextDisplay + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            screen: Box::new(screen),
            controller: Box::new(controller),
            text: Box::new(text),
            clock: Box::new(clock),
        }
    }
}

/// Result of one pass through the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame was not due yet; the pass slept and did nothing else
    Early,
    /// A frame was emulated and sent to the screen
    Presented {
        /// Frame number (0 for the first presented frame)
        frame: u64,
        /// Whether the controller was read for this frame
        polled_input: bool,
    },
}

/// Frame loop controller
///
/// Sole owner of the engine, the color buffer and everything else the loop
/// touches. Dropping it destroys the engine and frees the buffers.
pub struct LoopController<E: Engine> {
    engine: E,
    color_buffer: ColorBuffer,
    palette: PaletteLut,
    input: InputState,
    pacer: FramePacer,
    sampler: InputSampler,
    blitter: Blitter,
    peripherals: Peripherals,
    logger: Logger,
    stats: FrameStats,
    idle_sleep_ms: u32,
}

impl<E: Engine> LoopController<E> {
    /// Bring the presenter up
    ///
    /// Reads the cartridge image, builds the engine with `make_engine`, loads
    /// the image, then allocates the color buffer and palette table. The
    /// first failure is shown on the operator display and returned;
    /// everything acquired before it has been released by then.
    ///
    /// # Errors
    /// * `PresenterError::Io` - image missing or unreadable (`make_engine` is not called)
    /// * `PresenterError::Allocation` - image or color buffer allocation failed
    /// * `PresenterError::EngineInit` - `make_engine` returned `None`
    /// * `PresenterError::Load` - the engine rejected the image
    pub fn setup<F>(
        config: &PresenterConfig,
        peripherals: Peripherals,
        make_engine: F,
    ) -> Result<Self, PresenterError>
    where
        F: FnOnce() -> Option<E>,
    {
        Self::setup_with_allocator(config, peripherals, make_engine, ColorBuffer::try_for_screen)
    }

    /// Bring the presenter up with a custom color buffer allocator
    ///
    /// Same as [`setup`](Self::setup), but `allocate` provides the color
    /// buffer. It is called only after the engine has accepted the image.
    pub fn setup_with_allocator<F, A>(
        config: &PresenterConfig,
        mut peripherals: Peripherals,
        make_engine: F,
        allocate: A,
    ) -> Result<Self, PresenterError>
    where
        F: FnOnce() -> Option<E>,
        A: FnOnce() -> Result<ColorBuffer, TryReserveError>,
    {
        let mut logger = build_logger(config);
        print(peripherals.text.as_mut(), "Starting");
        logger.info("Starting");

        let (engine, color_buffer) = match bring_up(config, &mut logger, make_engine, allocate) {
            Ok(parts) => parts,
            Err(e) => {
                logger.error(e.to_string());
                print(peripherals.text.as_mut(), &e.operator_message());
                return Err(e);
            }
        };

        let palette = PaletteLut::for_engine::<E>();
        let now = peripherals.clock.now_millis();
        let pacer = FramePacer::new(now, config.video.target_fps);
        logger.info(format!(
            "Running at {} fps ({} ms per frame)",
            config.video.target_fps,
            pacer.interval_ms()
        ));

        Ok(Self {
            engine,
            color_buffer,
            palette,
            input: InputState::new(),
            pacer,
            sampler: InputSampler::new(config.input.controller, config.input.poll_interval),
            blitter: Blitter::new(config.video.screen_offset_x).with_mode(config.video.blit_mode),
            peripherals,
            logger,
            stats: FrameStats::default(),
            idle_sleep_ms: config.timing.idle_sleep_ms,
        })
    }

    /// Run one pass of the frame loop
    ///
    /// If the frame interval has not elapsed, sleeps briefly and returns
    /// `Early` without touching input, engine or screen. Otherwise samples
    /// input (every other frame), steps the engine, converts and blits.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.peripherals.clock.now_millis();
        if !self.pacer.ready(now) {
            self.stats.early_ticks += 1;
            self.peripherals.clock.sleep_millis(self.idle_sleep_ms);
            return TickOutcome::Early;
        }

        let frame = self.sampler.frame_count();
        let polled_input = self
            .sampler
            .sample(self.peripherals.controller.as_mut(), &mut self.input);

        self.engine.set_input(&self.input);
        self.engine.next_frame();

        self.color_buffer
            .convert_from(self.engine.screen_buffer(), &self.palette);
        self.blitter
            .blit(self.peripherals.screen.as_mut(), &self.color_buffer);

        self.record_frame(polled_input);
        TickOutcome::Presented {
            frame,
            polled_input,
        }
    }

    /// Run the frame loop forever
    pub fn run(mut self) -> ! {
        loop {
            self.tick();
        }
    }

    /// Stop the loop and release the engine and buffers
    pub fn shutdown(mut self) {
        let summary = format!("Shutting down: {}", self.stats);
        self.logger.info(summary);
    }

    fn record_frame(&mut self, polled_input: bool) {
        self.stats.presented_frames += 1;
        if polled_input {
            self.stats.input_polls += 1;
        }

        if self.stats.presented_frames % STATS_INTERVAL == 0 && self.logger.enabled(LogLevel::Debug)
        {
            let line = self.stats.to_string();
            self.logger.debug(line);
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Input state handed to the engine on the last frame
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Colors sent to the screen on the last frame
    pub fn color_buffer(&self) -> &ColorBuffer {
        &self.color_buffer
    }

    pub fn palette(&self) -> &PaletteLut {
        &self.palette
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Frames presented so far
    pub fn frame_count(&self) -> u64 {
        self.sampler.frame_count()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Acquire the engine and color buffer
///
/// Each `?` drops whatever was acquired above it, so the image and the
/// engine are released exactly once on every failure.
fn bring_up<E, F, A>(
    config: &PresenterConfig,
    logger: &mut Logger,
    make_engine: F,
    allocate: A,
) -> Result<(E, ColorBuffer), PresenterError>
where
    E: Engine,
    F: FnOnce() -> Option<E>,
    A: FnOnce() -> Result<ColorBuffer, TryReserveError>,
{
    logger.info(format!("Loading {}", config.rom_path.display()));
    let image = CartridgeImage::load(&config.rom_path)?;
    match image.header() {
        Some(header) => logger.info(format!("Read {} bytes: {}", image.len(), header)),
        None => logger.warn(format!("Read {} bytes without an iNES header", image.len())),
    }

    let mut engine = make_engine().ok_or(PresenterError::EngineInit)?;

    image.hand_off(&mut engine)?;
    logger.debug("Cartridge image handed to engine and released");

    let color_buffer = allocate().map_err(|_| AllocationTarget::ColorBuffer)?;

    Ok((engine, color_buffer))
}

fn build_logger(config: &PresenterConfig) -> Logger {
    let mut logger = Logger::new();
    logger.set_log_level(config.logging.level);
    logger.set_echo_stderr(config.logging.echo_stderr);
    logger.set_max_buffer_size(config.logging.max_entries);
    if let Some(path) = &config.logging.file {
        if let Err(e) = logger.open_log_file(path) {
            logger.warn(format!("Cannot open log file {}: {}", path.display(), e));
        }
    }
    logger
}
