// Configuration management
//
// Presenter settings: where the cartridge lives, frame rate and placement,
// input cadence and logging. Stored as TOML. Loading never writes a file;
// the device keeps no state besides the cartridge image.

use crate::debug::LogLevel;
use crate::display::{BlitMode, DEFAULT_X_OFFSET, PHYSICAL_WIDTH, SCREEN_WIDTH};
use crate::input::ControllerId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Cartridge image location on the brain's SD card
pub const DEFAULT_ROM_PATH: &str = "/usd/game.nes";

/// Largest offset that keeps the whole frame on the physical display
const MAX_X_OFFSET: i16 = (PHYSICAL_WIDTH - SCREEN_WIDTH) as i16;

/// Presenter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Cartridge image path
    pub rom_path: PathBuf,

    /// Video settings
    pub video: VideoConfig,

    /// Input settings
    pub input: InputConfig,

    /// Frame loop timing
    pub timing: TimingConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Video configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Target FPS (60 for NTSC)
    pub target_fps: u32,

    /// Left edge of the frame on the physical display (0-224)
    pub screen_offset_x: i16,

    /// Block copy or per-pixel transfer
    pub blit_mode: BlitMode,
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Read the controller once every this many frames
    pub poll_interval: u32,

    /// Controller to read
    pub controller: ControllerId,
}

/// Timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep taken when a loop pass arrives before the frame is due
    pub idle_sleep_ms: u32,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level recorded
    pub level: LogLevel,

    /// Echo entries to stderr
    pub echo_stderr: bool,

    /// Entries kept in memory (0 = unlimited)
    pub max_entries: usize,

    /// Log file, if any
    pub file: Option<PathBuf>,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        PresenterConfig {
            rom_path: PathBuf::from(DEFAULT_ROM_PATH),
            video: VideoConfig::default(),
            input: InputConfig::default(),
            timing: TimingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            target_fps: 60,
            screen_offset_x: DEFAULT_X_OFFSET,
            blit_mode: BlitMode::Block,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            poll_interval: 2,
            controller: ControllerId::Master,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig { idle_sleep_ms: 1 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            echo_stderr: true,
            max_entries: 256,
            file: None,
        }
    }
}

impl PresenterConfig {
    /// Load configuration from file or fall back to defaults
    ///
    /// # Example
    ///
    /// ```
    /// use nes_v5::emulator::PresenterConfig;
    ///
    /// let config = PresenterConfig::load_or_default("does_not_exist.toml");
    /// assert_eq!(config.video.target_fps, 60);
    /// ```
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Load configuration from file
    ///
    /// Missing keys take their defaults; out-of-range values are clamped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, io::Error> {
        let config: Self =
            toml::from_str(contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(config.sanitized())
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, io::Error> {
        toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    ///
    /// Only used by host tooling to write a starting point for editing.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        fs::write(path, self.to_toml_string()?)
    }

    fn sanitized(mut self) -> Self {
        self.video.target_fps = self.video.target_fps.clamp(1, 1000);
        self.video.screen_offset_x = self.video.screen_offset_x.clamp(0, MAX_X_OFFSET);
        self.input.poll_interval = self.input.poll_interval.max(1);
        self
    }
}
