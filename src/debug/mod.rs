// Debug module - Diagnostics for the frame loop
//
// Provides:
// - Logger with levels, in-memory buffer, stderr and file sinks
// - Frame statistics collected by the loop controller

mod logger;

pub use logger::{LogEntry, LogLevel, Logger};

/// Running frame loop statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Frames converted and sent to the screen
    pub presented_frames: u64,
    /// Loop passes that arrived before the frame interval had elapsed
    pub early_ticks: u64,
    /// Frames on which the controller was read
    pub input_polls: u64,
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames presented, {} early ticks, {} input polls",
            self.presented_frames, self.early_ticks, self.input_polls
        )
    }
}
