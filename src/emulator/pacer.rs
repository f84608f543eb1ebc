// Frame pacer - Holds the loop to the target refresh rate
//
// The brain gives us a millisecond tick counter and a sleep call, nothing
// else. Each loop pass asks the pacer whether a full frame interval has
// elapsed; if not, the pass sleeps a millisecond and is abandoned without
// touching any other state.

use std::time::{Duration, Instant};

/// Millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary origin, wrapping at `u32::MAX`
    fn now_millis(&self) -> u32;

    /// Yield the processor for about `ms` milliseconds
    fn sleep_millis(&mut self, ms: u32);
}

/// Clock backed by the host's monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u32 {
        // Truncation gives the same wrap-around as the hardware counter
        self.origin.elapsed().as_millis() as u32
    }

    fn sleep_millis(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Frame interval in whole milliseconds for a target rate
///
/// Integer division, so 60 fps gives 16 ms. A rate of 0 is treated as 1.
pub const fn frame_interval_ms(target_fps: u32) -> u32 {
    let fps = if target_fps == 0 { 1 } else { target_fps };
    1000 / fps
}

/// Fixed-interval frame gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    last_frame: u32,
    interval_ms: u32,
}

impl FramePacer {
    /// Create a pacer whose first frame is due one interval after `now`
    pub fn new(now: u32, target_fps: u32) -> Self {
        Self {
            last_frame: now,
            interval_ms: frame_interval_ms(target_fps),
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Timestamp of the last frame allowed through
    pub fn last_frame(&self) -> u32 {
        self.last_frame
    }

    /// Decide whether a frame may run at `now`
    ///
    /// On `true` the stored timestamp moves to `now`; on `false` nothing
    /// changes. Elapsed time is computed with wrapping arithmetic so the gate
    /// keeps working when the millisecond counter rolls over.
    pub fn ready(&mut self, now: u32) -> bool {
        if now.wrapping_sub(self.last_frame) < self.interval_ms {
            return false;
        }
        self.last_frame = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval_ms(60), 16);
        assert_eq!(frame_interval_ms(30), 33);
        assert_eq!(frame_interval_ms(0), 1000);
    }

    #[test]
    fn test_gate_opens_after_interval() {
        let mut pacer = FramePacer::new(1000, 60);

        assert!(!pacer.ready(1000));
        assert!(!pacer.ready(1015));
        assert_eq!(pacer.last_frame(), 1000);

        assert!(pacer.ready(1016));
        assert_eq!(pacer.last_frame(), 1016);
        assert!(!pacer.ready(1017));
    }

    #[test]
    fn test_late_frame_resets_from_now() {
        let mut pacer = FramePacer::new(0, 60);
        assert!(pacer.ready(50));
        // Next frame is measured from 50, not 16
        assert!(!pacer.ready(60));
        assert!(pacer.ready(66));
    }

    #[test]
    fn test_counter_rollover() {
        let mut pacer = FramePacer::new(u32::MAX - 5, 60);
        assert!(!pacer.ready(u32::MAX));
        assert!(!pacer.ready(9));
        assert!(pacer.ready(10));
    }

    #[test]
    fn test_minimum_interval_over_many_ticks() {
        let mut pacer = FramePacer::new(0, 60);
        let mut now = 0u32;
        let mut frames = Vec::new();

        for tick in 0..1200u32 {
            // Uneven tick spacing: mostly 1 ms sleeps, an occasional long frame
            now += if tick % 37 == 0 { 9 } else { 1 };
            if pacer.ready(now) {
                frames.push(now);
            }
        }

        assert!(frames.len() > 10);
        for pair in frames.windows(2) {
            assert!(pair[1] - pair[0] >= 16, "frames at {} and {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_system_clock_advances() {
        let mut clock = SystemClock::new();
        let start = clock.now_millis();
        clock.sleep_millis(2);
        assert!(clock.now_millis().wrapping_sub(start) >= 2);
    }
}
