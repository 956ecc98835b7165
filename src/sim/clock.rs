//! Frame clock
//!
//! Turns raw monotonic timestamps into frame deltas. The platform layer owns the
//! actual frame source; this only decides what delta each frame gets.

use crate::consts::{FRAME_MS, MAX_FRAME_DELTA_MS};

/// Replace stall-sized deltas with one nominal frame
#[inline]
pub fn clamp_delta(dt_ms: f32) -> f32 {
    if dt_ms > MAX_FRAME_DELTA_MS {
        FRAME_MS
    } else {
        dt_ms.max(0.0)
    }
}

/// Tracks the last frame timestamp while the loop is running
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin timing from `now` (ms). Restarting resets the reference time.
    pub fn start(&mut self, now: f64) {
        self.last_time = Some(now);
    }

    /// Stop timing. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.last_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.last_time.is_some()
    }

    /// Delta (ms) since the previous frame, or None when stopped
    pub fn advance(&mut self, now: f64) -> Option<f32> {
        let last = self.last_time?;
        self.last_time = Some(now);
        Some(clamp_delta((now - last) as f32))
    }
}
