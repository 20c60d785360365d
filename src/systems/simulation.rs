//! Frame timing
//!
//! Produces the per-frame delta time handed to [`scene3d_core::Scene::run_frame`].

use std::time::{Duration, Instant};

/// Default cap on a single frame's delta, in seconds
pub const MAX_FRAME_DT: f32 = 0.25;

/// Measures time between frames
pub struct FrameClock {
    last_frame: Instant,
    max_dt: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            max_dt: MAX_FRAME_DT,
            frames: 0,
        }
    }

    /// Builder: set the largest delta a single frame may report
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    /// Start a new frame and return the seconds since the previous one
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) with an explicit timestamp
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw_dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;
        // Cap dt so a stall (first frame, window drag, focus loss) does not
        // tunnel everything through the collision pass
        raw_dt.min(self.max_dt)
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time since the last tick
    pub fn since_last(&self) -> Duration {
        self.last_frame.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_delta_measured() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame;
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < EPSILON);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn test_delta_time_capped() {
        let mut clock = FrameClock::new().with_max_dt(0.1);
        let start = clock.last_frame;
        assert_eq!(clock.tick_at(start + Duration::from_secs(3)), 0.1);
    }

    #[test]
    fn test_clock_going_backwards_gives_zero() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame;
        clock.tick_at(start + Duration::from_millis(50));
        assert_eq!(clock.tick_at(start), 0.0);
    }
}
