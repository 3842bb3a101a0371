//! Frame timing.
//!
//! Drives both the tweens and the FPS readout from one clock. Slow frames
//! report their real length so transitions keep wall-clock time at any
//! frame rate. Only stalls past [`MAX_FRAME_DELTA`] (window drags,
//! breakpoints) are capped, so a transition never skips straight to its end
//! after the app was frozen.
//!
//! ```ignore
//! let mut time = Time::new();
//!
//! // Once per redraw:
//! let dt = time.update();
//! scene.update(dt);
//! ```

use std::time::{Duration, Instant};

/// Largest delta a single frame reports.
pub const MAX_FRAME_DELTA: Duration = Duration::from_secs(1);

/// Time tracking for the redraw loop.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Update timing values. Call once per frame. Returns the frame delta.
    pub fn update(&mut self) -> Duration {
        self.tick(Instant::now())
    }

    fn tick(&mut self, now: Instant) -> Duration {
        self.delta = now
            .saturating_duration_since(self.last_frame)
            .min(MAX_FRAME_DELTA);
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Wall-clock time since creation.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.delta(), Duration::ZERO);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let delta = time.update();

        assert!(delta >= Duration::from_millis(10));
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut time = Time::new();
        let later = time.last_frame + Duration::from_secs(5);
        assert_eq!(time.tick(later), MAX_FRAME_DELTA);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_slow_frames_are_not_stretched() {
        // 4 fps: every frame reports its full length
        let mut time = Time::new();
        let start = time.last_frame;
        let mut total = Duration::ZERO;
        for i in 1..=8 {
            total += time.tick(start + Duration::from_millis(i * 250));
        }
        assert_eq!(time.delta(), Duration::from_millis(250));
        assert_eq!(total, Duration::from_secs(2));
    }

    #[test]
    fn test_fps_after_interval() {
        let mut time = Time::new();
        let start = time.last_frame;
        for i in 1..=30 {
            time.tick(start + Duration::from_millis(i * 20));
        }
        // 30 frames over 600 ms, sampled at the 500 ms mark (25 frames)
        assert!((time.fps() - 50.0).abs() < 0.5, "fps = {}", time.fps());
    }
}
