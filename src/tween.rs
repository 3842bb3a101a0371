//! Time-based interpolation of scalar values.
//!
//! A [`Tween`] moves a value from `from` to `to` over a fixed duration with
//! quadratic ease-out: fast at the start, landing gently on the target.
//! Tweens own no target; the caller reads [`Tween::value`] after each
//! [`Tween::advance`] and writes it wherever it belongs.
//!
//! ```ignore
//! let mut tween = Tween::new(-2.0, -2.5, Duration::from_secs(2));
//!
//! // Once per frame:
//! plates.lower = tween.advance(time.delta());
//! ```

use std::time::Duration;

/// Quadratic ease-out of linear progress. Input is clamped to `[0, 1]`.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// Interpolates one scalar over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `dt` and return the new value.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Linear progress in `[0, 1]`. A zero-length tween is always complete.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Current value. Exactly `to` once finished.
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_out_quad(self.progress())
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}
