//! Time-based property interpolation.
//!
//! Every scripted animation in the scene (cloth hoist and lower, the yaw
//! wobble, the message entrance, the camera reset) is a [`Tween`]: interpolate
//! a value from `from` to `to` over `duration` using an [`Easing`] curve.
//! Tweens are advanced explicitly by the frame loop, so they are deterministic
//! and run on whatever clock drives the renderer.

use crate::easing::Easing;
use glam::{DVec2, DVec3};

/// Values that can be linearly interpolated
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for DVec2 {
    fn lerp(self, other: Self, t: f64) -> Self {
        DVec2::lerp(self, other, t)
    }
}

impl Lerp for DVec3 {
    fn lerp(self, other: Self, t: f64) -> Self {
        DVec3::lerp(self, other, t)
    }
}

/// Relative slack for accumulated frame time
pub const FINISH_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f64,
    easing: Easing,
    elapsed: f64,
    yoyo: bool,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f64, easing: Easing) -> Self {
        Tween {
            from,
            to,
            duration: duration.max(0.0),
            easing,
            elapsed: 0.0,
            yoyo: false,
        }
    }

    /// Plays forward over the first half of the duration and back over the second
    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    /// Moves the tween forward by `dt` and returns the new value
    ///
    /// Time within [`FINISH_TOLERANCE`] of the end (relative to the duration)
    /// counts as the end, so frame deltas that sum to the duration finish it.
    pub fn advance(&mut self, dt: f64) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.duration - self.elapsed <= FINISH_TOLERANCE * self.duration.max(1.0) {
            self.elapsed = self.duration;
        }
        self.value()
    }

    pub fn value(&self) -> T {
        if self.is_finished() {
            return if self.yoyo { self.from } else { self.to };
        }
        let progress = self.elapsed / self.duration;
        let eased = if self.yoyo {
            let leg = progress * 2.0;
            if leg <= 1.0 {
                self.easing.apply(leg)
            } else {
                self.easing.apply(2.0 - leg)
            }
        } else {
            self.easing.apply(progress)
        };
        self.from.lerp(self.to, eased)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lands_exactly_on_target() {
        let mut tween = Tween::new(0.5, 3.6, 4.0, Easing::Power2Out);
        for _ in 0..240 {
            tween.advance(1.0 / 60.0);
        }
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 3.6);
    }

    #[test]
    fn sixtieths_finish_on_the_last_frame() {
        let mut tween = Tween::new(0.0, 1.0, 2.0, Easing::Power2In);
        for _ in 0..119 {
            tween.advance(1.0 / 60.0);
        }
        assert!(!tween.is_finished());
        tween.advance(1.0 / 60.0);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn overshooting_dt_is_clamped() {
        let mut tween = Tween::new(DVec3::ZERO, DVec3::ONE, 1.5, Easing::Power2Out);
        assert_eq!(tween.advance(100.0), DVec3::ONE);
        assert!(tween.is_finished());
    }

    #[test]
    fn negative_dt_does_not_rewind() {
        let mut tween = Tween::new(0.0, 1.0, 2.0, Easing::Linear);
        tween.advance(1.0);
        assert_eq!(tween.advance(-5.0), 0.5);
    }

    #[test]
    fn yoyo_peaks_midway_and_returns() {
        let mut tween = Tween::new(0.0, 1.0, 4.0, Easing::Power2Out).yoyo();
        assert_relative_eq!(tween.advance(2.0), 1.0, epsilon = 1e-12);
        assert!(tween.advance(1.0) > 0.0);
        assert_eq!(tween.advance(1.0), 0.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let tween = Tween::new(1.0, 2.0, 0.0, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 2.0);
    }
}
