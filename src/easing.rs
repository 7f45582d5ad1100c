//! Named easing curves.
//!
//! Each curve maps normalized progress `t ∈ [0, 1]` to eased progress with
//! `ease(0) = 0` and `ease(1) = 1`. The `power2` family is cubic, following
//! the common tweening convention where `power1` is quadratic.

/// Overshoot used by the message entrance
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Accelerates from rest
    Power2In,
    /// Decelerates into the target
    Power2Out,
    /// Overshoots the target by an amount set by the parameter, then settles
    BackOut(f64),
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power2In => t * t * t,
            Easing::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::BackOut(overshoot) => {
                let p = t - 1.0;
                1.0 + (overshoot + 1.0) * p * p * p + overshoot * p * p
            }
        }
    }
}
