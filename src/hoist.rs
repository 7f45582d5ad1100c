//! Raising and lowering the flag.
//!
//! The hoist is a four-state machine. Commands are accepted only from the
//! state that permits them, so the raise and lower tweens can never drive the
//! cloth at the same time.

use crate::easing::{Easing, DEFAULT_BACK_OVERSHOOT};
use crate::tween::{Lerp, Tween};
use log::{debug, info};
use std::f64::consts::PI;
use std::fmt;

/// Cloth Y offset at the foot of the pole
pub const LOWERED_Y: f64 = 0.5;
/// Cloth Y offset at the top of the pole
pub const HOISTED_Y: f64 = 3.6;
pub const HOIST_DURATION: f64 = 4.0;
pub const LOWER_DURATION: f64 = 2.0;
/// Peak of the yaw wobble while hoisting
pub const HOIST_YAW: f64 = PI * 0.1;
pub const MESSAGE_DURATION: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoistState {
    #[default]
    Lowered,
    Hoisting,
    Hoisted,
    Lowering,
}

impl fmt::Display for HoistState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HoistState::Lowered => "lowered",
            HoistState::Hoisting => "hoisting",
            HoistState::Hoisted => "hoisted",
            HoistState::Lowering => "lowering",
        };
        f.write_str(name)
    }
}

/// Animated presentation of the celebration message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessagePose {
    pub opacity: f64,
    pub scale: f64,
    /// Downward offset in pixels
    pub offset_y: f64,
}

impl MessagePose {
    pub const HIDDEN: MessagePose = MessagePose {
        opacity: 0.0,
        scale: 0.5,
        offset_y: 50.0,
    };
    pub const SHOWN: MessagePose = MessagePose {
        opacity: 1.0,
        scale: 1.0,
        offset_y: 0.0,
    };
}

impl Lerp for MessagePose {
    fn lerp(self, other: Self, t: f64) -> Self {
        MessagePose {
            opacity: self.opacity.lerp(other.opacity, t),
            scale: self.scale.lerp(other.scale, t),
            offset_y: self.offset_y.lerp(other.offset_y, t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hoist {
    state: HoistState,
    cloth_y: f64,
    yaw: f64,
    lift: Option<Tween<f64>>,
    swing: Option<Tween<f64>>,
    message_visible: bool,
    message_pose: MessagePose,
    entrance: Option<Tween<MessagePose>>,
}

impl Default for Hoist {
    fn default() -> Self {
        Self::new()
    }
}

impl Hoist {
    pub fn new() -> Self {
        Hoist {
            state: HoistState::Lowered,
            cloth_y: LOWERED_Y,
            yaw: 0.0,
            lift: None,
            swing: None,
            message_visible: false,
            message_pose: MessagePose::HIDDEN,
            entrance: None,
        }
    }

    pub fn state(&self) -> HoistState {
        self.state
    }

    pub fn cloth_y(&self) -> f64 {
        self.cloth_y
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn message_visible(&self) -> bool {
        self.message_visible
    }

    pub fn message_pose(&self) -> MessagePose {
        self.message_pose
    }

    /// Starts raising the flag. Ignored unless the flag is lowered.
    pub fn hoist(&mut self) -> bool {
        if self.state != HoistState::Lowered {
            debug!("hoist ignored while {}", self.state);
            return false;
        }
        info!("hoisting flag");
        self.state = HoistState::Hoisting;
        self.lift = Some(Tween::new(
            self.cloth_y,
            HOISTED_Y,
            HOIST_DURATION,
            Easing::Power2Out,
        ));
        self.swing = Some(
            Tween::new(self.yaw, HOIST_YAW, HOIST_DURATION, Easing::Power2Out).yoyo(),
        );
        true
    }

    /// Starts lowering the flag and hides the message. Ignored unless hoisted.
    pub fn reset(&mut self) -> bool {
        if self.state != HoistState::Hoisted {
            debug!("reset ignored while {}", self.state);
            return false;
        }
        info!("lowering flag");
        self.state = HoistState::Lowering;
        self.message_visible = false;
        self.message_pose = MessagePose::HIDDEN;
        self.entrance = None;
        self.lift = Some(Tween::new(
            self.cloth_y,
            LOWERED_Y,
            LOWER_DURATION,
            Easing::Power2In,
        ));
        self.swing = Some(Tween::new(self.yaw, 0.0, LOWER_DURATION, Easing::Power2In));
        true
    }

    /// Advances every running tween by `dt` and settles finished transitions
    pub fn update(&mut self, dt: f64) {
        if let Some(swing) = self.swing.as_mut() {
            self.yaw = swing.advance(dt);
            if swing.is_finished() {
                self.swing = None;
            }
        }

        if let Some(entrance) = self.entrance.as_mut() {
            self.message_pose = entrance.advance(dt);
            if entrance.is_finished() {
                self.entrance = None;
            }
        }

        if let Some(lift) = self.lift.as_mut() {
            self.cloth_y = lift.advance(dt);
            if lift.is_finished() {
                self.lift = None;
                self.settle();
            }
        }
    }

    fn settle(&mut self) {
        match self.state {
            HoistState::Hoisting => {
                info!("flag hoisted");
                self.state = HoistState::Hoisted;
                self.message_visible = true;
                self.entrance = Some(Tween::new(
                    MessagePose::HIDDEN,
                    MessagePose::SHOWN,
                    MESSAGE_DURATION,
                    Easing::BackOut(DEFAULT_BACK_OVERSHOOT),
                ));
            }
            HoistState::Lowering => {
                info!("flag lowered");
                self.state = HoistState::Lowered;
            }
            HoistState::Lowered | HoistState::Hoisted => {}
        }
    }

    /// Drops every in-flight tween, freezing the current pose
    pub fn stop(&mut self) {
        self.lift = None;
        self.swing = None;
        self.entrance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(hoist: &mut Hoist, seconds: f64) {
        let steps = (seconds / 0.25).round() as usize;
        for _ in 0..steps {
            hoist.update(0.25);
        }
    }

    #[test]
    fn hoist_reaches_top_and_shows_message() {
        let mut hoist = Hoist::new();
        assert!(hoist.hoist());
        assert_eq!(hoist.state(), HoistState::Hoisting);
        run(&mut hoist, 2.0);
        assert!(hoist.cloth_y() > LOWERED_Y && hoist.cloth_y() < HOISTED_Y);
        assert!(!hoist.message_visible());
        run(&mut hoist, 2.0);
        assert_eq!(hoist.cloth_y(), HOISTED_Y);
        assert_eq!(hoist.state(), HoistState::Hoisted);
        assert!(hoist.message_visible());
        assert_eq!(hoist.yaw(), 0.0);
    }

    #[test]
    fn display_rate_frames_finish_on_time() {
        let mut hoist = Hoist::new();
        hoist.hoist();
        for _ in 0..240 {
            hoist.update(1.0 / 60.0);
        }
        assert_eq!(hoist.state(), HoistState::Hoisted);
        assert_eq!(hoist.cloth_y(), HOISTED_Y);
        assert!(hoist.message_visible());

        assert!(hoist.reset());
        for _ in 0..120 {
            hoist.update(1.0 / 60.0);
        }
        assert_eq!(hoist.state(), HoistState::Lowered);
        assert_eq!(hoist.cloth_y(), LOWERED_Y);
        assert_eq!(hoist.yaw(), 0.0);
    }

    #[test]
    fn yaw_wobbles_during_hoist() {
        let mut hoist = Hoist::new();
        hoist.hoist();
        run(&mut hoist, 2.0);
        assert!((hoist.yaw() - HOIST_YAW).abs() < 1e-12);
    }

    #[test]
    fn double_hoist_is_single_hoist() {
        let mut once = Hoist::new();
        once.hoist();
        let mut twice = Hoist::new();
        twice.hoist();
        run(&mut once, 1.0);
        run(&mut twice, 1.0);
        assert!(!twice.hoist());
        run(&mut once, 3.0);
        run(&mut twice, 3.0);
        assert_eq!(once.cloth_y(), twice.cloth_y());
        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn reset_while_lowered_is_noop() {
        let mut hoist = Hoist::new();
        assert!(!hoist.reset());
        assert_eq!(hoist.state(), HoistState::Lowered);
        assert_eq!(hoist.cloth_y(), LOWERED_Y);
        hoist.update(1.0);
        assert_eq!(hoist.cloth_y(), LOWERED_Y);
    }

    #[test]
    fn reset_mid_hoist_is_rejected() {
        let mut hoist = Hoist::new();
        hoist.hoist();
        run(&mut hoist, 1.0);
        assert!(!hoist.reset());
        assert_eq!(hoist.state(), HoistState::Hoisting);
    }

    #[test]
    fn reset_returns_to_rest() {
        let mut hoist = Hoist::new();
        hoist.hoist();
        run(&mut hoist, 4.0);
        run(&mut hoist, 0.75);
        assert!(hoist.reset());
        assert!(!hoist.message_visible());
        assert_eq!(hoist.message_pose(), MessagePose::HIDDEN);
        assert!(!hoist.hoist());
        run(&mut hoist, 2.0);
        assert_eq!(hoist.cloth_y(), LOWERED_Y);
        assert_eq!(hoist.yaw(), 0.0);
        assert_eq!(hoist.state(), HoistState::Lowered);
        assert!(hoist.hoist());
    }

    #[test]
    fn message_entrance_settles() {
        let mut hoist = Hoist::new();
        hoist.hoist();
        run(&mut hoist, 4.0);
        assert_eq!(hoist.message_pose(), MessagePose::HIDDEN);
        run(&mut hoist, MESSAGE_DURATION);
        assert_eq!(hoist.message_pose(), MessagePose::SHOWN);
    }
}
