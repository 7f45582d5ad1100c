//! Orbit camera controls.
//!
//! Rotate, pan and zoom around a target point with inertial damping, in the
//! style of the usual web orbit controller: input accumulates a pending
//! delta and every update applies a fraction of it, so motion eases out after
//! the user lets go.

use crate::camera::{PerspectiveCamera, HOME_POSITION, HOME_TARGET};
use crate::easing::Easing;
use crate::math::{offset_to_spherical, spherical_to_offset};
use crate::tween::Tween;
use glam::DVec3;
use log::{debug, trace};
use std::f64::consts::{PI, TAU};

pub const DAMPING_FACTOR: f64 = 0.05;
pub const MIN_DISTANCE: f64 = 2.0;
pub const MAX_DISTANCE: f64 = 20.0;
/// Keeps the camera above the ground plane
pub const MAX_POLAR_ANGLE: f64 = PI / 1.8;
pub const RESET_DURATION: f64 = 1.5;
/// Dolly factor for one zoom step
pub const ZOOM_STEP: f64 = 0.95;
const EPS: f64 = 1e-6;
/// Residual motion below which the controls consider themselves at rest
const REST_THRESHOLD: f64 = 1e-9;

#[derive(Debug, Clone)]
struct ViewTransition {
    position: Tween<DVec3>,
    target: Tween<DVec3>,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: DVec3,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,
    /// Pending (polar, azimuth) change in radians
    spherical_delta: (f64, f64),
    scale: f64,
    pan_offset: DVec3,
    transition: Option<ViewTransition>,
}

impl OrbitControls {
    pub fn new(target: DVec3) -> Self {
        OrbitControls {
            target,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            min_polar_angle: 0.0,
            max_polar_angle: MAX_POLAR_ANGLE,
            spherical_delta: (0.0, 0.0),
            scale: 1.0,
            pan_offset: DVec3::ZERO,
            transition: None,
        }
    }

    /// Orbits by a drag of `(dx, dy)` pixels on a surface `height` pixels tall
    pub fn rotate(&mut self, dx: f64, dy: f64, height: f64) {
        if !self.enable_rotate || height <= 0.0 {
            return;
        }
        self.cancel_transition();
        self.spherical_delta.1 -= TAU * dx / height;
        self.spherical_delta.0 -= TAU * dy / height;
    }

    /// Pans by a drag of `(dx, dy)` pixels, keeping the motion in the ground plane
    pub fn pan(&mut self, dx: f64, dy: f64, height: f64, camera: &PerspectiveCamera) {
        if !self.enable_pan || height <= 0.0 {
            return;
        }
        self.cancel_transition();
        let offset = camera.position - self.target;
        let distance = offset.length() * (camera.fov_y / 2.0).tan();

        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let along_ground = camera.up.cross(right).normalize_or_zero();

        self.pan_offset -= right * (2.0 * dx * distance / height);
        self.pan_offset += along_ground * (2.0 * dy * distance / height);
    }

    /// Positive steps move closer, negative steps move away
    pub fn zoom(&mut self, steps: f64) {
        if !self.enable_zoom {
            return;
        }
        self.cancel_transition();
        self.scale *= ZOOM_STEP.powf(steps);
    }

    /// Glides the camera back to its home pose
    pub fn reset_view(&mut self, camera: &PerspectiveCamera) {
        debug!("resetting camera view");
        self.spherical_delta = (0.0, 0.0);
        self.scale = 1.0;
        self.pan_offset = DVec3::ZERO;
        self.transition = Some(ViewTransition {
            position: Tween::new(
                camera.position,
                HOME_POSITION,
                RESET_DURATION,
                Easing::Power2Out,
            ),
            target: Tween::new(self.target, HOME_TARGET, RESET_DURATION, Easing::Power2Out),
        });
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Drops any scripted transition and pending motion, freezing the camera
    pub fn stop(&mut self) {
        self.transition = None;
        self.spherical_delta = (0.0, 0.0);
        self.scale = 1.0;
        self.pan_offset = DVec3::ZERO;
    }

    fn cancel_transition(&mut self) {
        if self.transition.take().is_some() {
            debug!("camera reset interrupted by user input");
        }
    }

    fn is_at_rest(&self) -> bool {
        self.spherical_delta.0.abs() < REST_THRESHOLD
            && self.spherical_delta.1.abs() < REST_THRESHOLD
            && (self.scale - 1.0).abs() < REST_THRESHOLD
            && self.pan_offset.length_squared() < REST_THRESHOLD * REST_THRESHOLD
    }

    /// Applies pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt: f64) -> bool {
        if let Some(transition) = self.transition.as_mut() {
            camera.position = transition.position.advance(dt);
            self.target = transition.target.advance(dt);
            if transition.position.is_finished() && transition.target.is_finished() {
                self.transition = None;
            }
            camera.look_at(self.target);
            return true;
        }

        if self.is_at_rest() {
            self.spherical_delta = (0.0, 0.0);
            self.scale = 1.0;
            self.pan_offset = DVec3::ZERO;
            return false;
        }

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let (radius, polar, azimuth) = offset_to_spherical(camera.position - self.target);
        let azimuth = azimuth + self.spherical_delta.1 * factor;
        let polar = (polar + self.spherical_delta.0 * factor)
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * factor;
        camera.position = self.target + spherical_to_offset(radius, polar, azimuth);
        camera.look_at(self.target);
        trace!("orbit r={radius:.3} polar={polar:.3} azimuth={azimuth:.3}");

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.spherical_delta.0 *= keep;
            self.spherical_delta.1 *= keep;
            self.pan_offset *= keep;
        } else {
            self.spherical_delta = (0.0, 0.0);
            self.pan_offset = DVec3::ZERO;
        }
        self.scale = 1.0;
        true
    }
}
