use glam::{DMat4, DVec3};
use log::trace;

pub const FOV_DEGREES: f64 = 45.0;
pub const NEAR: f64 = 0.1;
pub const FAR: f64 = 100.0;
pub const HOME_POSITION: DVec3 = DVec3::new(5.0, 4.0, 7.0);
/// Resting centroid of the scene the camera orbits
pub const HOME_TARGET: DVec3 = DVec3::new(0.0, 2.0, 0.0);

/// Perspective camera looking from `position` towards `target`
///
/// Right-handed, Y-up. Projection maps depth to `[-1, 1]` in NDC before the
/// rasterizer remaps it to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view in radians
    pub fov_y: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        PerspectiveCamera {
            position: DVec3::ZERO,
            target: DVec3::NEG_Z,
            up: DVec3::Y,
            fov_y: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Camera in its home pose for a surface of the given aspect ratio
    pub fn home(aspect: f64) -> Self {
        let mut camera = PerspectiveCamera::new(FOV_DEGREES, aspect, NEAR, FAR);
        camera.position = HOME_POSITION;
        camera.look_at(HOME_TARGET);
        camera
    }

    pub fn look_at(&mut self, target: DVec3) {
        self.target = target;
        trace!("camera looking at {target:?} from {:?}", self.position);
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> DVec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn target_projects_to_screen_center() {
        let camera = PerspectiveCamera::home(16.0 / 9.0);
        let clip = camera.view_projection() * HOME_TARGET.extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-9);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-9);
        let ndc_z = clip.z / clip.w;
        assert!((-1.0..=1.0).contains(&ndc_z));
    }

    #[test]
    fn points_behind_are_culled_by_w() {
        let camera = PerspectiveCamera::home(1.0);
        let behind = camera.position - camera.forward();
        let clip = camera.view_projection() * behind.extend(1.0);
        assert!(clip.w < 0.0);
    }
}
