use glam::{DVec2, DVec3};

/// Edge function used in rasterization
pub fn edge_function(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a).normalize()
}

/// Diffuse term for a surface normal facing a light travelling along `light_dir`
///
/// `light_dir` points from the light towards the scene. Two-sided surfaces
/// pass `two_sided` so the back face is lit as if it faced the light.
pub fn lambert(normal: DVec3, light_dir: DVec3, two_sided: bool) -> f64 {
    let d = normal.dot(-light_dir);
    if two_sided {
        d.abs()
    } else {
        d.max(0.0)
    }
}

/// Blinn-Phong specular term
pub fn specular(normal: DVec3, light_dir: DVec3, view_dir: DVec3, shininess: f64) -> f64 {
    let half = (-light_dir + view_dir).normalize_or_zero();
    normal.dot(half).max(0.0).powf(shininess)
}

/// Converts spherical coordinates (radius, polar from +Y, azimuth around Y) to an offset
pub fn spherical_to_offset(radius: f64, polar: f64, azimuth: f64) -> DVec3 {
    let (sin_polar, cos_polar) = polar.sin_cos();
    DVec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * cos_polar,
        radius * sin_polar * azimuth.cos(),
    )
}

/// Inverse of [`spherical_to_offset`], returning `(radius, polar, azimuth)`
pub fn offset_to_spherical(offset: DVec3) -> (f64, f64, f64) {
    let radius = offset.length();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
    let azimuth = offset.x.atan2(offset.z);
    (radius, polar, azimuth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn edge_function_sign_tracks_winding() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(1.0, 0.0);
        let c = DVec2::new(0.0, 1.0);
        assert!(edge_function(a, b, c) < 0.0);
        assert!(edge_function(a, c, b) > 0.0);
    }

    #[test]
    fn normal_of_xy_triangle() {
        let n = calculate_normal(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert_eq!(n, DVec3::Z);
    }

    #[test]
    fn spherical_round_trip() {
        let offset = DVec3::new(5.0, 2.0, 7.0);
        let (r, polar, azimuth) = offset_to_spherical(offset);
        let back = spherical_to_offset(r, polar, azimuth);
        assert_relative_eq!(back.x, offset.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, offset.y, epsilon = 1e-9);
        assert_relative_eq!(back.z, offset.z, epsilon = 1e-9);
    }

    #[test]
    fn lambert_two_sided() {
        let down = DVec3::NEG_Y;
        assert_eq!(lambert(DVec3::Y, down, false), 1.0);
        assert_eq!(lambert(DVec3::NEG_Y, down, false), 0.0);
        assert_eq!(lambert(DVec3::NEG_Y, down, true), 1.0);
    }
}
