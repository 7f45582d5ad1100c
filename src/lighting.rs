use crate::color::Rgba;
use crate::math::{lambert, specular};
use glam::DVec3;

/// Light arriving along a single direction, aimed from `position` at `target`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub position: DVec3,
    pub target: DVec3,
    pub color: Rgba,
    pub intensity: f64,
    pub cast_shadow: bool,
}

impl DirectionalLight {
    pub fn new(position: DVec3, color: Rgba, intensity: f64) -> Self {
        DirectionalLight {
            position,
            target: DVec3::ZERO,
            color,
            intensity,
            cast_shadow: false,
        }
    }

    /// Unit vector the light travels along
    pub fn direction(&self) -> DVec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgba,
    pub intensity: f64,
}

/// Linear distance fog between `near` and `far`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgba,
    pub near: f64,
    pub far: f64,
}

impl Fog {
    /// How much of the fog color to mix in at `distance` from the eye
    pub fn factor(&self, distance: f64) -> f64 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }

    pub fn apply(&self, color: Rgba, distance: f64) -> Rgba {
        color.lerp(self.color.with_alpha(color.a), self.factor(distance))
    }
}

/// Surface parameters needed to light one pixel
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    pub base: Rgba,
    pub normal: DVec3,
    /// Unit vector from the surface towards the eye
    pub view_dir: DVec3,
    /// Blinn-Phong exponent, `None` for purely diffuse surfaces
    pub shininess: Option<f64>,
    pub two_sided: bool,
}

const SPECULAR_COLOR: Rgba = Rgba::rgb(0.25, 0.25, 0.25);

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: Vec<DirectionalLight>,
}

impl Lighting {
    /// Lights `point`; `shadow` is the fraction of shadow-casting light that reaches it
    pub fn shade(&self, point: &SurfacePoint, shadow: f64) -> Rgba {
        let mut diffuse = self.ambient.color.scale(self.ambient.intensity);
        let mut highlight = Rgba::BLACK;

        for light in &self.directional {
            let direction = light.direction();
            let visibility = if light.cast_shadow { shadow } else { 1.0 };
            let radiance = light.color.scale(light.intensity * visibility);
            let n_dot_l = lambert(point.normal, direction, point.two_sided);
            diffuse = diffuse.add(radiance.scale(n_dot_l));

            if let Some(shininess) = point.shininess {
                if n_dot_l > 0.0 {
                    let s = specular(point.normal, direction, point.view_dir, shininess);
                    highlight = highlight.add(radiance.modulate(SPECULAR_COLOR).scale(s));
                }
            }
        }

        point
            .base
            .modulate(diffuse)
            .add(highlight)
            .with_alpha(point.base.a)
            .clamped()
    }
}
