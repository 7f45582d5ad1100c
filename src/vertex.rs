use glam::{DVec2, DVec3, DVec4};

/// Vertex as it flows through the rasterizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Homogeneous clip-space position
    pub clip: DVec4,
    /// World-space position, used for lighting and fog
    pub world: DVec3,
    /// World-space normal
    pub normal: DVec3,
    pub uv: DVec2,
}

impl Vertex {
    pub fn lerp(&self, other: &Vertex, t: f64) -> Vertex {
        Vertex {
            clip: self.clip.lerp(other.clip, t),
            world: self.world.lerp(other.world, t),
            normal: self.normal.lerp(other.normal, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// Vertex after the perspective divide and viewport transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub screen_position: DVec2,
    /// Normalized depth in `[0, 1]`
    pub depth: f64,
    /// Reciprocal clip W, for perspective-correct interpolation
    pub inv_w: f64,
    pub world: DVec3,
    pub normal: DVec3,
    pub uv: DVec2,
}
