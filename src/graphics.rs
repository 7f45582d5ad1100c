use crate::color::Rgba;
use crate::math::edge_function;
use crate::vertex::{ScreenVertex, Vertex};
use glam::{DVec2, DVec3};

/// Interpolated attributes for one covered pixel
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub x: usize,
    pub y: usize,
    pub depth: f64,
    pub world: DVec3,
    pub normal: DVec3,
    pub uv: DVec2,
}

/// Color and depth targets for one frame
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color: Vec<Rgba>,
    depth: Vec<f64>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            color: vec![Rgba::BLACK; width * height],
            depth: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.color = vec![Rgba::BLACK; width * height];
        self.depth = vec![f64::INFINITY; width * height];
    }

    pub fn clear(&mut self, color: Rgba) {
        self.color.fill(color);
        self.depth.fill(f64::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.color[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.color
    }

    /// Depth-tested write. Translucent colors are blended over what is
    /// already there and leave the depth buffer untouched.
    pub fn write(&mut self, x: usize, y: usize, depth: f64, color: Rgba) -> bool {
        let offset = y * self.width + x;
        if depth >= self.depth[offset] {
            return false;
        }
        if color.a < 1.0 {
            self.color[offset] = color.over(self.color[offset]);
        } else {
            self.depth[offset] = depth;
            self.color[offset] = color;
        }
        true
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f64 {
        self.depth[y * self.width + x]
    }
}

/// Clips a triangle against the near plane (`z >= -w`), returning a convex polygon
pub fn clip_near(triangle: [Vertex; 3]) -> Vec<Vertex> {
    let distance = |v: &Vertex| v.clip.z + v.clip.w;
    let mut output = Vec::with_capacity(4);

    for i in 0..3 {
        let current = &triangle[i];
        let next = &triangle[(i + 1) % 3];
        let d_current = distance(current);
        let d_next = distance(next);

        if d_current >= 0.0 {
            output.push(*current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            output.push(current.lerp(next, t));
        }
    }

    output
}

/// Perspective divide and viewport transform
pub fn to_screen(vertex: &Vertex, width: usize, height: usize) -> ScreenVertex {
    let inv_w = 1.0 / vertex.clip.w;
    let ndc = vertex.clip.truncate() * inv_w;
    ScreenVertex {
        screen_position: DVec2::new(
            (ndc.x * 0.5 + 0.5) * width as f64,
            (0.5 - ndc.y * 0.5) * height as f64,
        ),
        depth: ndc.z * 0.5 + 0.5,
        inv_w,
        world: vertex.world,
        normal: vertex.normal,
        uv: vertex.uv,
    }
}

/// Clips, projects and rasterizes a clip-space triangle, calling `visit` per covered pixel
pub fn rasterize_clipped<F>(triangle: [Vertex; 3], width: usize, height: usize, visit: &mut F)
where
    F: FnMut(Fragment),
{
    let polygon = clip_near(triangle);
    if polygon.len() < 3 {
        return;
    }
    let screen: Vec<ScreenVertex> = polygon
        .iter()
        .map(|v| to_screen(v, width, height))
        .collect();
    for i in 1..screen.len() - 1 {
        draw_triangle(&screen[0], &screen[i], &screen[i + 1], width, height, visit);
    }
}

/// Rasterizes a screen-space triangle of either winding
///
/// Attributes are interpolated perspective-correctly; depth is interpolated
/// linearly in screen space. Fragments outside `[0, 1]` depth are dropped.
pub fn draw_triangle<F>(
    v0: &ScreenVertex,
    v1: &ScreenVertex,
    v2: &ScreenVertex,
    width: usize,
    height: usize,
    visit: &mut F,
) where
    F: FnMut(Fragment),
{
    if width == 0 || height == 0 {
        return;
    }

    // Compute bounding box of the triangle
    let min_x = v0.screen_position.x.min(v1.screen_position.x).min(v2.screen_position.x);
    let max_x = v0.screen_position.x.max(v1.screen_position.x).max(v2.screen_position.x);
    let min_y = v0.screen_position.y.min(v1.screen_position.y).min(v2.screen_position.y);
    let max_y = v0.screen_position.y.max(v1.screen_position.y).max(v2.screen_position.y);
    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
        return;
    }
    if max_x < 0.0 || max_y < 0.0 || min_x > width as f64 || min_y > height as f64 {
        return;
    }
    let min_x = min_x.floor().max(0.0) as usize;
    let max_x = max_x.ceil().min(width as f64 - 1.0) as usize;
    let min_y = min_y.floor().max(0.0) as usize;
    let max_y = max_y.ceil().min(height as f64 - 1.0) as usize;

    let area = edge_function(v0.screen_position, v1.screen_position, v2.screen_position);
    if area == 0.0 {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);

            // Dividing by the signed area makes the weights positive inside
            // for both windings
            let w0 = edge_function(v1.screen_position, v2.screen_position, p) / area;
            let w1 = edge_function(v2.screen_position, v0.screen_position, p) / area;
            let w2 = edge_function(v0.screen_position, v1.screen_position, p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }

            let p0 = w0 * v0.inv_w;
            let p1 = w1 * v1.inv_w;
            let p2 = w2 * v2.inv_w;
            let sum = p0 + p1 + p2;
            if sum == 0.0 {
                continue;
            }
            let (p0, p1, p2) = (p0 / sum, p1 / sum, p2 / sum);

            visit(Fragment {
                x,
                y,
                depth,
                world: v0.world * p0 + v1.world * p1 + v2.world * p2,
                normal: (v0.normal * p0 + v1.normal * p1 + v2.normal * p2).normalize_or_zero(),
                uv: v0.uv * p0 + v1.uv * p1 + v2.uv * p2,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec4;

    fn screen(x: f64, y: f64) -> ScreenVertex {
        ScreenVertex {
            screen_position: DVec2::new(x, y),
            depth: 0.5,
            inv_w: 1.0,
            world: DVec3::ZERO,
            normal: DVec3::Z,
            uv: DVec2::new(x / 10.0, y / 10.0),
        }
    }

    fn clip(z: f64, w: f64) -> Vertex {
        Vertex {
            clip: DVec4::new(0.0, 0.0, z, w),
            world: DVec3::ZERO,
            normal: DVec3::Z,
            uv: DVec2::ZERO,
        }
    }

    #[test]
    fn both_windings_cover_the_same_pixels() {
        let (a, b, c) = (screen(1.0, 1.0), screen(9.0, 1.0), screen(1.0, 9.0));
        let mut forward = Vec::new();
        draw_triangle(&a, &b, &c, 10, 10, &mut |f: Fragment| forward.push((f.x, f.y)));
        let mut backward = Vec::new();
        draw_triangle(&a, &c, &b, 10, 10, &mut |f: Fragment| backward.push((f.x, f.y)));
        assert!(!forward.is_empty());
        assert_eq!(forward, backward);
    }

    #[test]
    fn uv_interpolates_across_triangle() {
        let (a, b, c) = (screen(0.0, 0.0), screen(10.0, 0.0), screen(0.0, 10.0));
        draw_triangle(&a, &b, &c, 10, 10, &mut |f: Fragment| {
            assert!((f.uv.x - (f.x as f64 + 0.5) / 10.0).abs() < 1e-9);
            assert!((f.uv.y - (f.y as f64 + 0.5) / 10.0).abs() < 1e-9);
        });
    }

    #[test]
    fn near_clipping() {
        let inside = clip_near([clip(0.0, 1.0), clip(0.5, 1.0), clip(0.2, 1.0)]);
        assert_eq!(inside.len(), 3);
        let outside = clip_near([clip(-2.0, 1.0), clip(-3.0, 1.0), clip(-5.0, 1.0)]);
        assert!(outside.is_empty());
        let straddling = clip_near([clip(0.0, 1.0), clip(-3.0, 1.0), clip(0.5, 1.0)]);
        assert_eq!(straddling.len(), 4);
        for v in &straddling {
            assert!(v.clip.z + v.clip.w >= -1e-12);
        }
    }

    #[test]
    fn translucent_writes_blend_without_depth() {
        let mut target = Framebuffer::new(1, 1);
        target.clear(Rgba::BLACK);
        assert!(target.write(0, 0, 0.5, Rgba::WHITE.with_alpha(0.5)));
        assert_eq!(target.depth_at(0, 0), f64::INFINITY);
        assert!((target.pixel(0, 0).r - 0.5).abs() < 1e-12);
        assert!(target.write(0, 0, 0.4, Rgba::WHITE));
        assert!(!target.write(0, 0, 0.6, Rgba::BLACK));
        assert_eq!(target.pixel(0, 0), Rgba::WHITE);
    }
}
