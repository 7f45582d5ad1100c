//! Shadow map for the key light.
//!
//! Casters are rasterized into a depth buffer from the light's orthographic
//! view; receivers then compare their own light-space depth against it with a
//! 3×3 percentage-closer filter.

use crate::graphics::{rasterize_clipped, Fragment};
use crate::lighting::DirectionalLight;
use crate::mesh::Mesh;
use crate::vertex::Vertex;
use glam::{DMat4, DVec3};
use log::trace;

pub const DEFAULT_MAP_SIZE: usize = 256;
/// Half extent of the light's orthographic frustum
pub const FRUSTUM_HALF_EXTENT: f64 = 5.0;
pub const FRUSTUM_NEAR: f64 = 0.5;
pub const FRUSTUM_FAR: f64 = 50.0;
const DEPTH_BIAS: f64 = 0.003;

#[derive(Debug, Clone)]
pub struct ShadowMap {
    size: usize,
    view_projection: DMat4,
    depth: Vec<f64>,
}

impl ShadowMap {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        ShadowMap {
            size,
            view_projection: DMat4::IDENTITY,
            depth: vec![f64::INFINITY; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Clears the map and aims it along `light`
    pub fn begin(&mut self, light: &DirectionalLight) {
        let up = if light.direction().cross(DVec3::Y).length_squared() < 1e-12 {
            DVec3::Z
        } else {
            DVec3::Y
        };
        let view = DMat4::look_at_rh(light.position, light.target, up);
        let projection = DMat4::orthographic_rh_gl(
            -FRUSTUM_HALF_EXTENT,
            FRUSTUM_HALF_EXTENT,
            -FRUSTUM_HALF_EXTENT,
            FRUSTUM_HALF_EXTENT,
            FRUSTUM_NEAR,
            FRUSTUM_FAR,
        );
        self.view_projection = projection * view;
        self.depth.fill(f64::INFINITY);
    }

    /// Adds a caster's depth to the map
    pub fn render_caster(&mut self, mesh: &Mesh, model: &DMat4) {
        let size = self.size;
        let mvp = self.view_projection * *model;
        let depth = &mut self.depth;
        let mut visit = |fragment: Fragment| {
            let slot = &mut depth[fragment.y * size + fragment.x];
            if fragment.depth < *slot {
                *slot = fragment.depth;
            }
        };

        for &[a, b, c] in &mesh.triangles {
            let triangle = [a, b, c].map(|i| {
                let position = mesh.positions[i as usize];
                Vertex {
                    clip: mvp * position.extend(1.0),
                    world: position,
                    normal: DVec3::ZERO,
                    uv: mesh.uvs[i as usize],
                }
            });
            rasterize_clipped(triangle, size, size, &mut visit);
        }
        trace!("shadow caster with {} triangles", mesh.triangle_count());
    }

    /// Fraction of light reaching `world`, 1 when fully lit
    pub fn visibility(&self, world: DVec3) -> f64 {
        let clip = self.view_projection * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let depth = ndc.z * 0.5 + 0.5;
        if !(0.0..=1.0).contains(&depth) {
            return 1.0;
        }
        let fx = (ndc.x * 0.5 + 0.5) * self.size as f64;
        let fy = (0.5 - ndc.y * 0.5) * self.size as f64;
        if fx < 0.0 || fy < 0.0 || fx >= self.size as f64 || fy >= self.size as f64 {
            return 1.0;
        }

        let (cx, cy) = (fx as isize, fy as isize);
        let mut lit = 0;
        let mut taps = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= self.size as isize || y >= self.size as isize {
                    continue;
                }
                taps += 1;
                if depth - DEPTH_BIAS <= self.depth[y as usize * self.size + x as usize] {
                    lit += 1;
                }
            }
        }
        lit as f64 / taps as f64
    }
}
