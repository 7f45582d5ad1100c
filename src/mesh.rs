//! Indexed triangle meshes and the procedural shapes the scene is built from.

use crate::math::calculate_normal;
use crate::wave::{self, wave_offset};
use glam::{DVec2, DVec3};
use log::warn;
use rand::Rng;
use std::f64::consts::{PI, TAU};

/// Triangle mesh with per-vertex normals and texture coordinates
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub uvs: Vec<DVec2>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its index
    pub fn add_vertex(&mut self, position: DVec3, normal: DVec3, uv: DVec2) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        (self.positions.len() - 1) as u32
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Rebuilds smooth normals from the current positions
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.positions.len()];
        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let normal = calculate_normal(self.positions[a], self.positions[b], self.positions[c]);
            if !normal.is_finite() {
                continue;
            }
            for index in [a, b, c] {
                normals[index] += normal;
            }
        }
        for normal in normals.iter_mut() {
            *normal = normal.normalize_or_zero();
        }
        self.normals = normals;
    }

    /// Flat plane in the XY plane facing +Z, centred on the origin
    pub fn plane(width: f64, height: f64, segments_x: u32, segments_y: u32) -> Self {
        let segments_x = segments_x.max(1);
        let segments_y = segments_y.max(1);
        let mut mesh = Mesh::new();

        // Rows run from the top edge down, matching the usual plane layout
        for row in 0..=segments_y {
            let v = 1.0 - row as f64 / segments_y as f64;
            for col in 0..=segments_x {
                let u = col as f64 / segments_x as f64;
                let position = DVec3::new((u - 0.5) * width, (v - 0.5) * height, 0.0);
                mesh.add_vertex(position, DVec3::Z, DVec2::new(u, v));
            }
        }

        let stride = segments_x + 1;
        for row in 0..segments_y {
            for col in 0..segments_x {
                let a = row * stride + col;
                let b = a + stride;
                let c = b + 1;
                let d = a + 1;
                mesh.add_triangle(a, b, d);
                mesh.add_triangle(b, c, d);
            }
        }

        mesh
    }

    /// Capped cylinder (or frustum) along Y, centred on the origin
    pub fn cylinder(radius_top: f64, radius_bottom: f64, height: f64, segments: u32) -> Self {
        let height = if height <= 0.0 {
            warn!("cylinder height must be > 0, clamping to 0.001");
            0.001
        } else {
            height
        };
        let segments = segments.clamp(3, 256);
        let half = height * 0.5;
        let slope = (radius_bottom - radius_top) / height;
        let mut mesh = Mesh::new();

        for i in 0..=segments {
            let u = i as f64 / segments as f64;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = DVec3::new(sin, slope, cos).normalize();
            mesh.add_vertex(
                DVec3::new(radius_top * sin, half, radius_top * cos),
                normal,
                DVec2::new(u, 1.0),
            );
            mesh.add_vertex(
                DVec3::new(radius_bottom * sin, -half, radius_bottom * cos),
                normal,
                DVec2::new(u, 0.0),
            );
        }
        for i in 0..segments {
            let top = i * 2;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;
            mesh.add_triangle(top, bottom, next_top);
            mesh.add_triangle(bottom, next_bottom, next_top);
        }

        let caps = [
            (radius_top, half, DVec3::Y),
            (radius_bottom, -half, DVec3::NEG_Y),
        ];
        for (radius, y, normal) in caps {
            if radius <= 0.0 {
                continue;
            }
            let center = mesh.add_vertex(DVec3::new(0.0, y, 0.0), normal, DVec2::splat(0.5));
            let first = mesh.vertex_count() as u32;
            for i in 0..=segments {
                let theta = i as f64 / segments as f64 * TAU;
                let (sin, cos) = theta.sin_cos();
                mesh.add_vertex(
                    DVec3::new(radius * sin, y, radius * cos),
                    normal,
                    DVec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin),
                );
            }
            for i in 0..segments {
                mesh.add_triangle(center, first + i, first + i + 1);
            }
        }

        mesh
    }

    /// UV sphere centred on the origin
    pub fn sphere(radius: f64, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.clamp(3, 256);
        let height_segments = height_segments.clamp(2, 256);
        let mut mesh = Mesh::new();

        for ring in 0..=height_segments {
            let v = ring as f64 / height_segments as f64;
            let phi = v * PI;
            for seg in 0..=width_segments {
                let u = seg as f64 / width_segments as f64;
                let theta = u * TAU;
                let normal = DVec3::new(
                    -theta.cos() * phi.sin(),
                    phi.cos(),
                    theta.sin() * phi.sin(),
                );
                mesh.add_vertex(normal * radius, normal, DVec2::new(u, 1.0 - v));
            }
        }

        let stride = width_segments + 1;
        for ring in 0..height_segments {
            for seg in 0..width_segments {
                let a = ring * stride + seg + 1;
                let b = ring * stride + seg;
                let c = (ring + 1) * stride + seg;
                let d = (ring + 1) * stride + seg + 1;
                if ring != 0 {
                    mesh.add_triangle(a, b, d);
                }
                if ring != height_segments - 1 {
                    mesh.add_triangle(b, c, d);
                }
            }
        }

        mesh
    }
}

pub const CLOTH_WIDTH: f64 = wave::WIDTH;
pub const CLOTH_HEIGHT: f64 = 0.8;
pub const CLOTH_SEGMENTS_X: u32 = 20;
pub const CLOTH_SEGMENTS_Y: u32 = 15;
/// Full width of the static Z jitter band
pub const CLOTH_JITTER: f64 = 0.03;

/// The flag surface: a subdivided plane that is re-displaced every frame
#[derive(Debug, Clone)]
pub struct ClothMesh {
    rest: Vec<DVec3>,
    mesh: Mesh,
}

impl ClothMesh {
    /// Builds the cloth, applying a one-off random Z jitter to the rest pose
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut mesh = Mesh::plane(
            CLOTH_WIDTH,
            CLOTH_HEIGHT,
            CLOTH_SEGMENTS_X,
            CLOTH_SEGMENTS_Y,
        );

        for (position, uv) in mesh.positions.iter_mut().zip(mesh.uvs.iter_mut()) {
            position.z = (rng.gen::<f64>() - 0.5) * CLOTH_JITTER;
            *uv = DVec2::new(
                (position.x + CLOTH_WIDTH / 2.0) / CLOTH_WIDTH,
                (position.y + CLOTH_HEIGHT / 2.0) / CLOTH_HEIGHT,
            );
        }

        let rest = mesh.positions.clone();
        mesh.compute_normals();
        ClothMesh { rest, mesh }
    }

    pub fn rest_positions(&self) -> &[DVec3] {
        &self.rest
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Moves every vertex to its rest pose plus the wave at time `t`
    pub fn displace(&mut self, t: f64) {
        for (position, rest) in self.mesh.positions.iter_mut().zip(&self.rest) {
            position.z = rest.z + wave_offset(rest.x, rest.y, t);
        }
        self.mesh.compute_normals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn plane_layout() {
        let plane = Mesh::plane(1.2, 0.8, 20, 15);
        assert_eq!(plane.vertex_count(), 21 * 16);
        assert_eq!(plane.triangle_count(), 20 * 15 * 2);
        assert_eq!(plane.positions[0], DVec3::new(-0.6, 0.4, 0.0));
    }

    #[test]
    fn cloth_uvs_follow_rest_pose() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloth = ClothMesh::new(&mut rng);
        for (p, uv) in cloth.rest_positions().iter().zip(&cloth.mesh().uvs) {
            assert!((uv.x - (p.x + 0.6) / 1.2).abs() < 1e-12);
            assert!((uv.y - (p.y + 0.4) / 0.8).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
            assert!(p.z.abs() <= CLOTH_JITTER / 2.0);
        }
    }

    #[test]
    fn jitter_is_static() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cloth = ClothMesh::new(&mut rng);
        let rest = cloth.rest_positions().to_vec();
        let uvs = cloth.mesh().uvs.clone();
        cloth.displace(1.0);
        cloth.displace(2.5);
        assert_eq!(cloth.rest_positions(), rest.as_slice());
        assert_eq!(cloth.mesh().uvs, uvs);
    }

    #[test]
    fn displacement_keeps_pole_edge_fixed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cloth = ClothMesh::new(&mut rng);
        cloth.displace(4.2);
        for (p, rest) in cloth.mesh().positions.iter().zip(cloth.rest_positions()) {
            if (rest.x + 0.6).abs() < 1e-9 {
                assert_eq!(p.z, rest.z);
            }
            assert_eq!(p.x, rest.x);
            assert_eq!(p.y, rest.y);
        }
    }

    #[test]
    fn primitive_normals_are_unit() {
        for mesh in [Mesh::cylinder(0.03, 0.05, 4.0, 12), Mesh::sphere(0.5, 8, 8)] {
            for n in &mesh.normals {
                assert!((n.length() - 1.0).abs() < 1e-9);
            }
            for tri in &mesh.triangles {
                for &i in tri {
                    assert!((i as usize) < mesh.vertex_count());
                }
            }
        }
    }
}
