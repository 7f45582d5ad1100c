//! The objects, lights and atmosphere that make up the flag scene.

use crate::color::Rgba;
use crate::lighting::{AmbientLight, DirectionalLight, Fog, Lighting};
use crate::mesh::{ClothMesh, Mesh};
use glam::{DMat4, DQuat, DVec3, EulerRot};
use log::debug;
use rand::Rng;
use std::f64::consts::FRAC_PI_2;

pub const SKY: u32 = 0x87ceeb;
pub const FOG_NEAR: f64 = 10.0;
pub const FOG_FAR: f64 = 100.0;
pub const POLE_X: f64 = -0.6;
pub const POLE_HEIGHT: f64 = 4.0;
pub const CLOUD_COUNT: usize = 5;

/// Position, Euler rotation (XYZ order) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: DVec3) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> DMat4 {
        let rotation = DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        DMat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// How a surface is colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse only
    Lambert { color: Rgba },
    /// Diffuse plus a specular highlight
    Phong { color: Rgba, shininess: f64 },
    /// Unlit procedural flag pattern, visible from both sides
    Flag,
}

impl Material {
    /// Materials with alpha below one go in the blended pass
    pub fn is_transparent(&self) -> bool {
        match self {
            Material::Lambert { color } | Material::Phong { color, .. } => color.a < 1.0,
            Material::Flag => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    pub transform: Transform,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl SceneObject {
    fn new(name: &str, mesh: Mesh, transform: Transform, material: Material) -> Self {
        SceneObject {
            name: name.to_string(),
            mesh,
            transform,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }
}

/// Static scenery plus the animated cloth
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Rgba,
    pub fog: Fog,
    pub lighting: Lighting,
    pub objects: Vec<SceneObject>,
    pub cloth: ClothMesh,
    pub cloth_transform: Transform,
}

impl Scene {
    /// Builds the full scene; `rng` drives the cloth jitter and cloud layout
    pub fn build<R: Rng + ?Sized>(rng: &mut R, clouds: bool) -> Self {
        let sky = Rgba::hex(SKY);

        let key = DirectionalLight {
            cast_shadow: true,
            ..DirectionalLight::new(DVec3::new(10.0, 10.0, 5.0), Rgba::WHITE, 1.2)
        };
        let rim = DirectionalLight::new(DVec3::new(-5.0, 3.0, -5.0), Rgba::WHITE, 0.3);
        let lighting = Lighting {
            ambient: AmbientLight {
                color: Rgba::hex(0x404040),
                intensity: 0.6,
            },
            directional: vec![key, rim],
        };

        let mut objects = vec![
            SceneObject::new(
                "pole",
                Mesh::cylinder(0.03, 0.05, POLE_HEIGHT, 12),
                Transform::at(DVec3::new(POLE_X, POLE_HEIGHT / 2.0, 0.0)),
                Material::Lambert {
                    color: Rgba::hex(0x8b4513),
                },
            )
            .casting_shadow(),
            SceneObject::new(
                "pole-cap",
                Mesh::sphere(0.08, 16, 16),
                Transform::at(DVec3::new(POLE_X, 4.1, 0.0)),
                Material::Phong {
                    color: Rgba::hex(0xffd700),
                    shininess: 100.0,
                },
            )
            .casting_shadow(),
            SceneObject::new(
                "rope",
                Mesh::cylinder(0.008, 0.008, POLE_HEIGHT, 6),
                Transform::at(DVec3::new(-0.55, POLE_HEIGHT / 2.0, 0.0)),
                Material::Lambert {
                    color: Rgba::hex(0x8b4513),
                },
            ),
            SceneObject::new(
                "ground",
                Mesh::plane(20.0, 20.0, 1, 1),
                Transform {
                    rotation: DVec3::new(-FRAC_PI_2, 0.0, 0.0),
                    ..Default::default()
                },
                Material::Lambert {
                    color: Rgba::hex(0x228b22).with_alpha(0.8),
                },
            )
            .receiving_shadow(),
        ];

        let cloth = ClothMesh::new(rng);

        if clouds {
            objects.extend((0..CLOUD_COUNT).map(|i| cloud(rng, i)));
        }
        debug!("scene built with {} static objects", objects.len());

        Scene {
            background: sky,
            fog: Fog {
                color: sky,
                near: FOG_NEAR,
                far: FOG_FAR,
            },
            lighting,
            objects,
            cloth,
            cloth_transform: Transform::at(DVec3::new(0.0, crate::hoist::LOWERED_Y, 0.0)),
        }
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn clouds(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.name.starts_with("cloud"))
    }

    /// The shadow-casting key light, if any
    pub fn key_light(&self) -> Option<&DirectionalLight> {
        self.lighting.directional.iter().find(|l| l.cast_shadow)
    }
}

fn cloud<R: Rng + ?Sized>(rng: &mut R, index: usize) -> SceneObject {
    let position = DVec3::new(
        (rng.gen::<f64>() - 0.5) * 20.0,
        5.0 + rng.gen::<f64>() * 3.0,
        -10.0 - rng.gen::<f64>() * 5.0,
    );
    let scale = DVec3::new(
        1.0 + rng.gen::<f64>(),
        0.5 + rng.gen::<f64>() * 0.5,
        1.0 + rng.gen::<f64>(),
    );
    SceneObject::new(
        &format!("cloud-{index}"),
        Mesh::sphere(0.5, 8, 8),
        Transform {
            position,
            scale,
            ..Default::default()
        },
        Material::Lambert {
            color: Rgba::WHITE.with_alpha(0.7),
        },
    )
}
