//! The scene renderer: owns the scene, advances it once per frame and draws
//! it into a framebuffer sized to the host surface.

use crate::camera::{PerspectiveCamera, HOME_TARGET};
use crate::color::Rgba;
use crate::config::Settings;
use crate::controls::OrbitControls;
use crate::error::{Error, Result};
use crate::graphics::{rasterize_clipped, Fragment, Framebuffer};
use crate::hoist::{Hoist, HoistState, MessagePose};
use crate::lighting::{Fog, Lighting, SurfacePoint};
use crate::math::lambert;
use crate::mesh::Mesh;
use crate::pattern::flag_color;
use crate::scene::{Material, Scene, Transform};
use crate::shadow::ShadowMap;
use crate::vertex::Vertex;
use glam::{DMat3, DMat4, DVec3};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Viewport { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Fraction of cloth brightness that follows the key light
const CLOTH_SHADING: f64 = 0.25;

struct ShadeContext<'a> {
    view_projection: DMat4,
    eye: DVec3,
    lighting: &'a Lighting,
    fog: &'a Fog,
    shadow: Option<&'a ShadowMap>,
    key_direction: DVec3,
}

pub struct SceneRenderer {
    viewport: Viewport,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    scene: Scene,
    hoist: Hoist,
    elapsed: f64,
    framebuffer: Framebuffer,
    shadow_map: Option<ShadowMap>,
    running: bool,
}

impl SceneRenderer {
    /// Builds the scene for `viewport`, seeding randomness from the settings
    pub fn new(viewport: Viewport, settings: &Settings) -> Result<Self> {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(viewport, settings, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(
        viewport: Viewport,
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Self> {
        if viewport.is_empty() {
            return Err(Error::SurfaceUnavailable {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let camera = PerspectiveCamera::home(viewport.aspect());
        let controls = OrbitControls::new(HOME_TARGET);
        let mut scene = Scene::build(rng, settings.clouds);
        scene.cloth.displace(0.0);
        let shadow_map =
            (settings.shadow_map_size > 0).then(|| ShadowMap::new(settings.shadow_map_size));

        info!(
            "scene renderer ready at {}x{} ({} objects, shadows {})",
            viewport.width,
            viewport.height,
            scene.objects.len() + 1,
            if shadow_map.is_some() { "on" } else { "off" }
        );

        Ok(SceneRenderer {
            viewport,
            camera,
            controls,
            scene,
            hoist: Hoist::new(),
            elapsed: 0.0,
            framebuffer: Framebuffer::new(viewport.width, viewport.height),
            shadow_map,
            running: true,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn hoist_state(&self) -> HoistState {
        self.hoist.state()
    }

    pub fn message_visible(&self) -> bool {
        self.hoist.message_visible()
    }

    pub fn message_pose(&self) -> MessagePose {
        self.hoist.message_pose()
    }

    pub fn cloth_transform(&self) -> Transform {
        self.scene.cloth_transform
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn hoist(&mut self) -> bool {
        self.running && self.hoist.hoist()
    }

    pub fn reset(&mut self) -> bool {
        self.running && self.hoist.reset()
    }

    pub fn reset_camera_view(&mut self) {
        if self.running {
            self.controls.reset_view(&self.camera);
        }
    }

    /// Orbit drag in surface pixels
    pub fn orbit(&mut self, dx: f64, dy: f64) {
        if self.running {
            self.controls.rotate(dx, dy, self.viewport.height as f64);
        }
    }

    /// Pan drag in surface pixels
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.running {
            self.controls
                .pan(dx, dy, self.viewport.height as f64, &self.camera);
        }
    }

    pub fn zoom(&mut self, steps: f64) {
        if self.running {
            self.controls.zoom(steps);
        }
    }

    /// Matches the camera and framebuffer to a new surface size
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            debug!("ignoring resize to {}x{}", viewport.width, viewport.height);
            return;
        }
        debug!("resize to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.framebuffer.resize(viewport.width, viewport.height);
    }

    /// Advances time, animations and the camera without drawing
    pub fn update(&mut self, dt: f64) {
        if !self.running {
            return;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;

        self.hoist.update(dt);
        self.scene.cloth_transform.position.y = self.hoist.cloth_y();
        self.scene.cloth_transform.rotation.y = self.hoist.yaw();

        self.scene.cloth.displace(self.elapsed);
        self.controls.update(&mut self.camera, dt);
        trace!("frame t={:.3} state={}", self.elapsed, self.hoist.state());
    }

    /// One full frame: update then draw. Returns false after teardown.
    pub fn frame(&mut self, dt: f64) -> bool {
        if !self.running {
            return false;
        }
        self.update(dt);
        self.render();
        true
    }

    /// Draws the current state into the framebuffer
    pub fn render(&mut self) {
        self.framebuffer.clear(self.scene.background);
        let cloth_model = self.scene.cloth_transform.matrix();

        if let (Some(map), Some(key)) = (self.shadow_map.as_mut(), self.scene.key_light()) {
            map.begin(key);
            for object in self.scene.objects.iter().filter(|o| o.cast_shadow) {
                map.render_caster(&object.mesh, &object.transform.matrix());
            }
            map.render_caster(self.scene.cloth.mesh(), &cloth_model);
        }

        let context = ShadeContext {
            view_projection: self.camera.view_projection(),
            eye: self.camera.position,
            lighting: &self.scene.lighting,
            fog: &self.scene.fog,
            shadow: self.shadow_map.as_ref(),
            key_direction: self
                .scene
                .key_light()
                .map(|l| l.direction())
                .unwrap_or(DVec3::NEG_Y),
        };
        let target = &mut self.framebuffer;

        for object in self.scene.objects.iter().filter(|o| !o.material.is_transparent()) {
            draw_mesh(
                target,
                &object.mesh,
                &object.transform.matrix(),
                object.material,
                object.receive_shadow,
                &context,
            );
        }
        draw_mesh(
            target,
            self.scene.cloth.mesh(),
            &cloth_model,
            Material::Flag,
            false,
            &context,
        );

        let mut transparent: Vec<_> = self
            .scene
            .objects
            .iter()
            .filter(|o| o.material.is_transparent())
            .map(|o| (o.transform.position.distance_squared(context.eye), o))
            .collect();
        transparent.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, object) in transparent {
            draw_mesh(
                target,
                &object.mesh,
                &object.transform.matrix(),
                object.material,
                object.receive_shadow,
                &context,
            );
        }
    }

    /// Stops all animation; later frames and commands are ignored
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        info!("scene renderer shutting down after {:.2}s", self.elapsed);
        self.hoist.stop();
        self.controls.stop();
        self.running = false;
    }
}

fn draw_mesh(
    target: &mut Framebuffer,
    mesh: &Mesh,
    model: &DMat4,
    material: Material,
    receive_shadow: bool,
    context: &ShadeContext<'_>,
) {
    let mvp = context.view_projection * *model;
    let normal_matrix = DMat3::from_mat4(*model).inverse().transpose();
    let (width, height) = (target.width(), target.height());

    let mut visit = |fragment: Fragment| {
        let color = shade(&fragment, material, receive_shadow, context);
        target.write(fragment.x, fragment.y, fragment.depth, color);
    };

    for &[a, b, c] in &mesh.triangles {
        let triangle = [a, b, c].map(|i| {
            let i = i as usize;
            let position = mesh.positions[i];
            Vertex {
                clip: mvp * position.extend(1.0),
                world: model.transform_point3(position),
                normal: (normal_matrix * mesh.normals[i]).normalize_or_zero(),
                uv: mesh.uvs[i],
            }
        });
        rasterize_clipped(triangle, width, height, &mut visit);
    }
}

fn shade(
    fragment: &Fragment,
    material: Material,
    receive_shadow: bool,
    context: &ShadeContext<'_>,
) -> Rgba {
    match material {
        Material::Flag => {
            let base = flag_color(fragment.uv.x, fragment.uv.y);
            let light = lambert(fragment.normal, context.key_direction, true);
            base.scale(1.0 - CLOTH_SHADING + CLOTH_SHADING * light)
        }
        Material::Lambert { color } | Material::Phong { color, .. } => {
            let shininess = match material {
                Material::Phong { shininess, .. } => Some(shininess),
                _ => None,
            };
            let shadow = match (receive_shadow, context.shadow) {
                (true, Some(map)) => map.visibility(fragment.world),
                _ => 1.0,
            };
            let point = SurfacePoint {
                base: color,
                normal: fragment.normal,
                view_dir: (context.eye - fragment.world).normalize_or_zero(),
                shininess,
                two_sided: false,
            };
            let lit = context.lighting.shade(&point, shadow);
            context.fog.apply(lit, fragment.world.distance(context.eye))
        }
    }
}
