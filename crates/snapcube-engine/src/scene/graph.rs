use crate::surface::SurfaceId;

use super::{
    AmbientLight, BoxGeometry, Fog, Material, Mesh, PerspectiveCamera, PointLight, SceneConfig,
    SpotLight,
};

/// Builds scenes from a `SceneConfig`.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    config: SceneConfig,
}

impl SceneGraph {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Constructs the camera, lights, fog and hidden mesh for a surface of
    /// `width`×`height` pixels.
    pub fn build(&self, surface: SurfaceId, width: u32, height: u32) -> Scene {
        let c = &self.config;

        let mesh = Mesh::new(
            BoxGeometry::new(c.box_size.x, c.box_size.y, c.box_size.z),
            Material::standard(c.mesh_color, c.hidden_opacity, true),
        );

        let mut camera = PerspectiveCamera::new(c.fov_y_degrees, 1.0, c.near, c.far);
        camera.set_viewport(width, height);
        camera.position = c.camera_position;
        camera.look_at(mesh.position);

        let mut spot = SpotLight::new(c.spot_color, c.spot_intensity, c.spot_position);
        spot.look_at(glam::Vec3::ZERO);

        Scene {
            surface,
            camera,
            ambient: AmbientLight {
                color: c.ambient_color,
                intensity: 1.0,
            },
            point: PointLight {
                color: c.point_color,
                intensity: c.point_intensity,
                distance: c.point_distance,
                decay: c.point_decay,
                position: c.point_position,
            },
            spot,
            fog: Fog::new(c.sky_color, c.fog_near, c.fog_far),
            mesh,
            hidden_opacity: c.hidden_opacity,
            visible_opacity: c.visible_opacity,
        }
    }
}

/// Camera, lights, fog and the one mesh, built for a single surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    surface: SurfaceId,
    camera: PerspectiveCamera,
    pub ambient: AmbientLight,
    pub point: PointLight,
    pub spot: SpotLight,
    pub fog: Fog,
    mesh: Mesh,
    hidden_opacity: f32,
    visible_opacity: f32,
}

impl Scene {
    /// Surface this scene was built for.
    #[inline]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[inline]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn is_mesh_visible(&self) -> bool {
        self.mesh.material.is_visible()
    }

    /// Switches mesh opacity between the hidden and visible values. Geometry and
    /// texture are left alone.
    pub fn set_mesh_visible(&mut self, visible: bool) {
        self.mesh.material.opacity = if visible {
            self.visible_opacity
        } else {
            self.hidden_opacity
        };
    }

    /// Swaps the mesh material in one step and hands back the previous one.
    ///
    /// The previous material (and the texture it referenced) is no longer
    /// reachable from the scene once this returns; the next render samples only
    /// the new one.
    pub fn replace_mesh_material(&mut self, material: Material) -> Material {
        std::mem::replace(&mut self.mesh.material, material)
    }

    pub fn set_mesh_rotation(&mut self, radians: f32) {
        self.mesh.rotation_y = radians.rem_euclid(std::f32::consts::TAU);
    }

    /// Reconfigures the camera for a resized surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }
}
