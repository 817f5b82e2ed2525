use glam::Vec3;

use super::Rgb;

/// Constants of the capture scene.
///
/// `Default` is the shipped look: sky-blue fog, a red hidden box 2×3×1 viewed
/// from (2, 2, 5), lit by a dim ambient, a strong point light and a soft spot.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,

    /// Fog color; also the clear color (cleared at zero alpha).
    pub sky_color: Rgb,
    pub fog_near: f32,
    pub fog_far: f32,

    pub ambient_color: Rgb,

    pub point_color: Rgb,
    pub point_intensity: f32,
    pub point_distance: f32,
    pub point_decay: f32,
    pub point_position: Vec3,

    pub spot_color: Rgb,
    pub spot_intensity: f32,
    pub spot_position: Vec3,

    /// Box extents along x, y, z.
    pub box_size: Vec3,
    pub mesh_color: Rgb,
    pub hidden_opacity: f32,
    pub visible_opacity: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            near: 0.01,
            far: 1000.0,
            camera_position: Vec3::new(2.0, 2.0, 5.0),

            sky_color: Rgb::from_hex(0x6ad6f0),
            fog_near: 1.0,
            fog_far: 10000.0,

            ambient_color: Rgb::from_hex(0x101010),

            point_color: Rgb::WHITE,
            point_intensity: 2.0,
            point_distance: 1000.0,
            point_decay: 1.0,
            point_position: Vec3::new(0.0, 200.0, 200.0),

            spot_color: Rgb::WHITE,
            spot_intensity: 0.5,
            spot_position: Vec3::new(0.0, 500.0, 100.0),

            box_size: Vec3::new(2.0, 3.0, 1.0),
            mesh_color: Rgb::from_hex(0xff0000),
            hidden_opacity: 0.0,
            visible_opacity: 1.0,
        }
    }
}
