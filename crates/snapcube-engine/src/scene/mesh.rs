use glam::{Mat4, Quat, Vec3};

use super::{BoxGeometry, Material};

/// The single box mesh of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: Material,
    pub position: Vec3,
    /// Rotation about Y in radians; only animated in continuous mode.
    pub rotation_y: f32,
}

impl Mesh {
    pub fn new(geometry: BoxGeometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation_y: 0.0,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.rotation_y), self.position)
    }
}
