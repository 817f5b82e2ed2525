use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex uploaded to the GPU as-is.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Axis-aligned box centered on the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

// (normal, u axis, v axis) per face; u × v == normal so every face winds CCW
// when seen from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

impl BoxGeometry {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth) * 0.5
    }

    /// 4 vertices per face, each face mapping the full texture (0..1 UV).
    pub fn vertices(&self) -> Vec<MeshVertex> {
        let half = self.half_extents();
        let mut out = Vec::with_capacity(24);

        for (normal, u, v) in FACES {
            let center = normal * normal.abs().dot(half);
            let du = u * u.abs().dot(half);
            let dv = v * v.abs().dot(half);

            let corners = [
                (center - du - dv, [0.0, 1.0]),
                (center + du - dv, [1.0, 1.0]),
                (center + du + dv, [1.0, 0.0]),
                (center - du + dv, [0.0, 0.0]),
            ];
            for (p, uv) in corners {
                out.push(MeshVertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    uv,
                });
            }
        }
        out
    }

    pub fn indices(&self) -> Vec<u16> {
        (0..6u16)
            .flat_map(|face| {
                let b = face * 4;
                [b, b + 1, b + 2, b, b + 2, b + 3]
            })
            .collect()
    }
}
