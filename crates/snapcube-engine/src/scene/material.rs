use crate::texture::{CapturedTexture, TextureId};

use super::Rgb;

/// Surface appearance of the mesh: a flat color, optionally modulated by a
/// captured texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub opacity: f32,
    /// Blend with what is behind the mesh (the camera feed).
    pub transparent: bool,
    pub map: Option<CapturedTexture>,
}

impl Material {
    pub fn standard(color: Rgb, opacity: f32, transparent: bool) -> Self {
        Self {
            color,
            opacity: opacity.clamp(0.0, 1.0),
            transparent,
            map: None,
        }
    }

    /// Opaque material sampling `texture` unmodulated.
    pub fn textured(texture: CapturedTexture) -> Self {
        Self {
            color: Rgb::WHITE,
            opacity: 1.0,
            transparent: false,
            map: Some(texture),
        }
    }

    pub fn texture_id(&self) -> Option<TextureId> {
        self.map.as_ref().map(|t| t.id())
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}
