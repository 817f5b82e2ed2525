use std::fmt;
use std::sync::Arc;

use super::DecodedImage;

/// Identity of a captured texture. Monotonic per bridge; a new id means the GPU
/// copy must be (re)uploaded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) u64);

impl TextureId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}

/// Decoded capture bound to the mesh material.
///
/// The pixels are shared, not copied, between the scene and the renderer. The
/// renderer uploads them the first time it sees this id and drops its previous
/// GPU texture before doing so.
#[derive(Clone, PartialEq)]
pub struct CapturedTexture {
    id: TextureId,
    image: Arc<DecodedImage>,
}

impl CapturedTexture {
    pub(crate) fn new(id: TextureId, image: DecodedImage) -> Self {
        Self {
            id,
            image: Arc::new(image),
        }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn image(&self) -> &DecodedImage {
        &self.image
    }
}

impl fmt::Debug for CapturedTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedTexture")
            .field("id", &self.id)
            .field("width", &self.image.width)
            .field("height", &self.image.height)
            .finish()
    }
}
