use std::fmt;

/// Straight-alpha RGBA8 pixels, row-major, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps raw RGBA8 pixels; `None` if the buffer does not match the size.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Downscaled copy whose longest side is at most `max`, keeping the aspect
    /// ratio. `None` when the image already fits.
    pub fn fit_within(&self, max: u32) -> Option<DecodedImage> {
        let max = max.max(1);
        if self.width <= max && self.height <= max {
            return None;
        }
        let src = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())?;
        let scaled = image::imageops::thumbnail(&src, max, max);
        let (width, height) = scaled.dimensions();
        DecodedImage::from_rgba8(width, height, scaled.into_raw())
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecodedImage({}x{})", self.width, self.height)
    }
}

/// Why a raster could not be turned into pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Empty,
    InvalidBase64(String),
    Unsupported(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "image decode failed: no bytes"),
            DecodeError::InvalidBase64(e) => write!(f, "image decode failed: invalid base64: {e}"),
            DecodeError::Unsupported(e) => write!(f, "image decode failed: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Platform image decoder seam.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, encoded: &[u8]) -> Result<DecodedImage, DecodeError>;
}

/// Makes near-white pixels fully transparent, so a sketch on white paper keeps
/// only its strokes.
///
/// A pixel is cleared when R, G and B are all `>= threshold`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WhiteToAlpha {
    pub threshold: u8,
}

impl Default for WhiteToAlpha {
    fn default() -> Self {
        Self { threshold: 120 }
    }
}

impl WhiteToAlpha {
    pub fn apply(&self, image: &mut DecodedImage) {
        let t = self.threshold;
        for px in image.pixels.chunks_exact_mut(4) {
            if px[0] >= t && px[1] >= t && px[2] >= t {
                px.copy_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
}

/// `image`-crate backed decoder for PNG, JPEG and BMP stills.
#[derive(Debug, Clone)]
pub struct RasterDecoder {
    /// Longest side kept after decode; larger captures are downscaled. The
    /// renderer clamps again to the device's own texture limit on upload.
    pub max_dimension: u32,
    pub white_to_alpha: Option<WhiteToAlpha>,
}

impl Default for RasterDecoder {
    fn default() -> Self {
        Self {
            max_dimension: 4096,
            white_to_alpha: None,
        }
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, encoded: &[u8]) -> Result<DecodedImage, DecodeError> {
        if encoded.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut img =
            image::load_from_memory(encoded).map_err(|e| DecodeError::Unsupported(e.to_string()))?;

        let max = self.max_dimension.max(1);
        if img.width() > max || img.height() > max {
            log::debug!(
                "downscaling {}x{} capture to fit {max}px",
                img.width(),
                img.height()
            );
            img = img.thumbnail(max, max);
        }

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut decoded = DecodedImage::from_rgba8(width, height, rgba.into_raw())
            .ok_or_else(|| DecodeError::Unsupported(format!("empty {width}x{height} image")))?;

        if let Some(filter) = self.white_to_alpha {
            filter.apply(&mut decoded);
        }
        Ok(decoded)
    }
}
