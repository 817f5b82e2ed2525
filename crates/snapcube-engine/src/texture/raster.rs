use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use super::DecodeError;

/// Encoded still image as handed over by the camera collaborator.
///
/// Cameras hand out either the encoded file bytes (PNG/JPEG) or a base64 string,
/// possibly wrapped in a `data:image/...;base64,` URI.
#[derive(Clone, PartialEq, Eq)]
pub enum RasterBytes {
    Encoded(Vec<u8>),
    Base64(String),
}

impl RasterBytes {
    pub fn encoded(bytes: impl Into<Vec<u8>>) -> Self {
        RasterBytes::Encoded(bytes.into())
    }

    pub fn base64(text: impl Into<String>) -> Self {
        RasterBytes::Base64(text.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RasterBytes::Encoded(b) => b.is_empty(),
            RasterBytes::Base64(s) => base64_payload(s).is_empty(),
        }
    }

    /// Resolves to the encoded file bytes, stripping any data-URI header.
    pub fn into_encoded(self) -> Result<Vec<u8>, DecodeError> {
        let bytes = match self {
            RasterBytes::Encoded(b) => b,
            RasterBytes::Base64(s) => {
                let payload: String = base64_payload(&s)
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                B64.decode(payload.as_bytes())
                    .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?
            }
        };

        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(bytes)
    }
}

fn base64_payload(s: &str) -> &str {
    let s = s.trim();
    match s.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or("", |(_, payload)| payload),
        None => s,
    }
}

impl fmt::Debug for RasterBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterBytes::Encoded(b) => write!(f, "RasterBytes::Encoded({} bytes)", b.len()),
            RasterBytes::Base64(s) => write!(f, "RasterBytes::Base64({} chars)", s.len()),
        }
    }
}
