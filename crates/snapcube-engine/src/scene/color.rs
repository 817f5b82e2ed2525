/// Straight sRGB color with `f32` channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::from_hex(0xffffff);
    pub const BLACK: Rgb = Rgb::from_hex(0x000000);

    /// Creates a color from a `0xRRGGBB` literal.
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Inverse of [`from_hex`](Self::from_hex), rounding each channel.
    pub fn to_hex(self) -> u32 {
        let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (ch(self.r) << 16) | (ch(self.g) << 8) | ch(self.b)
    }

    /// Linear-light channels, as the shader expects them.
    pub fn to_linear(self) -> [f32; 3] {
        [srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b)]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrips_sky_color() {
        assert_eq!(Rgb::from_hex(0x6ad6f0).to_hex(), 0x6ad6f0);
    }

    #[test]
    fn red_channel_only() {
        let red = Rgb::from_hex(0xff0000);
        assert_eq!((red.r, red.g, red.b), (1.0, 0.0, 0.0));
    }

    #[test]
    fn linear_keeps_endpoints() {
        assert_eq!(Rgb::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(Rgb::BLACK.to_linear(), [0.0, 0.0, 0.0]);
    }
}
