use super::Rgb;

/// Linear distance fog.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    pub const fn new(color: Rgb, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Fog blend factor at view-space `depth`: 0 before `near`, 1 past `far`,
    /// smoothstepped in between. The shader evaluates the same curve.
    pub fn factor(&self, depth: f32) -> f32 {
        if self.far <= self.near {
            return if depth >= self.far { 1.0 } else { 0.0 };
        }
        let t = ((depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}
