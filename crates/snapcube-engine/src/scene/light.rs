use glam::Vec3;

use super::Rgb;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Omnidirectional light with distance falloff.
///
/// `distance == 0` means no cutoff; otherwise light reaches zero at `distance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
    pub position: Vec3,
}

impl PointLight {
    /// Falloff multiplier at `d` units from the light.
    pub fn attenuation(&self, d: f32) -> f32 {
        if self.distance <= 0.0 {
            return 1.0;
        }
        (1.0 - d / self.distance).clamp(0.0, 1.0).powf(self.decay)
    }
}

/// Cone light aimed at `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpotLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Half-angle of the cone, radians.
    pub angle: f32,
    /// Fraction of the cone softened at the edge, `[0, 1]`.
    pub penumbra: f32,
}

impl SpotLight {
    pub fn new(color: Rgb, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            position,
            target: Vec3::ZERO,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from the light toward its target.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_attenuation_reaches_zero_at_distance() {
        let p = PointLight {
            color: Rgb::WHITE,
            intensity: 2.0,
            distance: 1000.0,
            decay: 1.0,
            position: Vec3::ZERO,
        };
        assert_eq!(p.attenuation(0.0), 1.0);
        assert!((p.attenuation(500.0) - 0.5).abs() < 1e-6);
        assert_eq!(p.attenuation(1500.0), 0.0);
    }

    #[test]
    fn spot_points_at_origin() {
        let mut s = SpotLight::new(Rgb::WHITE, 0.5, Vec3::new(0.0, 500.0, 100.0));
        s.look_at(Vec3::ZERO);
        let d = s.direction();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.y < 0.0 && d.z < 0.0);
    }
}
