/// One angular-rate reading, rad/s per axis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OrientationSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl OrientationSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Truncates toward negative infinity at two decimals; `0` for missing or zero.
pub(crate) fn display_value(v: Option<f32>) -> f32 {
    match v {
        Some(v) if v != 0.0 && v.is_finite() => (v * 100.0).floor() / 100.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_floors_to_two_decimals() {
        assert_eq!(display_value(Some(1.234)), 1.23);
        assert_eq!(display_value(Some(2.0)), 2.0);
        assert_eq!(display_value(Some(0.5)), 0.5);
        assert_eq!(display_value(Some(-0.002)), -0.01);
    }

    #[test]
    fn display_is_zero_when_absent() {
        assert_eq!(display_value(None), 0.0);
        assert_eq!(display_value(Some(0.0)), 0.0);
        assert_eq!(display_value(Some(f32::NAN)), 0.0);
    }
}
