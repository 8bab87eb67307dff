//! Gamma handling for the shading working space.
//!
//! Authored colors are sRGB-ish; lighting math wants linear light.
//! Every material raises its input colors by 2.2 before mixing and
//! restores with 1/2.2 on the way out, and the convention has to be
//! applied by every shading function or doubly-corrected colors leak
//! through reflections.

use lume_math::Vec3;

const GAMMA: f32 = 2.2;

/// Into the linear working space: c^2.2, per channel.
#[inline]
pub fn gamma_correct(color: Vec3) -> Vec3 {
    color.max(Vec3::ZERO).powf(GAMMA)
}

/// Out of the linear working space: c^(1/2.2), per channel.
#[inline]
pub fn gamma_restore(color: Vec3) -> Vec3 {
    color.max(Vec3::ZERO).powf(1.0 / GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let c = Vec3::new(0.25, 0.5, 0.75);
        let back = gamma_restore(gamma_correct(c));
        assert!((back - c).length() < 1e-5);
    }

    #[test]
    fn test_endpoints_fixed() {
        assert_eq!(gamma_correct(Vec3::ZERO), Vec3::ZERO);
        assert!((gamma_correct(Vec3::ONE) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_negative_channels_clamp() {
        let c = gamma_correct(Vec3::new(-1.0, 0.5, 0.0));
        assert_eq!(c.x, 0.0);
        assert!(c.y > 0.0);
    }
}
