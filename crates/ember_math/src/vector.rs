//! Vector helpers used by the intersection and shading code.
//!
//! glam's `Vec3` already covers arithmetic, dot/cross products and length.
//! This trait adds the few operations whose edge-case behavior the raytracer
//! depends on.

use crate::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

/// Vectors shorter than this are left untouched by [`Vec3Ext::safe_normalize`].
pub const NORMALIZE_EPSILON: f32 = 1e-3;

/// Extension trait for Vec3 with raytracing utilities.
pub trait Vec3Ext {
    /// Normalize the vector, or return it unchanged if its length is below
    /// [`NORMALIZE_EPSILON`].
    fn safe_normalize(self) -> Self;

    /// Mirror this direction about `normal`. Both the normal and the result
    /// are normalized.
    fn reflect_about(self, normal: Vec3) -> Self;

    /// Cosine of the angle between two vectors, 0 if either is zero-length.
    fn cos_angle(self, other: Vec3) -> f32;

    /// Angle between two vectors in radians.
    fn angle_to(self, other: Vec3) -> f32;

    /// Decompose a direction into (azimuth, elevation).
    ///
    /// Azimuth is measured around +Y from +Z in [0, 2π), elevation from the
    /// XZ plane in [-π/2, π/2].
    fn azimuth_elevation(self) -> (f32, f32);
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn safe_normalize(self) -> Self {
        let length = self.length();
        if length < NORMALIZE_EPSILON {
            return self;
        }
        self / length
    }

    #[inline]
    fn reflect_about(self, normal: Vec3) -> Self {
        let n = normal.safe_normalize();
        (self - 2.0 * self.dot(n) * n).safe_normalize()
    }

    fn cos_angle(self, other: Vec3) -> f32 {
        let denom = self.length() * other.length();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0)
    }

    fn angle_to(self, other: Vec3) -> f32 {
        self.cos_angle(other).acos()
    }

    fn azimuth_elevation(self) -> (f32, f32) {
        if self.x == 0.0 && self.z == 0.0 {
            let elevation = if self.y > 0.0 {
                FRAC_PI_2
            } else if self.y < 0.0 {
                -FRAC_PI_2
            } else {
                0.0
            };
            return (0.0, elevation);
        }

        let xz = Vec3::new(self.x, 0.0, self.z);

        let mut azimuth = xz.angle_to(Vec3::Z);
        if self.x > 0.0 {
            azimuth = 2.0 * PI - azimuth;
        }

        let elevation = xz.angle_to(self);
        if self.y > 0.0 {
            (azimuth, elevation)
        } else {
            (azimuth, -elevation)
        }
    }
}
