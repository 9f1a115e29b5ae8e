//! Light sources.

use ember_math::{Color, Vec3};

/// A light the shaders can query for position and emitted intensity.
pub trait Light: Send + Sync {
    fn position(&self) -> Vec3;

    /// Intensity emitted towards `out_direction` (from the light outwards).
    fn intensity(&self, out_direction: Vec3) -> Color;
}

/// An isotropic point light.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    position: Vec3,
    intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl Light for PointLight {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn intensity(&self, _out_direction: Vec3) -> Color {
        self.intensity
    }
}
