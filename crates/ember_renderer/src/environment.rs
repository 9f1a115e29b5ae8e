//! Background colors for rays that leave the scene.

use crate::Ray;
use ember_math::{Color, Vec3Ext};

/// Maps a ray that hit nothing to a background color.
///
/// Implementations must be pure functions of the ray.
pub trait Environment: Send + Sync {
    fn color(&self, ray: &Ray) -> Color;
}

/// The same color in every direction.
#[derive(Debug, Clone, Copy)]
pub struct SolidColorEnvironment {
    color: Color,
}

impl SolidColorEnvironment {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Environment for SolidColorEnvironment {
    fn color(&self, _ray: &Ray) -> Color {
        self.color
    }
}

/// White-to-blue sky blended by the ray's vertical direction.
#[derive(Debug, Clone, Copy)]
pub struct SkyGradientEnvironment {
    horizon: Color,
    zenith: Color,
}

impl SkyGradientEnvironment {
    pub fn new(horizon: Color, zenith: Color) -> Self {
        Self { horizon, zenith }
    }
}

impl Default for SkyGradientEnvironment {
    fn default() -> Self {
        Self::new(Color::new(1.0, 1.0, 1.0), Color::new(0.5, 0.7, 1.0))
    }
}

impl Environment for SkyGradientEnvironment {
    fn color(&self, ray: &Ray) -> Color {
        let unit_direction = ray.direction().safe_normalize();
        let a = 0.5 * (unit_direction.y + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_solid_color() {
        let env = SolidColorEnvironment::new(Color::new(0.1, 0.2, 0.3));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(env.color(&ray), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_sky_gradient() {
        let env = SkyGradientEnvironment::default();

        // Ray pointing up should be more blue (less red than white)
        let up_color = env.color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)));
        // Ray pointing down should be white
        let down_color = env.color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));

        assert!(up_color.x < down_color.x);
        assert_eq!(down_color, Color::ONE);
    }

    #[test]
    fn test_sky_gradient_ignores_direction_length() {
        let env = SkyGradientEnvironment::default();
        let short = env.color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.5, 0.5)));
        let long = env.color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 4.0, 4.0)));
        assert!((short - long).length() < 1e-6);
    }
}
