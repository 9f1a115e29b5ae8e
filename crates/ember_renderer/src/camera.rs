//! Camera placement for primary ray generation.

use ember_math::Vec3;

/// Pinhole camera description.
///
/// The raytracer derives its screen basis from a normalized copy of these
/// vectors; the camera itself is never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,
    pub view_direction: Vec3,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
}

impl Camera {
    pub fn new(position: Vec3, up: Vec3, view_direction: Vec3, field_of_view: f32) -> Self {
        Self {
            position,
            up,
            view_direction,
            field_of_view,
        }
    }

    /// Camera at `position` looking towards `target`.
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3, field_of_view: f32) -> Self {
        Self::new(position, up, target - position, field_of_view)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, Vec3::Z, 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_at() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y, 45.0);
        assert_eq!(camera.view_direction, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.field_of_view, 45.0);
    }
}
