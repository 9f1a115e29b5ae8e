//! Ray type for raytracing.
//!
//! A ray is defined by a start point and a direction vector. The direction is
//! not normalized by the type; callers normalize where it matters.

use ember_math::Vec3;

/// An immutable ray with start point and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray
    start: Vec3,
    /// Direction vector (not necessarily normalized)
    direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(start: Vec3, direction: Vec3) -> Self {
        Self { start, direction }
    }

    /// Get the ray's start point.
    #[inline]
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = start + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.start + t * self.direction
    }

    /// The same ray with its start point shifted by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.start + offset, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(ray.at(0.0), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(ray.at(1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_ray_keeps_unnormalized_direction() {
        let ray = Ray::new(Vec3::ONE, Vec3::new(0.0, 3.0, 0.0));

        assert_eq!(ray.start(), Vec3::ONE);
        assert_eq!(ray.direction(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_ray_translated() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z).translated(-Vec3::ONE);
        assert_eq!(ray.start(), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(ray.direction(), Vec3::Z);
    }
}
