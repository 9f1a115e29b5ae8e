//! Sphere primitive for ray tracing.

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use crate::{
    hit::{HitRecord, Intersect},
    Material, Ray,
};
use ember_math::{Interval, Vec2, Vec3, Vec3Ext};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    casts_shadows: bool,
}

impl Sphere {
    /// Create a new shadow-casting sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
            casts_shadows: true,
        }
    }

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Parameter of the nearest intersection in front of the ray start.
    ///
    /// Solves |start + t * dir - center|^2 = r^2 and keeps the smallest
    /// positive root.
    pub fn nearest_root(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.start() - self.center;
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 || !discriminant.is_finite() {
            return None;
        }

        let front = Interval::POSITIVE;
        if discriminant == 0.0 {
            // Tangential hit
            let t = -b / (2.0 * a);
            return front.surrounds(t).then_some(t);
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / (2.0 * a);
        let far = (-b + sqrtd) / (2.0 * a);

        if front.surrounds(near) {
            Some(near)
        } else if front.surrounds(far) {
            Some(far)
        } else {
            None
        }
    }

    /// UV coordinates for a unit normal, from its azimuth and elevation.
    fn sphere_uv(normal: Vec3) -> Vec2 {
        let (azimuth, elevation) = normal.azimuth_elevation();
        Vec2::new(azimuth / (2.0 * PI), (elevation + FRAC_PI_2) / PI)
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let t = self.nearest_root(ray)?;

        let position = ray.at(t);
        let normal = (position - self.center).safe_normalize();
        Some(HitRecord::new(
            position,
            normal,
            Self::sphere_uv(normal),
            self.material.as_ref(),
        ))
    }

    fn casts_shadows(&self) -> bool {
        self.casts_shadows
    }
}
