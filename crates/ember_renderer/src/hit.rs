//! Intersect trait and HitRecord for ray-object intersection.

use crate::{Material, Ray};
use ember_math::{Vec2, Vec3};

/// Record of a ray-object intersection.
///
/// The record borrows the material of the surface that was hit; it never
/// owns it.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub position: Vec3,
    /// Surface normal at intersection (normalized)
    pub normal: Vec3,
    /// UV texture coordinates
    pub uv: Vec2,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2, material: &'a dyn Material) -> Self {
        Self {
            position,
            normal,
            uv,
            material,
        }
    }

    /// Squared distance from `origin` to the hit position.
    #[inline]
    pub fn distance_squared_from(&self, origin: Vec3) -> f32 {
        self.position.distance_squared(origin)
    }

    /// Keep whichever of `current` and `candidate` lies nearer to `origin`.
    ///
    /// Ties keep the current record, so the first hit in scan order wins.
    pub fn nearer(
        current: Option<HitRecord<'a>>,
        candidate: HitRecord<'a>,
        origin: Vec3,
    ) -> Option<HitRecord<'a>> {
        match current {
            Some(best)
                if best.distance_squared_from(origin)
                    <= candidate.distance_squared_from(origin) =>
            {
                Some(best)
            }
            _ => Some(candidate),
        }
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("position", &self.position)
            .field("normal", &self.normal)
            .field("uv", &self.uv)
            .finish_non_exhaustive()
    }
}

/// Trait for objects that can be hit by rays.
///
/// Intersection is total: degenerate configurations resolve to `None`
/// instead of failing.
pub trait Intersect: Send + Sync {
    /// Find the hit of `ray` against this object, if any.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>>;

    /// Whether this object blocks shadow rays.
    fn casts_shadows(&self) -> bool {
        true
    }
}
