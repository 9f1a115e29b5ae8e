//! Positioned aggregate of triangles.
//!
//! Triangles are stored in object space. Rays are moved into object space
//! by subtracting the object position, and hits are moved back.

use std::sync::Arc;

use crate::{
    hit::{HitRecord, Intersect},
    Material, Ray, Triangle,
};
use ember_core::Mesh;
use ember_math::Vec3;

/// A triangle mesh placed in the scene.
pub struct PolygonObject {
    triangles: Vec<Triangle>,
    position: Vec3,
    casts_shadows: bool,
}

impl PolygonObject {
    /// Create a shadow-casting object from object-space triangles.
    pub fn new(triangles: Vec<Triangle>, position: Vec3) -> Self {
        Self {
            triangles,
            position,
            casts_shadows: true,
        }
    }

    /// Build an object from a validated mesh, sharing one material.
    pub fn from_mesh(mesh: &Mesh, material: Arc<dyn Material>, position: Vec3) -> Self {
        let triangles = mesh
            .triangles()
            .map(|triangle| Triangle::from_mesh_triangle(&triangle, material.clone()))
            .collect();
        Self::new(triangles, position)
    }

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Intersect for PolygonObject {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let local_ray = ray.translated(-self.position);

        let mut closest: Option<HitRecord<'_>> = None;
        for triangle in &self.triangles {
            if let Some(hit) = triangle.intersect(&local_ray) {
                closest = HitRecord::nearer(closest, hit, local_ray.start());
            }
        }

        closest.map(|hit| HitRecord {
            position: hit.position + self.position,
            ..hit
        })
    }

    fn casts_shadows(&self) -> bool {
        self.casts_shadows
    }
}
