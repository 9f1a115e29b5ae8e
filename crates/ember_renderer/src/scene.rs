//! Scene container and the nearest-hit / occlusion queries.
//!
//! Queries scan every object linearly; there is no acceleration structure.

use std::sync::Arc;

use crate::{
    hit::{HitRecord, Intersect},
    Camera, Environment, Light, Ray,
};
use ember_math::Vec3;

/// Objects, lights, environment and camera of a render.
///
/// A scene is assembled once and then only read while rendering.
pub struct Scene {
    objects: Vec<Box<dyn Intersect>>,
    lights: Vec<Box<dyn Light>>,
    environment: Box<dyn Environment>,
    camera: Arc<Camera>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(environment: impl Environment + 'static, camera: Arc<Camera>) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            environment: Box::new(environment),
            camera,
        }
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: impl Intersect + 'static) {
        self.objects.push(Box::new(object));
    }

    /// Add a light to the scene.
    pub fn add_light(&mut self, light: impl Light + 'static) {
        self.lights.push(Box::new(light));
    }

    pub fn objects(&self) -> &[Box<dyn Intersect>] {
        &self.objects
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn camera(&self) -> &Arc<Camera> {
        &self.camera
    }

    /// Find the hit nearest to the ray start over all objects.
    ///
    /// Shadow-ray queries skip objects that do not cast shadows.
    pub fn intersect(&self, ray: &Ray, shadow_ray: bool) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            if shadow_ray && !object.casts_shadows() {
                continue;
            }
            if let Some(hit) = object.intersect(ray) {
                closest = HitRecord::nearer(closest, hit, ray.start());
            }
        }

        closest
    }

    /// Find an occluder on the segment from `start` to `target`.
    ///
    /// Only a hit strictly closer to `start` than `target` counts; geometry
    /// beyond the target never occludes it.
    pub fn intersect_segment(
        &self,
        start: Vec3,
        target: Vec3,
        shadow_ray: bool,
    ) -> Option<HitRecord<'_>> {
        let ray = Ray::new(start, target - start);
        let hit = self.intersect(&ray, shadow_ray)?;

        (hit.distance_squared_from(start) < target.distance_squared(start)).then_some(hit)
    }

    /// Whether anything blocks the segment from `start` to `target`.
    pub fn is_occluded(&self, start: Vec3, target: Vec3) -> bool {
        self.intersect_segment(start, target, true).is_some()
    }
}
