//! Recursive Whitted-style tracing.
//!
//! The recursion lives here once; what a surface looks like is delegated to a
//! [`Shader`] through three hooks:
//! - `default_color`: unconditional base contribution at a hit
//! - `color_per_light`: contribution of one light, given its visibility
//! - `no_hit_color`: color of a ray that leaves the scene

use std::sync::Arc;

use crate::{HitRecord, Light, Ray, Scene};
use ember_core::RenderSettings;
use ember_math::{Color, Vec3, Vec3Ext};

/// Reflective coefficients at or below this spawn no reflection ray.
pub const REFLECTION_THRESHOLD: f32 = 0.001;

/// Read-only state handed to every shading hook.
#[derive(Clone, Copy)]
pub struct ShadingContext<'a> {
    pub scene: &'a Scene,
    pub settings: &'a RenderSettings,
    /// Normalized camera view direction
    pub view_direction: Vec3,
}

/// Shading strategy plugged into the [`Raytracer`].
pub trait Shader: Send + Sync {
    /// Base color of a hit, added before any light is considered.
    fn default_color(&self, ctx: &ShadingContext<'_>, ray: &Ray, hit: &HitRecord<'_>) -> Color;

    /// Contribution of a single light at a hit.
    fn color_per_light(
        &self,
        ctx: &ShadingContext<'_>,
        ray: &Ray,
        hit: &HitRecord<'_>,
        light: &dyn Light,
        occluded: bool,
    ) -> Color;

    /// Color of a ray that hits nothing.
    fn no_hit_color(&self, ctx: &ShadingContext<'_>, ray: &Ray) -> Color {
        ctx.scene.environment().color(ray)
    }
}

/// Traces rays through a scene with a fixed shader and settings.
///
/// The camera basis and projection distance are computed once on
/// construction.
pub struct Raytracer {
    scene: Arc<Scene>,
    settings: RenderSettings,
    shader: Box<dyn Shader>,
    position: Vec3,
    view_direction: Vec3,
    up: Vec3,
    sideways: Vec3,
    distance: f32,
}

impl Raytracer {
    pub fn new(
        scene: Arc<Scene>,
        settings: RenderSettings,
        shader: impl Shader + 'static,
    ) -> Self {
        let camera = **scene.camera();
        let view_direction = camera.view_direction.safe_normalize();
        let up = camera.up.safe_normalize();
        let sideways = view_direction.cross(up).safe_normalize();

        let half_angle = (std::f32::consts::PI / 360.0 * camera.field_of_view).tan();
        let distance = settings.height() as f32 / (half_angle * 2.0);

        log::debug!(
            "Raytracer basis: view={:?} up={:?} sideways={:?} distance={:.3}",
            view_direction,
            up,
            sideways,
            distance
        );

        Self {
            scene,
            settings,
            shader: Box::new(shader),
            position: camera.position,
            view_direction,
            up,
            sideways,
            distance,
        }
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn context(&self) -> ShadingContext<'_> {
        ShadingContext {
            scene: &self.scene,
            settings: &self.settings,
            view_direction: self.view_direction,
        }
    }

    /// Primary ray through pixel `(x, y)`, with `y` growing downwards.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let x_steps = x as f32 - (self.settings.width() / 2) as f32;
        let y_steps = y as f32 - (self.settings.height() / 2) as f32;

        let direction = self.distance * self.view_direction + x_steps * self.sideways
            - y_steps * self.up;

        Ray::new(self.position, direction.safe_normalize())
    }

    /// Color of pixel `(x, y)`.
    pub fn pixel_color(&self, x: u32, y: u32) -> Color {
        self.trace(&self.primary_ray(x, y), 0)
    }

    /// Color seen along `ray` at reflection depth `depth`.
    ///
    /// Components are unbounded; clamping happens at pixel encoding.
    pub fn trace(&self, ray: &Ray, depth: u32) -> Color {
        if depth > self.settings.recursion_depth() {
            return Color::ZERO;
        }

        let ctx = self.context();
        let Some(hit) = self.scene.intersect(ray, false) else {
            return self.shader.no_hit_color(&ctx, ray);
        };

        let offset = self.settings.secondary_ray_offset();
        let mut color = self.shader.default_color(&ctx, ray, &hit);

        for light in self.scene.lights() {
            let light_position = light.position();
            let to_light = (light_position - hit.position).safe_normalize();
            let shadow_start = hit.position + offset * to_light;
            let occluded = self.scene.is_occluded(shadow_start, light_position);

            color += self
                .shader
                .color_per_light(&ctx, ray, &hit, light.as_ref(), occluded);
        }

        let reflective = hit.material.reflective(hit.uv);
        if reflective > REFLECTION_THRESHOLD {
            let direction = ray.direction().reflect_about(hit.normal);
            let reflected = Ray::new(hit.position + offset * direction, direction);
            color += reflective * self.trace(&reflected, depth + 1);
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Camera, Coefficients, ConstantMaterial, PhongShader, PointLight, SimpleShader,
        SkyGradientEnvironment, SolidColorEnvironment, Sphere,
    };

    fn settings() -> RenderSettings {
        RenderSettings::new((64, 48), 1, 5, 0.003, true).unwrap()
    }

    fn mirror_scene() -> Scene {
        let mut scene = Scene::new(
            SolidColorEnvironment::new(Color::new(0.2, 0.4, 0.6)),
            Arc::new(Camera::default()),
        );
        let mirror = ConstantMaterial::new(Color::ONE)
            .with_coefficients(Coefficients::new(0.1, 0.5, 0.0, 0.8, 0.0));
        scene.add_object(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Arc::new(mirror)));
        scene.add_light(PointLight::new(Vec3::new(0.0, 5.0, 0.0), Color::splat(10.0)));
        scene
    }

    #[test]
    fn test_miss_returns_environment_color() {
        let scene = Arc::new(Scene::new(
            SkyGradientEnvironment::default(),
            Arc::new(Camera::default()),
        ));
        let tracer = Raytracer::new(scene.clone(), settings(), PhongShader::default());

        for direction in [Vec3::Z, Vec3::Y, Vec3::new(1.0, -0.3, 0.2)] {
            let ray = Ray::new(Vec3::ZERO, direction);
            assert_eq!(tracer.trace(&ray, 0), scene.environment().color(&ray));
        }
    }

    #[test]
    fn test_depth_past_limit_is_black() {
        let tracer = Raytracer::new(Arc::new(mirror_scene()), settings(), PhongShader::default());
        let limit = tracer.settings().recursion_depth();

        let hit = Ray::new(Vec3::ZERO, Vec3::Z);
        let miss = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(tracer.trace(&hit, limit + 1), Color::ZERO);
        assert_eq!(tracer.trace(&miss, limit + 1), Color::ZERO);
        assert_ne!(tracer.trace(&miss, limit), Color::ZERO);
    }

    #[test]
    fn test_center_pixel_looks_down_view_direction() {
        let tracer = Raytracer::new(Arc::new(mirror_scene()), settings(), SimpleShader);
        let ray = tracer.primary_ray(32, 24);
        assert!((ray.direction() - Vec3::Z).length() < 1e-6);
        assert_eq!(ray.start(), Vec3::ZERO);
    }

    #[test]
    fn test_primary_ray_screen_axes() {
        let tracer = Raytracer::new(Arc::new(mirror_scene()), settings(), SimpleShader);

        // Rows grow downwards.
        assert!(tracer.primary_ray(32, 0).direction().y > 0.0);
        assert!(tracer.primary_ray(32, 47).direction().y < 0.0);

        // Sideways is view x up, so with +Z view and +Y up it points to -X.
        assert!(tracer.primary_ray(63, 24).direction().x < 0.0);
        assert!(tracer.primary_ray(0, 24).direction().x > 0.0);
    }

    #[test]
    fn test_vertical_field_of_view() {
        let tracer = Raytracer::new(Arc::new(mirror_scene()), settings(), SimpleShader);
        // The top edge of the image sits half the field of view above the view axis.
        let top = tracer.primary_ray(32, 0).direction();
        let angle = top.angle_to(Vec3::Z).to_degrees();
        assert!((angle - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_reflection_adds_to_color() {
        let scene = Arc::new(mirror_scene());
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let deep = Raytracer::new(scene.clone(), settings(), PhongShader::default());
        let flat = Raytracer::new(
            scene,
            RenderSettings::new((64, 48), 1, 0, 0.003, true).unwrap(),
            PhongShader::default(),
        );

        // A recursion depth of 0 turns every reflection ray black.
        let with_reflection = deep.trace(&ray, 0);
        let without_reflection = flat.trace(&ray, 0);
        assert!(with_reflection.x > without_reflection.x);
    }

    #[test]
    fn test_camera_is_not_modified() {
        let camera = Arc::new(Camera::new(
            Vec3::ZERO,
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, 7.0),
            45.0,
        ));
        let scene = Arc::new(Scene::new(SolidColorEnvironment::new(Color::ZERO), camera.clone()));
        let _tracer = Raytracer::new(scene, settings(), SimpleShader);

        assert_eq!(camera.up, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(camera.view_direction, Vec3::new(0.0, 0.0, 7.0));
    }
}
