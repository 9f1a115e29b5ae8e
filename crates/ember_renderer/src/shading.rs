//! Concrete shaders for the [`Raytracer`](crate::Raytracer).

use crate::{HitRecord, Light, Ray, Shader, ShadingContext};
use ember_math::{Color, Vec3Ext};

/// Exponent used by [`PhongShader::default`].
pub const DEFAULT_PHONG_EXPONENT: f32 = 4.0;

/// Lights-free preview shading.
///
/// Surfaces are lit as if by a headlight along the camera view direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleShader;

impl Shader for SimpleShader {
    fn default_color(&self, ctx: &ShadingContext<'_>, _ray: &Ray, hit: &HitRecord<'_>) -> Color {
        let facing = hit.normal.dot(-ctx.view_direction).max(0.0);
        facing * hit.material.color(hit.uv)
    }

    fn color_per_light(
        &self,
        _ctx: &ShadingContext<'_>,
        _ray: &Ray,
        _hit: &HitRecord<'_>,
        _light: &dyn Light,
        _occluded: bool,
    ) -> Color {
        Color::ZERO
    }
}

/// Phong illumination with inverse-square light falloff.
///
/// Ambient light reaches every hit; diffuse and specular terms only reach
/// hits that can see the light. Each light's contribution is capped by the
/// material color per channel.
#[derive(Debug, Clone, Copy)]
pub struct PhongShader {
    phong_exponent: f32,
}

impl PhongShader {
    pub fn new(phong_exponent: f32) -> Self {
        Self { phong_exponent }
    }

    pub fn phong_exponent(&self) -> f32 {
        self.phong_exponent
    }
}

impl Default for PhongShader {
    fn default() -> Self {
        Self::new(DEFAULT_PHONG_EXPONENT)
    }
}

impl Shader for PhongShader {
    fn default_color(&self, ctx: &ShadingContext<'_>, _ray: &Ray, hit: &HitRecord<'_>) -> Color {
        if ctx.settings.lighting_enabled() {
            Color::ZERO
        } else {
            hit.material.color(hit.uv)
        }
    }

    fn color_per_light(
        &self,
        ctx: &ShadingContext<'_>,
        ray: &Ray,
        hit: &HitRecord<'_>,
        light: &dyn Light,
        occluded: bool,
    ) -> Color {
        if !ctx.settings.lighting_enabled() {
            return Color::ZERO;
        }

        let material = hit.material;
        let uv = hit.uv;

        let light_to_hit = hit.position - light.position();
        let distance_squared = light_to_hit.length_squared().max(f32::EPSILON);
        let light_direction = light_to_hit.safe_normalize();
        let intensity = light.intensity(light_direction) / distance_squared;

        let mut color = intensity * material.ambient(uv);

        if !occluded {
            let diffuse = hit.normal.dot(-light_direction).max(0.0) * material.diffuse(uv);

            let reflected = ray.direction().reflect_about(hit.normal);
            let specular = reflected
                .cos_angle(-light_direction)
                .max(0.0)
                .powf(self.phong_exponent)
                * material.specular(uv);

            color += intensity * (diffuse + specular);
        }

        color.min(material.color(uv))
    }
}
