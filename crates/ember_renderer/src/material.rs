//! Material trait describing how a surface responds to light.
//!
//! Every property is a function of the texture coordinates at the hit, so
//! procedural materials can vary across a surface.

use ember_math::{Color, Vec2};

/// How triangle normals and UVs are derived at a hit point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Use the triangle's geometric normal
    #[default]
    Flat,
    /// Interpolate vertex normals barycentrically
    Smooth,
}

/// Trait for materials consumed by the shaders.
///
/// The five coefficients are independent; nothing requires them to sum to 1.
pub trait Material: Send + Sync {
    /// Base color at the given UV coordinates.
    fn color(&self, uv: Vec2) -> Color;

    fn ambient(&self, uv: Vec2) -> f32;

    fn diffuse(&self, uv: Vec2) -> f32;

    fn specular(&self, uv: Vec2) -> f32;

    /// Mirror reflection weight. Values above 0.001 spawn reflection rays.
    fn reflective(&self, uv: Vec2) -> f32;

    /// Carried for completeness; the raytracer does not trace transmission.
    fn transmissive(&self, uv: Vec2) -> f32;

    fn shading(&self) -> Shading;
}

/// Ambient/diffuse/specular/reflective/transmissive weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub reflective: f32,
    pub transmissive: f32,
}

impl Coefficients {
    /// Purely diffuse, no ambient, specular or reflection.
    pub const DIFFUSE: Coefficients = Coefficients {
        ambient: 0.0,
        diffuse: 1.0,
        specular: 0.0,
        reflective: 0.0,
        transmissive: 0.0,
    };

    pub fn new(
        ambient: f32,
        diffuse: f32,
        specular: f32,
        reflective: f32,
        transmissive: f32,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            reflective,
            transmissive,
        }
    }

    /// Scale all weights so they sum to 1. All-zero weights are left as is.
    pub fn normalized(self) -> Self {
        let total =
            self.ambient + self.diffuse + self.specular + self.reflective + self.transmissive;
        if total <= 0.0 {
            return self;
        }
        Self {
            ambient: self.ambient / total,
            diffuse: self.diffuse / total,
            specular: self.specular / total,
            reflective: self.reflective / total,
            transmissive: self.transmissive / total,
        }
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::DIFFUSE
    }
}

/// A material with the same properties everywhere on the surface.
#[derive(Debug, Clone)]
pub struct ConstantMaterial {
    color: Color,
    coefficients: Coefficients,
    shading: Shading,
}

impl ConstantMaterial {
    /// Create a purely diffuse, flat-shaded material of the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            coefficients: Coefficients::default(),
            shading: Shading::Flat,
        }
    }

    pub fn with_coefficients(mut self, coefficients: Coefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    /// Rescale the coefficients so they sum to 1.
    pub fn normalize_to_one(mut self) -> Self {
        self.coefficients = self.coefficients.normalized();
        self
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }
}

impl Material for ConstantMaterial {
    fn color(&self, _uv: Vec2) -> Color {
        self.color
    }

    fn ambient(&self, _uv: Vec2) -> f32 {
        self.coefficients.ambient
    }

    fn diffuse(&self, _uv: Vec2) -> f32 {
        self.coefficients.diffuse
    }

    fn specular(&self, _uv: Vec2) -> f32 {
        self.coefficients.specular
    }

    fn reflective(&self, _uv: Vec2) -> f32 {
        self.coefficients.reflective
    }

    fn transmissive(&self, _uv: Vec2) -> f32 {
        self.coefficients.transmissive
    }

    fn shading(&self) -> Shading {
        self.shading
    }
}

/// Debug material whose color visualizes the texture coordinates as
/// `(u, u, v)`.
#[derive(Debug, Clone, Default)]
pub struct GradientMaterial {
    coefficients: Coefficients,
    shading: Shading,
}

impl GradientMaterial {
    pub fn new(coefficients: Coefficients, shading: Shading) -> Self {
        Self {
            coefficients,
            shading,
        }
    }
}

impl Material for GradientMaterial {
    fn color(&self, uv: Vec2) -> Color {
        Color::new(uv.x, uv.x, uv.y)
    }

    fn ambient(&self, _uv: Vec2) -> f32 {
        self.coefficients.ambient
    }

    fn diffuse(&self, _uv: Vec2) -> f32 {
        self.coefficients.diffuse
    }

    fn specular(&self, _uv: Vec2) -> f32 {
        self.coefficients.specular
    }

    fn reflective(&self, _uv: Vec2) -> f32 {
        self.coefficients.reflective
    }

    fn transmissive(&self, _uv: Vec2) -> f32 {
        self.coefficients.transmissive
    }

    fn shading(&self) -> Shading {
        self.shading
    }
}
