//! Ember Renderer - tile-based CPU Whitted raytracer.
//!
//! Primary rays are traced from a pinhole camera; every hit gathers direct
//! light through shadow rays and recurses along mirror reflections up to a
//! fixed depth. How a surface is shaded is a pluggable [`Shader`].
//!
//! Frames are cut into an 8x8 grid of tiles that a pool of worker threads
//! renders into a shared BGR [`FrameBuffer`].
//!
//! # Example
//!
//! ```ignore
//! let mut scene = Scene::new(SolidColorEnvironment::new(Color::ZERO), Arc::new(Camera::default()));
//! scene.add_object(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Arc::new(ConstantMaterial::new(Color::X))));
//! scene.add_light(PointLight::new(Vec3::new(0.0, 5.0, 5.0), Color::splat(20.0)));
//!
//! let raytracer = Raytracer::new(Arc::new(scene), RenderSettings::default(), PhongShader::default());
//! let bgr = Renderer::new(raytracer).render()?;
//! ```

mod camera;
mod environment;
mod framebuffer;
mod hit;
mod light;
mod material;
mod polygon;
mod ray;
mod raytracer;
mod renderer;
mod scene;
mod shading;
mod sphere;
mod tile;
mod triangle;

pub use camera::Camera;
pub use environment::{Environment, SkyGradientEnvironment, SolidColorEnvironment};
pub use framebuffer::FrameBuffer;
pub use hit::{HitRecord, Intersect};
pub use light::{Light, PointLight};
pub use material::{Coefficients, ConstantMaterial, GradientMaterial, Material, Shading};
pub use polygon::PolygonObject;
pub use ray::Ray;
pub use raytracer::{Raytracer, Shader, ShadingContext, REFLECTION_THRESHOLD};
pub use renderer::{RenderError, RenderResult, Renderer};
pub use scene::Scene;
pub use shading::{PhongShader, SimpleShader, DEFAULT_PHONG_EXPONENT};
pub use sphere::Sphere;
pub use tile::{generate_tiles, render_tile, Tile, GRID_RESOLUTION};
pub use triangle::{Barycentric, Triangle};

/// Re-export math types from ember_math
pub use ember_math::{Color, Vec2, Vec3};
/// Re-export settings from ember_core
pub use ember_core::RenderSettings;
