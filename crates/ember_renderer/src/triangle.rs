//! Triangle primitive for ray tracing.
//!
//! Intersection solves `start + t * dir = l1 * A + l2 * B + l3 * C` as a 3x3
//! linear system in (t, l2, l3) using Cramer's rule, with l1 = 1 - l2 - l3.

use std::sync::Arc;

use crate::{
    hit::{HitRecord, Intersect},
    Material, Ray, Shading,
};
use ember_core::MeshTriangle;
use ember_math::{solve_linear_system, Mat3, Vec2, Vec3, Vec3Ext};

/// Barycentric solution of a ray-triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    /// Ray parameter of the hit
    pub t: f32,
    /// Weights of vertices A, B and C
    pub lambdas: Vec3,
}

impl Barycentric {
    /// Blend three per-vertex values with the barycentric weights.
    #[inline]
    fn blend<T>(&self, a: T, b: T, c: T) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        a * self.lambdas.x + b * self.lambdas.y + c * self.lambdas.z
    }
}

/// A triangle primitive.
pub struct Triangle {
    /// Vertices
    positions: [Vec3; 3],
    /// Vertex normals used for smooth shading
    normals: [Vec3; 3],
    /// Per-corner texture coordinates
    tex_coords: [Vec2; 3],
    /// Pre-computed face normal (unit length)
    flat_normal: Vec3,
    material: Arc<dyn Material>,
    casts_shadows: bool,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Vertex normals default to the flat normal and UVs to zero.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, material: Arc<dyn Material>) -> Self {
        // The cross product scales with the area, so tiny triangles need a plain normalize.
        let flat_normal = (b - a).cross(c - a).normalize_or_zero();
        Self {
            positions: [a, b, c],
            normals: [flat_normal; 3],
            tex_coords: [Vec2::ZERO; 3],
            flat_normal,
            material,
            casts_shadows: true,
        }
    }

    /// Create a triangle from a resolved mesh triangle.
    pub fn from_mesh_triangle(triangle: &MeshTriangle, material: Arc<dyn Material>) -> Self {
        let [a, b, c] = triangle.positions;
        Self::new(a, b, c, material)
            .with_vertex_normals(triangle.normals)
            .with_tex_coords(triangle.tex_coords)
    }

    /// Set per-vertex normals (for smooth shading).
    pub fn with_vertex_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = normals.map(Vec3Ext::safe_normalize);
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: [Vec2; 3]) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    pub fn flat_normal(&self) -> Vec3 {
        self.flat_normal
    }

    /// Solve for the ray parameter and barycentric weights of a hit.
    ///
    /// Returns `None` when the ray misses, is parallel to the plane
    /// (singular system), or the plane lies behind the ray start.
    pub fn barycentric(&self, ray: &Ray) -> Option<Barycentric> {
        let [a, b, c] = self.positions;
        let matrix = Mat3::from_cols(-ray.direction(), b - a, c - a);
        let solution = solve_linear_system(matrix, ray.start() - a)?;

        let (t, lambda2, lambda3) = (solution.x, solution.y, solution.z);
        let inside = lambda2 >= 0.0 && lambda3 >= 0.0 && lambda2 + lambda3 <= 1.0;
        if !inside || t < 0.0 {
            return None;
        }

        Some(Barycentric {
            t,
            lambdas: Vec3::new(1.0 - lambda2 - lambda3, lambda2, lambda3),
        })
    }
}

impl Intersect for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let bary = self.barycentric(ray)?;

        let normal = match self.material.shading() {
            Shading::Smooth => bary
                .blend(self.normals[0], self.normals[1], self.normals[2])
                .safe_normalize(),
            Shading::Flat => self.flat_normal,
        };
        let uv = bary.blend(self.tex_coords[0], self.tex_coords[1], self.tex_coords[2]);

        Some(HitRecord::new(
            ray.at(bary.t),
            normal,
            uv,
            self.material.as_ref(),
        ))
    }

    fn casts_shadows(&self) -> bool {
        self.casts_shadows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::ConstantMaterial;
    use ember_math::Color;

    fn xy_triangle(shading: Shading) -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Arc::new(ConstantMaterial::new(Color::new(0.5, 0.5, 0.5)).with_shading(shading)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = xy_triangle(Shading::Flat);

        // Ray pointing at triangle center
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.intersect(&ray).unwrap();

        assert!((rec.position - Vec3::new(0.0, 0.0, -1.0)).length() < 0.001);
        assert!((rec.normal - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = xy_triangle(Shading::Flat);

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray).is_none());

        // Ray passing beside the triangle
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_is_no_hit() {
        let tri = xy_triangle(Shading::Flat);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);
        assert!(tri.barycentric(&ray).is_none());
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_barycentric_weights_are_convex() {
        let tri = xy_triangle(Shading::Flat);
        let targets = [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-0.9, -0.95, -1.0),
            Vec3::new(0.5, -0.2, -1.0),
            Vec3::new(0.0, 0.9, -1.0),
        ];

        for target in targets {
            let start = Vec3::new(0.3, -0.1, 2.0);
            let bary = tri.barycentric(&Ray::new(start, target - start)).unwrap();
            let l = bary.lambdas;
            assert!((l.x + l.y + l.z - 1.0).abs() < 1e-5);
            for w in [l.x, l.y, l.z] {
                assert!((-1e-6..=1.0 + 1e-6).contains(&w), "weight {w} out of range");
            }
        }
    }

    #[test]
    fn test_smooth_normal_interpolation() {
        let tri = xy_triangle(Shading::Smooth).with_vertex_normals([
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::Z,
        ]);

        // Near vertex A the normal leans towards A's normal
        let start = Vec3::new(-0.9, -0.95, 1.0);
        let rec = tri.intersect(&Ray::new(start, -Vec3::Z)).unwrap();
        assert!(rec.normal.x < -0.5);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);

        // The flat-shaded twin ignores vertex normals
        let flat = xy_triangle(Shading::Flat).with_vertex_normals([Vec3::X; 3]);
        let rec = flat.intersect(&Ray::new(start, -Vec3::Z)).unwrap();
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_tex_coord_interpolation() {
        let tri = xy_triangle(Shading::Flat).with_tex_coords([
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);

        // Vertex C exactly
        let rec = tri
            .intersect(&Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Z))
            .unwrap();
        assert!((rec.uv - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_tiny_triangle_hit() {
        let scale = 1e-6;
        let material = Arc::new(ConstantMaterial::new(Color::ONE));
        let tri = Triangle::new(
            Vec3::new(-scale, -scale, -1.0),
            Vec3::new(scale, -scale, -1.0),
            Vec3::new(0.0, scale, -1.0),
            material,
        );

        let rec = tri.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).unwrap();
        assert!((rec.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_from_mesh_triangle() {
        let mesh = ember_core::Mesh::plane(2.0, 2.0);
        let material: Arc<dyn Material> = Arc::new(ConstantMaterial::new(Color::ONE));
        let tri = mesh
            .triangles()
            .map(|t| Triangle::from_mesh_triangle(&t, material.clone()))
            .next()
            .unwrap();
        assert!((tri.flat_normal() - Vec3::Y).length() < 1e-6);
    }
}
