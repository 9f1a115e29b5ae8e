//! Indexed triangle meshes for polygon scene objects.
//!
//! A mesh is built once while the scene is assembled. Construction validates
//! the index buffer and texture coordinates and derives smooth vertex normals,
//! so the renderer never sees a malformed mesh.

use ember_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors raised while assembling a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("index buffer length {0} is not a multiple of 3")]
    NotTriangles(usize),

    #[error("{triangles} triangles but {tex_coords} texture coordinate triplets")]
    LengthMismatch { triangles: usize, tex_coords: usize },

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions, vertex normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions in object space
    positions: Vec<Vec3>,

    /// Vertex normals, one per position
    normals: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,

    /// Texture coordinates for the three corners of each triangle
    tex_coords: Vec<[Vec2; 3]>,
}

/// One triangle of a mesh with all per-corner attributes resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub tex_coords: [Vec2; 3],
}

/// Counter-clockwise cube faces, two triangles per side.
#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    0, 1, 3,  3, 1, 2, // +X
    0, 5, 1,  0, 4, 5, // -Y
    4, 7, 5,  7, 6, 5, // -X
    7, 3, 6,  6, 3, 2, // +Y
    4, 0, 7,  7, 0, 3, // +Z
    1, 5, 6,  6, 2, 1, // -Z
];

impl Mesh {
    /// Build a mesh from positions, a flat index buffer and optional
    /// per-corner texture coordinates (all zero when omitted).
    ///
    /// Vertex normals are the area-weighted average of the flat normals of
    /// all triangles sharing the vertex. Winding is counter-clockwise:
    /// the flat normal of `(a, b, c)` is `(b - a) x (c - a)`.
    pub fn from_triangles(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        tex_coords: Option<Vec<[Vec2; 3]>>,
    ) -> MeshResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangles(indices.len()));
        }
        let triangle_count = indices.len() / 3;

        let tex_coords = match tex_coords {
            Some(tex_coords) if tex_coords.len() != triangle_count => {
                return Err(MeshError::LengthMismatch {
                    triangles: triangle_count,
                    tex_coords: tex_coords.len(),
                });
            }
            Some(tex_coords) => tex_coords,
            None => vec![[Vec2::ZERO; 3]; triangle_count],
        };

        let vertex_count = positions.len();
        for (triangle, face) in indices.chunks(3).enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }

        let normals = compute_vertex_normals(&positions, &indices);

        log::debug!(
            "Built mesh: {} vertices, {} triangles",
            vertex_count,
            triangle_count
        );

        Ok(Self {
            positions,
            normals,
            indices,
            tex_coords,
        })
    }

    /// An axis-aligned box centred on the origin.
    pub fn cube(side_lengths: Vec3) -> Self {
        let h = 0.5 * side_lengths;
        let positions = vec![
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        Self::from_static(positions, CUBE_INDICES.to_vec())
    }

    /// A +Y facing rectangle in the XZ plane centred on the origin.
    pub fn plane(size_x: f32, size_z: f32) -> Self {
        let hx = 0.5 * size_x;
        let hz = 0.5 * size_z;
        let positions = vec![
            Vec3::new(hx, 0.0, hz),
            Vec3::new(hx, 0.0, -hz),
            Vec3::new(-hx, 0.0, -hz),
            Vec3::new(-hx, 0.0, hz),
        ];
        let indices = vec![0, 1, 3, 3, 1, 2];

        Self::from_static(positions, indices)
    }

    /// Builders with hard-coded topology cannot fail validation.
    fn from_static(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let triangle_count = indices.len() / 3;
        let normals = compute_vertex_normals(&positions, &indices);
        Self {
            positions,
            normals,
            indices,
            tex_coords: vec![[Vec2::ZERO; 3]; triangle_count],
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Iterate over triangles with positions, normals and UVs resolved.
    pub fn triangles(&self) -> impl Iterator<Item = MeshTriangle> + '_ {
        self.indices
            .chunks_exact(3)
            .zip(&self.tex_coords)
            .map(move |(face, tex_coords)| {
                let corner = |k: usize| face[k] as usize;
                MeshTriangle {
                    positions: [
                        self.positions[corner(0)],
                        self.positions[corner(1)],
                        self.positions[corner(2)],
                    ],
                    normals: [
                        self.normals[corner(0)],
                        self.normals[corner(1)],
                        self.normals[corner(2)],
                    ],
                    tex_coords: *tex_coords,
                }
            })
    }
}

/// Area-weighted smooth normals. Indices must already be validated.
fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for face in indices.chunks_exact(3) {
        let i0 = face[0] as usize;
        let i1 = face[1] as usize;
        let i2 = face[2] as usize;

        // The cross product's length is twice the triangle area
        let weighted = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);

        normals[i0] += weighted;
        normals[i1] += weighted;
        normals[i2] += weighted;
    }

    for normal in &mut normals {
        let len = normal.length();
        if len > 0.0 {
            *normal /= len;
        } else {
            *normal = Vec3::Y; // Default up normal for degenerate or unused vertices
        }
    }

    normals
}
