//! Ember Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Meshes**: indexed triangle meshes with per-corner texture coordinates,
//!   area-weighted vertex normals, and cube/plane builders
//! - **Render settings**: resolution, worker count, recursion depth and ray
//!   offset, loadable from JSON
//!
//! Everything here is validated at scene-build time so the renderer can
//! assume well-formed input.
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{Mesh, RenderSettings};
//!
//! let settings = RenderSettings::from_json_file("settings.json")?;
//! let cube = Mesh::cube(Vec3::splat(2.0));
//! println!("{} triangles at {}x{}", cube.triangle_count(),
//!     settings.width(), settings.height());
//! ```

pub mod mesh;
pub mod settings;

// Re-export commonly used types
pub use mesh::{Mesh, MeshError, MeshResult, MeshTriangle};
pub use settings::{RenderSettings, SettingsError, SettingsResult, MAX_RECURSION_DEPTH};
