// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod color;
mod interval;
mod linear;
mod vector;

pub use color::{color_to_bgr, Color};
pub use interval::Interval;
pub use linear::solve_linear_system;
pub use vector::Vec3Ext;
