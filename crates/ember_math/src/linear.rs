//! Small dense linear algebra.

use crate::{Mat3, Vec3};

/// Systems whose determinant is below this fraction of the product of the
/// column lengths are treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-6;

/// Solve `matrix * x = rhs` with Cramer's rule.
///
/// Returns `None` when the system is singular or nearly so. The cutoff is
/// relative to the column lengths, which bound the determinant, so the
/// result does not depend on the overall scale of the system.
pub fn solve_linear_system(matrix: Mat3, rhs: Vec3) -> Option<Vec3> {
    let determinant = matrix.determinant();
    let scale = matrix.x_axis.length() * matrix.y_axis.length() * matrix.z_axis.length();
    if !determinant.is_finite() || determinant.abs() <= SINGULAR_EPSILON * scale {
        return None;
    }

    let x = Mat3::from_cols(rhs, matrix.y_axis, matrix.z_axis).determinant();
    let y = Mat3::from_cols(matrix.x_axis, rhs, matrix.z_axis).determinant();
    let z = Mat3::from_cols(matrix.x_axis, matrix.y_axis, rhs).determinant();

    Some(Vec3::new(x, y, z) / determinant)
}
