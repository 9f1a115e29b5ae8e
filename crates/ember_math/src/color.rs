//! Linear RGB color helpers.

use crate::{Interval, Vec3};

/// Color type alias (linear RGB, unbounded until output).
///
/// `x`, `y`, `z` hold red, green and blue. Values may leave [0, 1] while
/// light contributions are accumulated.
pub type Color = Vec3;

/// Clamp a color to [0, 1] and quantize it to a BGR byte triplet.
pub fn color_to_bgr(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (Interval::UNIT.clamp(c) * 255.0).round() as u8;
    [quantize(color.z), quantize(color.y), quantize(color.x)]
}
