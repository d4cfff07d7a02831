//! Point-source ambisonic encoding.

use spatium_core::PannerPosition;

use super::{distance_gain, sh};

/// Fills `out` with the ACN/SN3D encoding gains of a point source.
///
/// `out.len()` must be `(order + 1)²`.
pub fn point_source_coefficients(order: usize, position: &PannerPosition, out: &mut [f32]) {
    sh::evaluate(
        order,
        position.azimuth.to_radians(),
        position.elevation.to_radians(),
        out,
    );
    let gain = distance_gain(position.distance);
    for c in out.iter_mut() {
        *c *= gain;
    }
}
