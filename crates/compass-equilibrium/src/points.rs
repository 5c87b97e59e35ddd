//! Characteristic points (X-points, strike points) at one time slice.

use compass_types::error::{CompassError, CompassResult};
use compass_types::snapshot::Point2D;
use ndarray::ArrayView1;

/// Pair R/Z coordinates into points, skipping any pair with a NaN
/// component. Input order is preserved.
///
/// Reconstructions report a fixed number of slots per time and mark
/// unused slots with NaN (e.g. an upper X-point in a lower single null).
pub fn collect_points(r: ArrayView1<f64>, z: ArrayView1<f64>) -> CompassResult<Vec<Point2D>> {
    if r.len() != z.len() {
        return Err(CompassError::ShapeMismatch(format!(
            "point coordinate arrays are inconsistent in length: R={}, Z={}",
            r.len(),
            z.len()
        )));
    }
    Ok(r.iter()
        .zip(z.iter())
        .filter(|(r, z)| !r.is_nan() && !z.is_nan())
        .map(|(&r, &z)| Point2D::new(r, z))
        .collect())
}
