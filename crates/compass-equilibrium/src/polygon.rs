// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Polygon Normalization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed-contour cleanup for LCFS and limiter polygons.
//!
//! Reconstruction codes close a contour by repeating its first vertex at
//! the end. Renderers already treat the vertex list as cyclic, so that
//! repeat is dropped here.

use compass_types::constants::MIN_POLYGON_POINTS;
use compass_types::error::{CompassError, CompassResult};
use ndarray::{stack, Array2, ArrayView1, Axis};

/// Remove vertices that duplicate the first one and stack the rest as a
/// `[2, M]` array (row 0 = R, row 1 = Z).
///
/// Every vertex is compared against vertex 0 only, so repeated vertices
/// elsewhere in the contour are kept. Vertex 0 is always kept. The
/// comparison is IEEE inequality, so NaN vertices are never dropped.
pub fn normalize_polygon(r: ArrayView1<f64>, z: ArrayView1<f64>) -> CompassResult<Array2<f64>> {
    if r.len() != z.len() {
        return Err(CompassError::ShapeMismatch(format!(
            "polygon coordinate arrays are inconsistent in length: R={}, Z={}",
            r.len(),
            z.len()
        )));
    }
    let n = r.len();
    if n < MIN_POLYGON_POINTS {
        return Err(CompassError::InsufficientPoints {
            found: n,
            required: MIN_POLYGON_POINTS,
        });
    }

    let (r0, z0) = (r[0], z[0]);
    let keep: Vec<usize> = (0..n)
        .filter(|&i| i == 0 || r[i] != r0 || z[i] != z0)
        .collect();

    let (r_kept, z_kept) = (r.select(Axis(0), &keep), z.select(Axis(0), &keep));
    stack(Axis(0), &[r_kept.view(), z_kept.view()])
        .map_err(|e| CompassError::ShapeMismatch(format!("polygon stacking failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_closing_vertex_removed() {
        let r = array![0.0, 1.0, 1.0, 0.0, 0.0];
        let z = array![0.0, 0.0, 1.0, 1.0, 0.0];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly, array![[0.0, 1.0, 1.0, 0.0], [0.0, 0.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_open_contour_unchanged() {
        let r = array![0.0, 1.0, 1.0, 0.0];
        let z = array![0.0, 0.0, 1.0, 1.0];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly.dim(), (2, 4));
        assert_eq!(poly.row(0), r);
        assert_eq!(poly.row(1), z);
    }

    #[test]
    fn test_only_first_vertex_duplicates_removed() {
        // Consecutive repeat of vertex 2 survives; repeats of vertex 0 do not.
        let r = array![0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
        let z = array![0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly, array![[0.0, 1.0, 1.0, 1.0], [0.0, 0.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_shared_r_or_z_is_kept() {
        // Same R as vertex 0 but different Z (and vice versa) is a distinct vertex.
        let r = array![0.5, 0.5, 0.9];
        let z = array![0.0, 0.3, 0.0];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly.ncols(), 3);
    }

    #[test]
    fn test_degenerate_contour_keeps_anchor() {
        let r = array![0.4, 0.4, 0.4];
        let z = array![0.1, 0.1, 0.1];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly, array![[0.4], [0.1]]);
    }

    #[test]
    fn test_nan_vertices_survive() {
        let r = array![0.0, f64::NAN, 1.0, 0.0];
        let z = array![0.0, 0.5, 1.0, 0.0];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly.ncols(), 3);
        assert!(poly[[0, 1]].is_nan());

        // NaN anchor differs from everything, including itself.
        let r = array![f64::NAN, 1.0, f64::NAN];
        let z = array![0.0, 1.0, 0.0];
        let poly = normalize_polygon(r.view(), z.view()).unwrap();
        assert_eq!(poly.ncols(), 3);
    }

    #[test]
    fn test_length_mismatch() {
        let r = Array1::<f64>::zeros(5);
        let z = Array1::<f64>::zeros(4);
        let err = normalize_polygon(r.view(), z.view()).unwrap_err();
        assert!(matches!(err, CompassError::ShapeMismatch(_)));
    }

    #[test]
    fn test_single_point_rejected() {
        let err = normalize_polygon(array![1.0].view(), array![2.0].view()).unwrap_err();
        assert!(matches!(
            err,
            CompassError::InsufficientPoints {
                found: 1,
                required: 2
            }
        ));
    }

    #[test]
    fn test_mismatch_reported_before_size() {
        let err = normalize_polygon(array![1.0].view(), Array1::<f64>::zeros(0).view()).unwrap_err();
        assert!(matches!(err, CompassError::ShapeMismatch(_)));
    }
}
