// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Time-Slice Extraction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cut a single equilibrium snapshot out of a time-indexed dataset.
//!
//! Algorithm:
//! 1. Pick the stored time nearest to the request (range-checked, ties to
//!    the lower index)
//! 2. Slice every time-indexed field at that index
//! 3. Drop NaN X-/strike-point slots, pair profiles with psi_n
//! 4. Strip the closing vertex from LCFS and limiter contours
//!
//! Extraction only reads the dataset, so any number of snapshots can be
//! cut from the same dataset, from any number of threads.

use crate::points::collect_points;
use crate::polygon::normalize_polygon;
use crate::profile::profile_rows;
use crate::time_index::nearest_time_index;
use compass_types::dataset::EquilibriumDataset;
use compass_types::error::CompassResult;
use compass_types::snapshot::{EquilibriumSnapshot, Point2D};
use ndarray::Axis;

/// Snapshot at the stored time nearest to `requested_time`.
///
/// `snapshot.time` is the stored time, not `requested_time`.
pub fn extract(
    dataset: &EquilibriumDataset,
    requested_time: f64,
) -> CompassResult<EquilibriumSnapshot> {
    let index = nearest_time_index(dataset.time().view(), requested_time)?;
    snapshot_at(dataset, index)
}

/// Snapshot at a stored time index. `index` must be below `dataset.n_times()`.
pub(crate) fn snapshot_at(
    dataset: &EquilibriumDataset,
    index: usize,
) -> CompassResult<EquilibriumSnapshot> {
    let psi_n = dataset.psi_n().view();

    let lcfs_polygon =
        normalize_polygon(dataset.r_lcfs().row(index), dataset.z_lcfs().row(index))?;
    let limiter_polygon = dataset
        .limiter()
        .map(|limiter| {
            let (r, z) = limiter.contour_at(index);
            normalize_polygon(r, z)
        })
        .transpose()?;

    Ok(EquilibriumSnapshot {
        time: dataset.time()[index],
        r: dataset.r().clone(),
        z: dataset.z().clone(),
        psi_grid: dataset.psi_grid().index_axis(Axis(0), index).to_owned(),
        psi_axis: dataset.psi_axis()[index],
        psi_lcfs: dataset.psi_lcfs()[index],
        magnetic_axis: Point2D::new(
            dataset.r_magnetic_axis()[index],
            dataset.z_magnetic_axis()[index],
        ),
        x_points: collect_points(dataset.r_xpoint().row(index), dataset.z_xpoint().row(index))?,
        strike_points: collect_points(
            dataset.r_strike_point().row(index),
            dataset.z_strike_point().row(index),
        )?,
        f_profile: profile_rows(psi_n, dataset.f_profile().row(index))?,
        q_profile: profile_rows(psi_n, dataset.q_profile().row(index))?,
        b_vacuum_radius: dataset.b_vacuum_radius().at(index),
        b_vacuum_magnitude: dataset.b_vacuum_magnitude()[index],
        lcfs_polygon,
        limiter_polygon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_types::dataset::{DatasetBuilder, Field};
    use compass_types::error::CompassError;
    use ndarray::{arr0, array, Array2, Array3};

    const NAN: f64 = f64::NAN;

    /// Three time slices of a square LCFS drifting outward in R.
    fn sample_builder() -> DatasetBuilder {
        let nt = 3;
        let psi_grid = Array3::from_shape_fn((nt, 4, 3), |(it, ir, iz)| {
            it as f64 * 100.0 + ir as f64 * 10.0 + iz as f64
        });
        let mut r_lcfs = Array2::zeros((nt, 5));
        let mut z_lcfs = Array2::zeros((nt, 5));
        for it in 0..nt {
            let shift = 0.01 * it as f64;
            let r = [0.4, 0.7, 0.7, 0.4, 0.4];
            let z = [-0.2, -0.2, 0.2, 0.2, -0.2];
            for k in 0..5 {
                r_lcfs[[it, k]] = r[k] + shift;
                z_lcfs[[it, k]] = z[k];
            }
        }
        DatasetBuilder::new()
            .with(Field::Time, array![1.0, 2.0, 3.0])
            .with(Field::R, array![0.3, 0.5, 0.7, 0.9])
            .with(Field::Z, array![-0.4, 0.0, 0.4])
            .with(Field::PsiGrid, psi_grid)
            .with(Field::PsiAxis, array![-0.05, -0.06, -0.07])
            .with(Field::PsiLcfs, array![0.0, 0.001, 0.002])
            .with(Field::RMagneticAxis, array![0.55, 0.56, 0.57])
            .with(Field::ZMagneticAxis, array![0.0, 0.01, 0.02])
            .with(Field::RXpoint, array![[0.48, NAN], [0.5, NAN], [0.49, 0.51]])
            .with(Field::ZXpoint, array![[-0.3, 0.3], [0.3, 0.1], [-0.31, 0.31]])
            .with(Field::RStrikePoint, array![[0.35, 0.45], [0.36, 0.46], [NAN, 0.47]])
            .with(Field::ZStrikePoint, array![[-0.4, -0.4], [-0.4, NAN], [-0.4, -0.4]])
            .with(Field::PsiN, array![0.0, 0.5, 1.0])
            .with(Field::FProfile, array![[0.7, 0.68, 0.66], [0.71, 0.69, 0.67], [0.72, 0.7, 0.68]])
            .with(Field::QProfile, array![[1.0, 1.5, 3.0], [1.1, 1.6, 3.1], [1.2, 1.7, 3.2]])
            .with(Field::BtorVacuumRadius, arr0(0.56))
            .with(Field::BtorVacuumMagnitude, array![1.1, 1.2, 1.3])
            .with(Field::RLcfs, r_lcfs)
            .with(Field::ZLcfs, z_lcfs)
            .with(Field::RLimiter, array![0.2, 0.8, 0.8, 0.2, 0.2])
            .with(Field::ZLimiter, array![-0.4, -0.4, 0.4, 0.4, -0.4])
    }

    #[test]
    fn test_extract_selects_nearest_slice() {
        let ds = sample_builder().build().unwrap();
        let snap = extract(&ds, 2.4).unwrap();

        assert_eq!(snap.time, 2.0);
        assert_eq!(snap.psi_axis, -0.06);
        assert_eq!(snap.psi_lcfs, 0.001);
        assert_eq!(snap.magnetic_axis, Point2D::new(0.56, 0.01));
        assert_eq!(snap.b_vacuum_radius, 0.56);
        assert_eq!(snap.b_vacuum_magnitude, 1.2);
        assert_eq!(snap.psi_grid.dim(), (4, 3));
        assert_eq!(snap.psi_grid[[2, 1]], 121.0);
        assert_eq!(snap.r, array![0.3, 0.5, 0.7, 0.9]);
    }

    #[test]
    fn test_extract_reports_stored_time() {
        let ds = sample_builder().build().unwrap();
        let snap = extract(&ds, 2.5).unwrap();
        assert_eq!(snap.time, 2.0);
        assert_eq!(snap.requested_offset(2.5), -0.5);
    }

    #[test]
    fn test_extract_filters_nan_points() {
        let ds = sample_builder().build().unwrap();
        let snap = extract(&ds, 2.0).unwrap();
        assert_eq!(snap.x_points, vec![Point2D::new(0.5, 0.3)]);
        assert_eq!(snap.strike_points, vec![Point2D::new(0.36, -0.4)]);

        let snap = extract(&ds, 3.0).unwrap();
        assert_eq!(
            snap.x_points,
            vec![Point2D::new(0.49, -0.31), Point2D::new(0.51, 0.31)]
        );
        assert_eq!(snap.strike_points, vec![Point2D::new(0.47, -0.4)]);
    }

    #[test]
    fn test_extract_profiles() {
        let ds = sample_builder().build().unwrap();
        let snap = extract(&ds, 1.0).unwrap();
        assert_eq!(snap.f_profile, array![[0.0, 0.5, 1.0], [0.7, 0.68, 0.66]]);
        assert_eq!(snap.q_profile, array![[0.0, 0.5, 1.0], [1.0, 1.5, 3.0]]);
    }

    #[test]
    fn test_extract_polygons() {
        let ds = sample_builder().build().unwrap();
        let snap = extract(&ds, 3.0).unwrap();
        assert_eq!(snap.lcfs_polygon.dim(), (2, 4));
        assert!((snap.lcfs_polygon[[0, 0]] - 0.42).abs() < 1e-12);
        assert_eq!(snap.lcfs_polygon[[1, 0]], -0.2);

        let limiter = snap.limiter_polygon.unwrap();
        assert_eq!(limiter, array![[0.2, 0.8, 0.8, 0.2], [-0.4, -0.4, 0.4, 0.4]]);
    }

    #[test]
    fn test_missing_limiter_is_none() {
        let mut builder = sample_builder();
        builder.remove(Field::RLimiter);
        builder.remove(Field::ZLimiter);
        let ds = builder.build().unwrap();
        let snap = extract(&ds, 1.0).unwrap();
        assert!(snap.limiter_polygon.is_none());
    }

    #[test]
    fn test_per_time_vacuum_radius() {
        let ds = sample_builder()
            .with(Field::BtorVacuumRadius, array![0.55, 0.56, 0.57])
            .build()
            .unwrap();
        assert_eq!(extract(&ds, 2.9).unwrap().b_vacuum_radius, 0.57);
    }

    #[test]
    fn test_out_of_range() {
        let ds = sample_builder().build().unwrap();
        let err = extract(&ds, 10.0).unwrap_err();
        assert!(matches!(err, CompassError::OutOfRange { .. }));
        assert!(extract(&ds, 0.5).is_err());
    }

    #[test]
    fn test_degenerate_lcfs_slice() {
        let lcfs = Array2::from_elem((3, 1), 0.5);
        let ds = sample_builder()
            .with(Field::RLcfs, lcfs.clone())
            .with(Field::ZLcfs, lcfs)
            .build()
            .unwrap();
        let err = extract(&ds, 1.0).unwrap_err();
        assert!(matches!(err, CompassError::InsufficientPoints { found: 1, .. }));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let ds = sample_builder().build().unwrap();
        let a = extract(&ds, 1.7).unwrap();
        let b = extract(&ds, 1.7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.time, 2.0);
    }
}
