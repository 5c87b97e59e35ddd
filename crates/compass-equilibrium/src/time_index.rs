// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Nearest Time Lookup
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use compass_types::error::{CompassError, CompassResult};
use ndarray::ArrayView1;

/// Index of the stored time closest to `requested`.
///
/// The request must lie inside `[min(time), max(time)]`; anything outside,
/// or a non-finite request, is `OutOfRange`. On an exact tie between two
/// neighbours the lower index wins (argmin of |t - requested|).
pub fn nearest_time_index(time: ArrayView1<f64>, requested: f64) -> CompassResult<usize> {
    if time.is_empty() {
        return Err(CompassError::ShapeMismatch(
            "time coordinate is empty".to_string(),
        ));
    }
    let min = time.iter().copied().fold(f64::INFINITY, f64::min);
    let max = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !requested.is_finite() || requested < min || requested > max {
        return Err(CompassError::OutOfRange {
            requested,
            min,
            max,
        });
    }

    let mut best_index = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &t) in time.iter().enumerate() {
        let distance = (t - requested).abs();
        if distance < best_distance {
            best_distance = distance;
            best_index = i;
        }
    }
    Ok(best_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_below_midpoint() {
        let time = array![1.0, 2.0, 3.0];
        assert_eq!(nearest_time_index(time.view(), 2.4).unwrap(), 1);
        assert_eq!(nearest_time_index(time.view(), 2.6).unwrap(), 2);
    }

    #[test]
    fn test_tie_prefers_lower_index() {
        let time = array![1.0, 2.0, 3.0];
        assert_eq!(nearest_time_index(time.view(), 2.5).unwrap(), 1);
        assert_eq!(nearest_time_index(time.view(), 1.5).unwrap(), 0);
    }

    #[test]
    fn test_range_endpoints_are_inside() {
        let time = array![1.0, 2.0, 3.0];
        assert_eq!(nearest_time_index(time.view(), 1.0).unwrap(), 0);
        assert_eq!(nearest_time_index(time.view(), 3.0).unwrap(), 2);
    }

    #[test]
    fn test_out_of_range() {
        let time = array![1.0, 2.0, 3.0];
        let err = nearest_time_index(time.view(), 10.0).unwrap_err();
        match err {
            CompassError::OutOfRange { requested, min, max } => {
                assert_eq!(requested, 10.0);
                assert_eq!(min, 1.0);
                assert_eq!(max, 3.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert!(nearest_time_index(time.view(), 0.999).is_err());
    }

    #[test]
    fn test_nan_request_rejected() {
        let time = array![1.0, 2.0];
        let err = nearest_time_index(time.view(), f64::NAN).unwrap_err();
        assert!(matches!(err, CompassError::OutOfRange { .. }));
    }

    #[test]
    fn test_single_sample() {
        let time = array![1.135];
        assert_eq!(nearest_time_index(time.view(), 1.135).unwrap(), 0);
        assert!(nearest_time_index(time.view(), 1.136).is_err());
    }

    #[test]
    fn test_empty_time() {
        let time = ndarray::Array1::<f64>::zeros(0);
        assert!(matches!(
            nearest_time_index(time.view(), 0.0),
            Err(CompassError::ShapeMismatch(_))
        ));
    }
}
