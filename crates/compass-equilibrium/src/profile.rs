// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Flux Profiles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Flux-function profiles and poloidal-flux normalization.

use compass_types::constants::MIN_FLUX_SAMPLES;
use compass_types::error::{CompassError, CompassResult};
use ndarray::{stack, Array2, ArrayView1, ArrayView2, Axis};

/// Pair a profile with its flux coordinate as a `[2, N]` array
/// (row 0 = psi_n, row 1 = values).
pub fn profile_rows<'a>(
    psi_n: ArrayView1<'a, f64>,
    values: ArrayView1<'a, f64>,
) -> CompassResult<Array2<f64>> {
    stack(Axis(0), &[psi_n, values]).map_err(|_| {
        CompassError::ShapeMismatch(format!(
            "profile has {} values for {} psi_n samples",
            values.len(),
            psi_n.len()
        ))
    })
}

/// Normalize poloidal flux per column so the first radial sample maps to 0
/// and the last to 1.
///
/// `psi` is `[radial, time]` as METIS stores `profil0d.psi`:
/// `psin = (psi - psi[0]) / (psi[last] - psi[0])`.
/// A column whose end points coincide cannot be normalized and is
/// reported as `DegenerateFlux` instead of producing NaN/inf.
pub fn normalize_flux(psi: ArrayView2<f64>) -> CompassResult<Array2<f64>> {
    let n_radial = psi.nrows();
    if n_radial < MIN_FLUX_SAMPLES {
        return Err(CompassError::InsufficientPoints {
            found: n_radial,
            required: MIN_FLUX_SAMPLES,
        });
    }

    let first = psi.row(0);
    let span = &psi.row(n_radial - 1) - &first;
    if let Some(column) = span.iter().position(|s| *s == 0.0 || !s.is_finite()) {
        return Err(CompassError::DegenerateFlux { column });
    }

    Ok((&psi - &first) / &span)
}
