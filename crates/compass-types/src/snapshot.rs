// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Snapshot
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Point in the poloidal (R, Z) plane [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub r: f64,
    pub z: f64,
}

impl Point2D {
    pub fn new(r: f64, z: f64) -> Self {
        Point2D { r, z }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((r, z): (f64, f64)) -> Self {
        Point2D { r, z }
    }
}

/// Equilibrium at a single stored time.
///
/// Self-contained: owns copies of every array it reports and keeps no
/// reference to the dataset it was cut from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSnapshot {
    /// Stored time that was selected, not the requested one [s].
    pub time: f64,
    pub r: Array1<f64>,
    pub z: Array1<f64>,
    /// Poloidal flux map [R, Z].
    pub psi_grid: Array2<f64>,
    pub psi_axis: f64,
    pub psi_lcfs: f64,
    pub magnetic_axis: Point2D,
    pub x_points: Vec<Point2D>,
    pub strike_points: Vec<Point2D>,
    /// Row 0 = psi_n, row 1 = f.
    pub f_profile: Array2<f64>,
    /// Row 0 = psi_n, row 1 = q.
    pub q_profile: Array2<f64>,
    pub b_vacuum_radius: f64,
    pub b_vacuum_magnitude: f64,
    /// Row 0 = R, row 1 = Z, closing vertex removed.
    pub lcfs_polygon: Array2<f64>,
    pub limiter_polygon: Option<Array2<f64>>,
}

impl EquilibriumSnapshot {
    /// Signed distance between the selected time and a requested one.
    pub fn requested_offset(&self, requested_time: f64) -> f64 {
        self.time - requested_time
    }

    pub fn to_json(&self) -> crate::error::CompassResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
