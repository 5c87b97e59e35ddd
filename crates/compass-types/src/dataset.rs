// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Dataset
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Canonical time-indexed equilibrium dataset.
//!
//! Every data source (CDB EFIT, EFIT file, FIESTA) is reshaped into this
//! one layout before any time slice is taken. Construction goes through
//! [`DatasetBuilder`], which checks presence and shape of every field so
//! that extraction can index without further bounds checks.

use crate::error::{CompassError, CompassResult};
use ndarray::{Array, Array1, Array2, Array3, ArrayD, ArrayView1, Dimension};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical field names of the equilibrium schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Time,
    R,
    Z,
    PsiGrid,
    PsiAxis,
    PsiLcfs,
    RMagneticAxis,
    ZMagneticAxis,
    RXpoint,
    ZXpoint,
    RStrikePoint,
    ZStrikePoint,
    PsiN,
    FProfile,
    QProfile,
    BtorVacuumRadius,
    BtorVacuumMagnitude,
    RLcfs,
    ZLcfs,
    RLimiter,
    ZLimiter,
}

impl Field {
    pub const ALL: [Field; 21] = [
        Field::Time,
        Field::R,
        Field::Z,
        Field::PsiGrid,
        Field::PsiAxis,
        Field::PsiLcfs,
        Field::RMagneticAxis,
        Field::ZMagneticAxis,
        Field::RXpoint,
        Field::ZXpoint,
        Field::RStrikePoint,
        Field::ZStrikePoint,
        Field::PsiN,
        Field::FProfile,
        Field::QProfile,
        Field::BtorVacuumRadius,
        Field::BtorVacuumMagnitude,
        Field::RLcfs,
        Field::ZLcfs,
        Field::RLimiter,
        Field::ZLimiter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Time => "time",
            Field::R => "R",
            Field::Z => "Z",
            Field::PsiGrid => "psi_grid",
            Field::PsiAxis => "psi_axis",
            Field::PsiLcfs => "psi_lcfs",
            Field::RMagneticAxis => "R_magnetic_axis",
            Field::ZMagneticAxis => "Z_magnetic_axis",
            Field::RXpoint => "R_xpoint",
            Field::ZXpoint => "Z_xpoint",
            Field::RStrikePoint => "R_strike_point",
            Field::ZStrikePoint => "Z_strike_point",
            Field::PsiN => "psi_n",
            Field::FProfile => "f_profile",
            Field::QProfile => "q_profile",
            Field::BtorVacuumRadius => "Btor_vacuum_radius",
            Field::BtorVacuumMagnitude => "Btor_vacuum_magnitude",
            Field::RLcfs => "R_lcfs",
            Field::ZLcfs => "Z_lcfs",
            Field::RLimiter => "R_limiter",
            Field::ZLimiter => "Z_limiter",
        }
    }

    /// Limiter geometry is the only optional part of the schema.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::RLimiter | Field::ZLimiter)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Radius at which the vacuum toroidal field magnitude is quoted.
#[derive(Debug, Clone, PartialEq)]
pub enum VacuumRadius {
    Constant(f64),
    PerTime(Array1<f64>),
}

impl VacuumRadius {
    /// Value at a time index. Panics if a per-time series is shorter than `index`.
    pub fn at(&self, index: usize) -> f64 {
        match self {
            VacuumRadius::Constant(value) => *value,
            VacuumRadius::PerTime(series) => series[index],
        }
    }
}

/// First-wall limiter contour, either fixed or stored per time slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Limiter {
    Static { r: Array1<f64>, z: Array1<f64> },
    PerTime { r: Array2<f64>, z: Array2<f64> },
}

impl Limiter {
    /// R and Z vertices in effect at a time index.
    pub fn contour_at(&self, index: usize) -> (ArrayView1<'_, f64>, ArrayView1<'_, f64>) {
        match self {
            Limiter::Static { r, z } => (r.view(), z.view()),
            Limiter::PerTime { r, z } => (r.row(index), z.row(index)),
        }
    }
}

/// Validated equilibrium time series.
///
/// Axis conventions: `psi_grid` is `[time, R, Z]`, point collections are
/// `[time, point]`, profiles are `[time, psi_n]`, the LCFS is
/// `[time, vertex]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumDataset {
    time: Array1<f64>,
    r: Array1<f64>,
    z: Array1<f64>,
    psi_grid: Array3<f64>,
    psi_axis: Array1<f64>,
    psi_lcfs: Array1<f64>,
    r_magnetic_axis: Array1<f64>,
    z_magnetic_axis: Array1<f64>,
    r_xpoint: Array2<f64>,
    z_xpoint: Array2<f64>,
    r_strike_point: Array2<f64>,
    z_strike_point: Array2<f64>,
    psi_n: Array1<f64>,
    f_profile: Array2<f64>,
    q_profile: Array2<f64>,
    b_vacuum_radius: VacuumRadius,
    b_vacuum_magnitude: Array1<f64>,
    r_lcfs: Array2<f64>,
    z_lcfs: Array2<f64>,
    limiter: Option<Limiter>,
}

impl EquilibriumDataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    pub fn n_times(&self) -> usize {
        self.time.len()
    }

    /// First and last stored time. Time is strictly increasing, so these
    /// are also the minimum and maximum.
    pub fn time_range(&self) -> (f64, f64) {
        (self.time[0], self.time[self.time.len() - 1])
    }

    pub fn r(&self) -> &Array1<f64> {
        &self.r
    }

    pub fn z(&self) -> &Array1<f64> {
        &self.z
    }

    pub fn psi_grid(&self) -> &Array3<f64> {
        &self.psi_grid
    }

    pub fn psi_axis(&self) -> &Array1<f64> {
        &self.psi_axis
    }

    pub fn psi_lcfs(&self) -> &Array1<f64> {
        &self.psi_lcfs
    }

    pub fn r_magnetic_axis(&self) -> &Array1<f64> {
        &self.r_magnetic_axis
    }

    pub fn z_magnetic_axis(&self) -> &Array1<f64> {
        &self.z_magnetic_axis
    }

    pub fn r_xpoint(&self) -> &Array2<f64> {
        &self.r_xpoint
    }

    pub fn z_xpoint(&self) -> &Array2<f64> {
        &self.z_xpoint
    }

    pub fn r_strike_point(&self) -> &Array2<f64> {
        &self.r_strike_point
    }

    pub fn z_strike_point(&self) -> &Array2<f64> {
        &self.z_strike_point
    }

    pub fn psi_n(&self) -> &Array1<f64> {
        &self.psi_n
    }

    pub fn f_profile(&self) -> &Array2<f64> {
        &self.f_profile
    }

    pub fn q_profile(&self) -> &Array2<f64> {
        &self.q_profile
    }

    pub fn b_vacuum_radius(&self) -> &VacuumRadius {
        &self.b_vacuum_radius
    }

    pub fn b_vacuum_magnitude(&self) -> &Array1<f64> {
        &self.b_vacuum_magnitude
    }

    pub fn r_lcfs(&self) -> &Array2<f64> {
        &self.r_lcfs
    }

    pub fn z_lcfs(&self) -> &Array2<f64> {
        &self.z_lcfs
    }

    pub fn limiter(&self) -> Option<&Limiter> {
        self.limiter.as_ref()
    }
}

/// Collects named arrays and validates them into an [`EquilibriumDataset`].
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    fields: BTreeMap<Field, ArrayD<f64>>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<D: Dimension>(&mut self, field: Field, data: Array<f64, D>) -> &mut Self {
        self.fields.insert(field, data.into_dyn());
        self
    }

    pub fn with<D: Dimension>(mut self, field: Field, data: Array<f64, D>) -> Self {
        self.insert(field, data);
        self
    }

    pub fn remove(&mut self, field: Field) -> Option<ArrayD<f64>> {
        self.fields.remove(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn build(mut self) -> CompassResult<EquilibriumDataset> {
        let time: Array1<f64> = self.take(Field::Time)?;
        if time.is_empty() {
            return Err(CompassError::ShapeMismatch(
                "time coordinate is empty".to_string(),
            ));
        }
        if let Some(index) = first_non_increasing(&time) {
            return Err(CompassError::NonMonotonicTime { index });
        }
        let nt = time.len();

        let r: Array1<f64> = self.take(Field::R)?;
        let z: Array1<f64> = self.take(Field::Z)?;

        let psi_grid: Array3<f64> = self.take(Field::PsiGrid)?;
        expect_shape(Field::PsiGrid, psi_grid.shape(), &[nt, r.len(), z.len()])?;

        let psi_axis = self.take_series(Field::PsiAxis, nt)?;
        let psi_lcfs = self.take_series(Field::PsiLcfs, nt)?;
        let r_magnetic_axis = self.take_series(Field::RMagneticAxis, nt)?;
        let z_magnetic_axis = self.take_series(Field::ZMagneticAxis, nt)?;

        let (r_xpoint, z_xpoint) = self.take_pair(Field::RXpoint, Field::ZXpoint, nt)?;
        let (r_strike_point, z_strike_point) =
            self.take_pair(Field::RStrikePoint, Field::ZStrikePoint, nt)?;

        let psi_n: Array1<f64> = self.take(Field::PsiN)?;
        if let Some(index) = first_non_increasing(&psi_n) {
            return Err(CompassError::NonMonotonicFlux { index });
        }
        let f_profile: Array2<f64> = self.take(Field::FProfile)?;
        expect_shape(Field::FProfile, f_profile.shape(), &[nt, psi_n.len()])?;
        let q_profile: Array2<f64> = self.take(Field::QProfile)?;
        expect_shape(Field::QProfile, q_profile.shape(), &[nt, psi_n.len()])?;

        let b_vacuum_radius = self.take_radius(nt)?;
        let b_vacuum_magnitude = self.take_series(Field::BtorVacuumMagnitude, nt)?;

        let (r_lcfs, z_lcfs) = self.take_pair(Field::RLcfs, Field::ZLcfs, nt)?;

        let limiter = self.take_limiter(nt)?;

        Ok(EquilibriumDataset {
            time,
            r,
            z,
            psi_grid,
            psi_axis,
            psi_lcfs,
            r_magnetic_axis,
            z_magnetic_axis,
            r_xpoint,
            z_xpoint,
            r_strike_point,
            z_strike_point,
            psi_n,
            f_profile,
            q_profile,
            b_vacuum_radius,
            b_vacuum_magnitude,
            r_lcfs,
            z_lcfs,
            limiter,
        })
    }

    fn take_raw(&mut self, field: Field) -> CompassResult<ArrayD<f64>> {
        self.fields
            .remove(&field)
            .ok_or_else(|| CompassError::MissingField(field.to_string()))
    }

    fn take<D: Dimension>(&mut self, field: Field) -> CompassResult<Array<f64, D>> {
        let data = self.take_raw(field)?;
        into_dim(field, data)
    }

    fn take_series(&mut self, field: Field, nt: usize) -> CompassResult<Array1<f64>> {
        let series: Array1<f64> = self.take(field)?;
        expect_shape(field, series.shape(), &[nt])?;
        Ok(series)
    }

    /// R/Z point or contour arrays indexed `[time, point]` with identical shapes.
    fn take_pair(
        &mut self,
        r_field: Field,
        z_field: Field,
        nt: usize,
    ) -> CompassResult<(Array2<f64>, Array2<f64>)> {
        let r: Array2<f64> = self.take(r_field)?;
        let z: Array2<f64> = self.take(z_field)?;
        expect_shape(r_field, r.shape(), &[nt, r.ncols()])?;
        expect_shape(z_field, z.shape(), r.shape())?;
        Ok((r, z))
    }

    fn take_radius(&mut self, nt: usize) -> CompassResult<VacuumRadius> {
        let field = Field::BtorVacuumRadius;
        let data = self.take_raw(field)?;
        match data.ndim() {
            0 => data
                .first()
                .copied()
                .map(VacuumRadius::Constant)
                .ok_or_else(|| CompassError::MissingField(field.to_string())),
            1 => {
                let series: Array1<f64> = into_dim(field, data)?;
                expect_shape(field, series.shape(), &[nt])?;
                Ok(VacuumRadius::PerTime(series))
            }
            ndim => Err(CompassError::ShapeMismatch(format!(
                "{field} must be a scalar or a time series, got {ndim} dimensions"
            ))),
        }
    }

    fn take_limiter(&mut self, nt: usize) -> CompassResult<Option<Limiter>> {
        let r = self.fields.remove(&Field::RLimiter);
        let z = self.fields.remove(&Field::ZLimiter);
        let (r, z) = match (r, z) {
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(CompassError::MissingField(Field::ZLimiter.to_string())),
            (None, Some(_)) => return Err(CompassError::MissingField(Field::RLimiter.to_string())),
            (Some(r), Some(z)) => (r, z),
        };
        expect_shape(Field::ZLimiter, z.shape(), r.shape())?;
        match r.ndim() {
            1 => Ok(Some(Limiter::Static {
                r: into_dim(Field::RLimiter, r)?,
                z: into_dim(Field::ZLimiter, z)?,
            })),
            2 => {
                expect_shape(Field::RLimiter, r.shape(), &[nt, r.shape()[1]])?;
                Ok(Some(Limiter::PerTime {
                    r: into_dim(Field::RLimiter, r)?,
                    z: into_dim(Field::ZLimiter, z)?,
                }))
            }
            ndim => Err(CompassError::ShapeMismatch(format!(
                "{} must be 1-D or [time, vertex], got {ndim} dimensions",
                Field::RLimiter
            ))),
        }
    }
}

fn into_dim<D: Dimension>(field: Field, data: ArrayD<f64>) -> CompassResult<Array<f64, D>> {
    let ndim = data.ndim();
    data.into_dimensionality::<D>().map_err(|_| {
        CompassError::ShapeMismatch(format!(
            "{field} has {ndim} dimensions, expected {}",
            D::NDIM.unwrap_or(ndim)
        ))
    })
}

/// First index `i` where `values[i] > values[i - 1]` does not hold (NaN included).
fn first_non_increasing(values: &Array1<f64>) -> Option<usize> {
    values
        .windows(2)
        .into_iter()
        .position(|w| !(w[1] > w[0]))
        .map(|i| i + 1)
}

fn expect_shape(field: Field, actual: &[usize], expected: &[usize]) -> CompassResult<()> {
    if actual != expected {
        return Err(CompassError::ShapeMismatch(format!(
            "{field} has shape {actual:?}, expected {expected:?}"
        )));
    }
    Ok(())
}
