// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — NumPy Archive Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Equilibrium dataset read from a NumPy `.npz` archive.
//!
//! The archive holds one array per stored signal, named as the producing
//! code names it (`psi_RZ`, `xp_lower_r`, ...). A [`SourceConfig`] maps
//! those names onto the canonical fields; stacked references are read as
//! 1-D time series and joined along a point axis.

use crate::source::EquilibriumSource;
use compass_types::config::{RadiusSpec, SignalRef, SourceConfig};
use compass_types::dataset::{DatasetBuilder, EquilibriumDataset, Field};
use compass_types::error::{CompassError, CompassResult};
use ndarray::{arr0, stack, Array1, ArrayD, ArrayView1, Axis, Ix1, IxDyn, OwnedRepr};
use ndarray_npy::NpzReader;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct NpzSource {
    path: PathBuf,
    config: SourceConfig,
}

impl NpzSource {
    pub fn new(path: impl Into<PathBuf>, config: SourceConfig) -> CompassResult<Self> {
        config.validate()?;
        Ok(Self {
            path: path.into(),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl EquilibriumSource for NpzSource {
    fn name(&self) -> &str {
        &self.config.source_name
    }

    fn load(&self) -> CompassResult<EquilibriumDataset> {
        let file = File::open(&self.path)?;
        let mut npz = NpzReader::new(file).map_err(|e| {
            CompassError::Archive(format!("Failed to open npz '{}': {e}", self.path.display()))
        })?;
        let available: HashSet<String> = npz
            .names()
            .map_err(|e| CompassError::Archive(format!("Failed to list npz entries: {e}")))?
            .into_iter()
            .map(|name| name.trim_end_matches(".npy").to_string())
            .collect();
        tracing::debug!(
            path = %self.path.display(),
            entries = available.len(),
            "opened equilibrium archive"
        );

        let mut builder = DatasetBuilder::new();
        for (field, signal) in self.config.signals.entries() {
            let Some(signal) = signal else { continue };
            let missing = signal.names().into_iter().find(|n| !available.contains(*n));
            if let Some(name) = missing {
                if field.is_required() {
                    return Err(CompassError::MissingField(format!(
                        "{field} (stored as '{name}')"
                    )));
                }
                tracing::debug!(field = %field, signal = name, "optional signal absent");
                continue;
            }
            builder.insert(field, read_signal(&mut npz, field, signal)?);
        }

        match &self.config.b_vacuum_radius {
            RadiusSpec::Constant(value) => {
                builder.insert(Field::BtorVacuumRadius, arr0(*value));
            }
            RadiusSpec::Signal(name) => {
                if !available.contains(name.as_str()) {
                    return Err(CompassError::MissingField(format!(
                        "{} (stored as '{name}')",
                        Field::BtorVacuumRadius
                    )));
                }
                builder.insert(Field::BtorVacuumRadius, read_array(&mut npz, name)?);
            }
        }

        let dataset = builder.build()?;
        let (t_min, t_max) = dataset.time_range();
        tracing::info!(
            source = %self.config.source_name,
            path = %self.path.display(),
            n_times = dataset.n_times(),
            t_min,
            t_max,
            has_limiter = dataset.limiter().is_some(),
            "loaded equilibrium dataset"
        );
        Ok(dataset)
    }
}

fn read_signal(
    npz: &mut NpzReader<File>,
    field: Field,
    signal: &SignalRef,
) -> CompassResult<ArrayD<f64>> {
    match signal {
        SignalRef::Single(name) => read_array(npz, name),
        SignalRef::Stacked(names) => {
            let mut series: Vec<Array1<f64>> = Vec::with_capacity(names.len());
            for name in names {
                let data = read_array(npz, name)?;
                let ndim = data.ndim();
                let data = data.into_dimensionality::<Ix1>().map_err(|_| {
                    CompassError::ShapeMismatch(format!(
                        "{field}: stacked signal '{name}' must be a 1-D time series, got {ndim} dimensions"
                    ))
                })?;
                series.push(data);
            }
            let views: Vec<ArrayView1<f64>> = series.iter().map(|s| s.view()).collect();
            let stacked = stack(Axis(1), &views).map_err(|e| {
                CompassError::ShapeMismatch(format!(
                    "{field}: stacked signals have different lengths: {e}"
                ))
            })?;
            Ok(stacked.into_dyn())
        }
    }
}

fn read_array(npz: &mut NpzReader<File>, key: &str) -> CompassResult<ArrayD<f64>> {
    let data = npz
        .by_name::<OwnedRepr<f64>, IxDyn>(&format!("{key}.npy"))
        .or_else(|_| npz.by_name::<OwnedRepr<f64>, IxDyn>(key))
        .map_err(|e| CompassError::Archive(format!("Failed to read {key} from npz: {e}")))?;
    tracing::trace!(signal = key, shape = ?data.shape(), "read signal");
    Ok(data)
}
